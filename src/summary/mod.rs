//! Financial summaries: totals, category breakdowns and budget comparisons.

mod aggregation;
mod report;

pub use aggregation::{
    BudgetComparison, CategoryTotal, FinancialSummary, MonthlyComparison, budget_comparison,
    category_breakdown, monthly_comparison, summarize,
};
pub use report::{
    BudgetData, BudgetSeries, ExpenseSeries, SummaryReport, load_budget_data,
    load_monthly_comparison, load_summary_report,
};
