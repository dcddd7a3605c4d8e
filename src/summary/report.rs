//! Combines the aggregates into the shapes shown to users.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    budget::Budget,
    money::Money,
    stores::{BudgetStore, TransactionStore},
    summary::aggregation::{
        CategoryTotal, FinancialSummary, MonthlyComparison, budget_comparison, category_breakdown,
        monthly_comparison, summarize,
    },
    transaction::{Transaction, TransactionType},
    user::UserID,
};

/// Expense totals per category, ready to be charted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSeries {
    /// Category names.
    pub labels: Vec<String>,
    /// The expense total for each label.
    pub data: Vec<Money>,
}

/// Budgets next to actual spending, ready to be charted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSeries {
    /// Budgeted category names.
    pub labels: Vec<String>,
    /// The budgeted amount for each label.
    pub budget: Vec<Money>,
    /// The amount spent for each label.
    pub actual: Vec<Money>,
}

/// The data for the budget page charts.
///
/// Serializes as:
///
/// ```json
/// {
///   "expenseData": { "labels": ["Food"], "data": [150.0] },
///   "budgetData": { "labels": ["Food"], "budget": [200.0], "actual": [150.0] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    /// Expenses grouped by category.
    pub expense_data: ExpenseSeries,
    /// Each budget with the actual spending in its category.
    pub budget_data: BudgetSeries,
}

impl BudgetData {
    /// Build the budget page data from a snapshot of a user's transactions and budgets.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if an expense has an amount that is not a finite number.
    pub fn build(transactions: &[Transaction], budgets: &[Budget]) -> Result<Self, Error> {
        let expense_totals = category_breakdown(transactions, Some(TransactionType::Expense))?;
        let comparisons = budget_comparison(budgets, &expense_totals);

        let expense_data = ExpenseSeries {
            labels: expense_totals
                .iter()
                .map(|category| category.name.clone())
                .collect(),
            data: expense_totals.iter().map(|category| category.total).collect(),
        };

        let mut budget_data = BudgetSeries::default();

        for comparison in comparisons {
            budget_data.labels.push(comparison.category);
            budget_data.budget.push(comparison.budget);
            budget_data.actual.push(comparison.actual);
        }

        Ok(Self {
            expense_data,
            budget_data,
        })
    }
}

/// Income, expenses, balance and the total for each category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Overall totals.
    #[serde(flatten)]
    pub summary: FinancialSummary,
    /// Totals per category over all transactions, income and expenses alike.
    pub categories: Vec<CategoryTotal>,
}

impl SummaryReport {
    /// Build the summary from a snapshot of a user's transactions.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if a transaction has an amount that is not a finite number.
    pub fn build(transactions: &[Transaction]) -> Result<Self, Error> {
        Ok(Self {
            summary: summarize(transactions)?,
            categories: category_breakdown(transactions, None)?,
        })
    }
}

/// Fetch a user's transactions and build their [SummaryReport].
///
/// # Errors
/// Returns an error if the store fails or a transaction has an invalid amount.
pub fn load_summary_report<S>(store: &S, user_id: UserID) -> Result<SummaryReport, Error>
where
    S: TransactionStore,
{
    let transactions = store.fetch_transactions(user_id)?;
    tracing::debug!(
        "summarizing {} transactions for user {user_id}",
        transactions.len()
    );

    SummaryReport::build(&transactions)
}

/// Fetch a user's transactions and budgets and build their [BudgetData].
///
/// # Errors
/// Returns an error if the store fails or an expense has an invalid amount.
pub fn load_budget_data<S>(store: &S, user_id: UserID) -> Result<BudgetData, Error>
where
    S: TransactionStore + BudgetStore,
{
    let transactions = store.fetch_transactions(user_id)?;
    let budgets = store.fetch_budgets(user_id)?;
    tracing::debug!(
        "comparing {} budgets against {} transactions for user {user_id}",
        budgets.len(),
        transactions.len()
    );

    BudgetData::build(&transactions, &budgets)
}

/// Fetch a user's transactions and compare the expenses of the month
/// containing `month` with the month before.
///
/// # Errors
/// Returns an error if the store fails or an expense has an invalid amount.
pub fn load_monthly_comparison<S>(
    store: &S,
    user_id: UserID,
    month: Date,
) -> Result<MonthlyComparison, Error>
where
    S: TransactionStore,
{
    let transactions = store.fetch_transactions(user_id)?;

    monthly_comparison(&transactions, month)
}

#[cfg(test)]
mod budget_data_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        budget::Budget,
        money::Money,
        transaction::{RawAmount, Transaction, TransactionType},
        user::UserID,
    };

    use super::{BudgetData, BudgetSeries, ExpenseSeries};

    fn dollars(amount: i64) -> Money {
        Money::from_dollars_cents(amount, 0)
    }

    fn transaction(
        id: i64,
        transaction_type: TransactionType,
        amount: impl Into<RawAmount>,
        category: &str,
    ) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(1),
            transaction_type,
            amount: amount.into(),
            description: String::new(),
            category: category.to_owned(),
            date: date!(2024 - 05 - 01),
        }
    }

    fn budget(category: &str, amount: i64) -> Budget {
        Budget {
            user_id: UserID::new(1),
            category: category.to_owned(),
            amount: dollars(amount),
        }
    }

    #[test]
    fn build_joins_budgets_with_expenses() {
        let transactions = vec![
            transaction(1, TransactionType::Income, 1500.0, "Salary"),
            transaction(2, TransactionType::Expense, 150.0, "Food"),
            transaction(3, TransactionType::Expense, 30.0, "Shopping"),
        ];
        let budgets = vec![budget("Food", 200), budget("Transport", 50)];

        let data = BudgetData::build(&transactions, &budgets);

        assert_eq!(
            data,
            Ok(BudgetData {
                expense_data: ExpenseSeries {
                    labels: vec!["Food".to_owned(), "Shopping".to_owned()],
                    data: vec![dollars(150), dollars(30)],
                },
                budget_data: BudgetSeries {
                    labels: vec!["Food".to_owned(), "Transport".to_owned()],
                    budget: vec![dollars(200), dollars(50)],
                    actual: vec![dollars(150), Money::zero()],
                },
            })
        );
    }

    #[test]
    fn build_with_no_data_is_empty() {
        assert_eq!(BudgetData::build(&[], &[]), Ok(BudgetData::default()));
    }

    #[test]
    fn build_fails_on_bad_expense_amount() {
        let transactions = vec![transaction(5, TransactionType::Expense, "abc", "Food")];

        assert!(BudgetData::build(&transactions, &[]).is_err());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let transactions = vec![transaction(1, TransactionType::Expense, 150.0, "Food")];
        let budgets = vec![budget("Food", 200)];
        let data = BudgetData::build(&transactions, &budgets).unwrap();

        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(
            value,
            json!({
                "expenseData": { "labels": ["Food"], "data": [150.0] },
                "budgetData": { "labels": ["Food"], "budget": [200.0], "actual": [150.0] }
            })
        );
    }
}

#[cfg(test)]
mod summary_report_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        money::Money,
        stores::{BudgetStore, MemoryStore, TransactionStore},
        transaction::{Amount, NewTransaction, TransactionType},
        user::UserID,
    };

    use super::{load_budget_data, load_monthly_comparison, load_summary_report};

    fn add(store: &MemoryStore, transaction_type: TransactionType, amount: f64, category: &str) {
        let new_transaction = NewTransaction::new(
            transaction_type,
            Amount::new(amount).unwrap(),
            category,
            date!(2024 - 05 - 10),
        );
        store
            .add_transaction(UserID::new(1), new_transaction)
            .unwrap();
    }

    fn get_test_store() -> MemoryStore {
        let store = MemoryStore::with_users([UserID::new(1)]);
        add(&store, TransactionType::Income, 1500.0, "Salary");
        add(&store, TransactionType::Expense, 300.0, "Food");
        add(&store, TransactionType::Expense, 100.0, "Transport");
        store
    }

    #[test]
    fn load_summary_report_serializes_flat_totals() {
        let store = get_test_store();

        let report = load_summary_report(&store, UserID::new(1)).unwrap();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "income": 1500.0,
                "expenses": 400.0,
                "balance": 1100.0,
                "categories": [
                    { "name": "Salary", "total": 1500.0 },
                    { "name": "Food", "total": 300.0 },
                    { "name": "Transport", "total": 100.0 }
                ]
            })
        );
    }

    #[test]
    fn load_summary_report_for_other_user_is_zero() {
        let store = get_test_store();

        let report = load_summary_report(&store, UserID::new(2)).unwrap();

        assert_eq!(report.summary.balance, Money::zero());
        assert!(report.categories.is_empty());
    }

    #[test]
    fn load_budget_data_uses_users_budgets() {
        let store = get_test_store();
        store
            .set_budget(UserID::new(1), "Food", Amount::new(200.0).unwrap())
            .unwrap();
        store
            .set_budget(UserID::new(1), "Transport", Amount::new(50.0).unwrap())
            .unwrap();

        let data = load_budget_data(&store, UserID::new(1)).unwrap();

        assert_eq!(data.budget_data.labels, vec!["Food", "Transport"]);
        assert_eq!(
            data.budget_data.budget,
            vec![Money::from_cents(20_000), Money::from_cents(5_000)]
        );
        assert_eq!(
            data.budget_data.actual,
            vec![Money::from_cents(30_000), Money::from_cents(10_000)]
        );
    }

    #[test]
    fn load_monthly_comparison_uses_snapshot() {
        let store = get_test_store();

        let comparison =
            load_monthly_comparison(&store, UserID::new(1), date!(2024 - 06 - 01)).unwrap();

        assert_eq!(comparison.labels, vec!["Food", "Transport"]);
        assert_eq!(comparison.current_month, vec![Money::zero(), Money::zero()]);
        assert_eq!(
            comparison.previous_month,
            vec![Money::from_cents(30_000), Money::from_cents(10_000)]
        );
    }
}
