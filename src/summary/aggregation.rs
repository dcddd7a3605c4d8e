//! Aggregates snapshots of transactions into totals.
//!
//! Every function here is pure: it reads the snapshot it is given, keeps no
//! state between calls and never talks to a store. Amounts are parsed as they
//! are summed, so a single malformed amount fails the whole aggregate with an
//! [Error::InvalidAmount] naming the transaction instead of skewing the totals.
//!
//! Totals are added up in whole cents, so they do not depend on the order of
//! the transactions and the category totals add up to the overall totals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    Error,
    budget::Budget,
    category::category_label,
    money::Money,
    transaction::{Transaction, TransactionType},
};

/// Total income, total expenses and what is left over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// The sum of all income.
    pub income: Money,
    /// The sum of all expenses.
    pub expenses: Money,
    /// Income minus expenses.
    pub balance: Money,
}

/// The sum of the transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category label.
    pub name: String,
    /// The sum of the amounts in the category.
    pub total: Money,
}

/// A budget next to the actual spending in its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    /// The budgeted category.
    pub category: String,
    /// The budgeted amount.
    pub budget: Money,
    /// The amount actually spent in the category.
    pub actual: Money,
}

/// Expenses per category for one month next to the month before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyComparison {
    /// Categories with expenses in either month, in first-seen order.
    pub labels: Vec<String>,
    /// Expenses per category in the selected month, aligned with `labels`.
    pub current_month: Vec<Money>,
    /// Expenses per category in the month before, aligned with `labels`.
    pub previous_month: Vec<Money>,
}

/// Calculate total income, total expenses and the balance.
///
/// An empty snapshot gives zero for everything.
///
/// # Errors
/// Returns [Error::InvalidAmount] for the first transaction whose amount is not a finite number,
/// or [Error::AmountOverflow] if a total does not fit in cents.
pub fn summarize(transactions: &[Transaction]) -> Result<FinancialSummary, Error> {
    let mut summary = FinancialSummary::default();

    for transaction in transactions {
        let amount = transaction.amount.parse(transaction.id)?;

        let total = match transaction.transaction_type {
            TransactionType::Income => &mut summary.income,
            TransactionType::Expense => &mut summary.expenses,
        };
        add_to(total, amount)?;
    }

    summary.balance = summary
        .income
        .checked_sub(summary.expenses)
        .ok_or(Error::AmountOverflow)?;

    Ok(summary)
}

/// Sum transactions by category.
///
/// `type_filter` restricts the breakdown to income or expenses, `None`
/// includes every transaction. Transactions without a category are grouped
/// under [UNCATEGORIZED_LABEL](crate::category::UNCATEGORIZED_LABEL).
///
/// Categories are returned in the order they first appear in `transactions`.
///
/// # Errors
/// Returns [Error::InvalidAmount] for the first included transaction whose
/// amount is not a finite number, or [Error::AmountOverflow] if a total does
/// not fit in cents.
pub fn category_breakdown(
    transactions: &[Transaction],
    type_filter: Option<TransactionType>,
) -> Result<Vec<CategoryTotal>, Error> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    let included = transactions.iter().filter(|transaction| {
        type_filter
            .map(|transaction_type| transaction.transaction_type == transaction_type)
            .unwrap_or(true)
    });

    for transaction in included {
        let amount = transaction.amount.parse(transaction.id)?;
        let label = category_label(&transaction.category);

        let position = *positions.entry(label).or_insert_with(|| {
            totals.push(CategoryTotal {
                name: label.to_owned(),
                total: Money::zero(),
            });
            totals.len() - 1
        });

        add_to(&mut totals[position].total, amount)?;
    }

    Ok(totals)
}

/// Line up each budget with the actual spending in its category.
///
/// `expense_totals` should be the expense breakdown from [category_breakdown].
/// Categories are matched by exact name and a budget without matching
/// expenses gets an actual amount of zero. The output has one entry per
/// budget, in the order of `budgets`. Expense categories without a budget are
/// left out.
pub fn budget_comparison(
    budgets: &[Budget],
    expense_totals: &[CategoryTotal],
) -> Vec<BudgetComparison> {
    let actual_by_category: HashMap<&str, Money> = expense_totals
        .iter()
        .map(|category_total| (category_total.name.as_str(), category_total.total))
        .collect();

    budgets
        .iter()
        .map(|budget| BudgetComparison {
            category: budget.category.clone(),
            budget: budget.amount,
            actual: actual_by_category
                .get(budget.category.as_str())
                .copied()
                .unwrap_or_default(),
        })
        .collect()
}

/// Compare expenses by category between the month containing `month` and
/// the month before it.
///
/// Transactions outside of those two months are ignored.
///
/// # Errors
/// Returns [Error::InvalidAmount] for the first expense in either month whose
/// amount is not a finite number, or [Error::AmountOverflow] if a total does
/// not fit in cents.
pub fn monthly_comparison(
    transactions: &[Transaction],
    month: Date,
) -> Result<MonthlyComparison, Error> {
    let current_start = first_day_of_month(month);
    let previous_start = first_day_of_month(current_start.saturating_sub(Duration::days(1)));

    let mut comparison = MonthlyComparison {
        labels: Vec::new(),
        current_month: Vec::new(),
        previous_month: Vec::new(),
    };
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
    {
        let transaction_month = first_day_of_month(transaction.date);
        let is_current = transaction_month == current_start;

        if !is_current && transaction_month != previous_start {
            continue;
        }

        let amount = transaction.amount.parse(transaction.id)?;
        let label = category_label(&transaction.category);

        let position = *positions.entry(label).or_insert_with(|| {
            comparison.labels.push(label.to_owned());
            comparison.current_month.push(Money::zero());
            comparison.previous_month.push(Money::zero());
            comparison.labels.len() - 1
        });

        let totals = if is_current {
            &mut comparison.current_month
        } else {
            &mut comparison.previous_month
        };
        add_to(&mut totals[position], amount)?;
    }

    Ok(comparison)
}

fn add_to(total: &mut Money, amount: Money) -> Result<(), Error> {
    *total = total.checked_add(amount).ok_or(Error::AmountOverflow)?;

    Ok(())
}

fn first_day_of_month(date: Date) -> Date {
    date.saturating_sub(Duration::days(i64::from(date.day()) - 1))
}
