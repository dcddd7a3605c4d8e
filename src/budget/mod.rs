//! Per-category spending budgets.

mod core;

pub use core::{Budget, create_budget_table, get_budgets_by_user, set_budget};
