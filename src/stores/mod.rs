//! Contains traits and implementations for objects that hand out snapshots of
//! a user's transactions and budgets.
//!
//! The summaries in [crate::summary] never talk to a store themselves, callers
//! fetch a snapshot through these traits and pass it in.

mod memory;
mod sql_store;

pub use memory::MemoryStore;
pub use sql_store::SQLiteStore;

use crate::{
    Error,
    budget::Budget,
    transaction::{Amount, NewTransaction, Transaction},
    user::UserID,
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Record a new transaction for the user `user_id`.
    fn add_transaction(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Retrieve all of the user's transactions in the order they were recorded.
    fn fetch_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;
}

/// Handles the creation and retrieval of budgets.
pub trait BudgetStore {
    /// Set the budget for `category`, replacing any existing budget for that category.
    fn set_budget(
        &self,
        user_id: UserID,
        category: &str,
        amount: Amount,
    ) -> Result<Budget, Error>;

    /// Retrieve all of the user's budgets in the order their categories were first budgeted.
    fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, Error>;
}
