//! Implements a store that keeps transactions and budgets in memory.

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use crate::{
    Error,
    budget::Budget,
    category::category_label,
    database_id::TransactionID,
    stores::{BudgetStore, TransactionStore},
    transaction::{Amount, NewTransaction, Transaction},
    user::UserID,
};

/// Keeps transactions and budgets for a set of users in memory.
///
/// Nothing is persisted. Useful for tests and for trying things out without a
/// database file. Like [SQLiteStore](crate::stores::SQLiteStore), records can
/// only be added for registered users.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

#[derive(Debug, Default)]
struct MemoryData {
    users: HashSet<UserID>,
    last_transaction_id: TransactionID,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl MemoryStore {
    /// Create an empty store without any users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with `users` registered.
    pub fn with_users(users: impl IntoIterator<Item = UserID>) -> Self {
        Self {
            data: Mutex::new(MemoryData {
                users: users.into_iter().collect(),
                ..Default::default()
            }),
        }
    }

    /// Allow transactions and budgets to be added for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the store lock is poisoned.
    pub fn register_user(&self, user_id: UserID) -> Result<(), Error> {
        self.lock()?.users.insert(user_id);

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>, Error> {
        self.data
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl MemoryData {
    fn check_user(&self, user_id: UserID) -> Result<(), Error> {
        if self.users.contains(&user_id) {
            Ok(())
        } else {
            Err(Error::InvalidUser(user_id))
        }
    }
}

impl TransactionStore for MemoryStore {
    fn add_transaction(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let mut data = self.lock()?;
        data.check_user(user_id)?;
        data.last_transaction_id += 1;

        let transaction = Transaction {
            id: data.last_transaction_id,
            user_id,
            transaction_type: new_transaction.transaction_type,
            amount: new_transaction.amount.into(),
            description: new_transaction.description,
            category: new_transaction.category.trim().to_owned(),
            date: new_transaction.date,
        };
        data.transactions.push(transaction.clone());

        Ok(transaction)
    }

    fn fetch_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let data = self.lock()?;

        Ok(data
            .transactions
            .iter()
            .filter(|transaction| transaction.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl BudgetStore for MemoryStore {
    fn set_budget(
        &self,
        user_id: UserID,
        category: &str,
        amount: Amount,
    ) -> Result<Budget, Error> {
        let mut data = self.lock()?;
        data.check_user(user_id)?;
        let category = category_label(category);

        let existing = data
            .budgets
            .iter_mut()
            .find(|budget| budget.user_id == user_id && budget.category == category);

        let budget = match existing {
            Some(budget) => {
                budget.amount = amount.money();
                budget.clone()
            }
            None => {
                let budget = Budget {
                    user_id,
                    category: category.to_owned(),
                    amount: amount.money(),
                };
                data.budgets.push(budget.clone());
                budget
            }
        };

        Ok(budget)
    }

    fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, Error> {
        let data = self.lock()?;

        Ok(data
            .budgets
            .iter()
            .filter(|budget| budget.user_id == user_id)
            .cloned()
            .collect())
    }
}
