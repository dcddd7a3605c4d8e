//! Implements a SQLite backed store for transactions and budgets.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    budget::{self, Budget},
    db::initialize,
    stores::{BudgetStore, TransactionStore},
    transaction::{self, Amount, NewTransaction, Transaction},
    user::UserID,
};

/// Stores transactions and budgets in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a new store with a SQLite database.
    ///
    /// The caller should ensure the schema has been created, e.g. with
    /// [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Create the schema in `connection` and wrap it in a store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn open(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }

    /// Get the shared database connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.connection.clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteStore {
    fn add_transaction(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        transaction::create_transaction(user_id, new_transaction, &*self.lock()?)
    }

    fn fetch_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        transaction::get_transactions_by_user(user_id, &*self.lock()?)
    }
}

impl BudgetStore for SQLiteStore {
    fn set_budget(
        &self,
        user_id: UserID,
        category: &str,
        amount: Amount,
    ) -> Result<Budget, Error> {
        budget::set_budget(user_id, category, amount, &*self.lock()?)
    }

    fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, Error> {
        budget::get_budgets_by_user(user_id, &*self.lock()?)
    }
}
