//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionID,
    transaction::{Amount, RawAmount},
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(s.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are read from a store with their amount unvalidated, see
/// [RawAmount]. To record a new transaction, use [NewTransaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionID,
    /// The user the transaction belongs to.
    pub user_id: UserID,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, as held by the store.
    pub amount: RawAmount,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category of the transaction, e.g. "Food", "Salary".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

/// A validated transaction that has not been stored yet.
///
/// Use [NewTransaction::new] and the setter methods to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    ///
    /// Defaults to an empty string.
    pub description: String,
    /// The category of the transaction.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

impl NewTransaction {
    /// Create a new transaction with an empty description.
    pub fn new(
        transaction_type: TransactionType,
        amount: Amount,
        category: &str,
        date: Date,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            description: String::new(),
            category: category.trim().to_owned(),
            date,
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database for the user `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, type, amount, description, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, type, amount, description, category, date",
        )?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.transaction_type,
                new_transaction.amount,
                new_transaction.description,
                new_transaction.category.trim(),
                new_transaction.date,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidUser(user_id),
            error => error.into(),
        })?;

    tracing::debug!(
        "created {} transaction {} for user {}",
        transaction.transaction_type,
        transaction.id,
        user_id
    );

    Ok(transaction)
}

/// Retrieve all of a user's transactions in the order they were recorded.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, type, amount, description, category, date
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Initialize the transaction table and indexes.
///
/// The amount column has NUMERIC affinity so that rows written by older
/// versions keep whatever text they were given and are reported when read.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            amount NUMERIC NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        transaction_type: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        date: row.get(6)?,
    })
}

#[cfg(test)]
mod transaction_type_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(
            TransactionType::from_str("income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str("expense"),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(
            TransactionType::from_str(" Expense "),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn parsing_rejects_unknown_type() {
        assert_eq!(
            TransactionType::from_str("transfer"),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn serializes_as_lowercase() {
        let json = serde_json::to_string(&TransactionType::Income).unwrap();

        assert_eq!(json, "\"income\"");
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        money::Money,
        transaction::{Amount, NewTransaction, RawAmount, TransactionType},
        user::{UserID, create_user},
    };

    use super::{create_transaction, get_transactions_by_user};

    fn get_test_db_connection() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let user = create_user("user1", &connection).expect("Could not create test user");

        (connection, user.id)
    }

    fn groceries() -> NewTransaction {
        NewTransaction::new(
            TransactionType::Expense,
            Amount::new(300.0).unwrap(),
            "Food",
            date!(2024 - 05 - 03),
        )
        .description("Groceries")
    }

    #[test]
    fn create_transaction_succeeds() {
        let (connection, user_id) = get_test_db_connection();

        let transaction = create_transaction(user_id, groceries(), &connection)
            .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.amount, RawAmount::Number(300.0));
        assert_eq!(transaction.description, "Groceries");
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.date, date!(2024 - 05 - 03));
    }

    #[test]
    fn create_transaction_trims_category() {
        let (connection, user_id) = get_test_db_connection();
        let mut new_transaction = groceries();
        new_transaction.category = "  Food ".to_owned();

        let transaction = create_transaction(user_id, new_transaction, &connection).unwrap();

        assert_eq!(transaction.category, "Food");
    }

    #[test]
    fn create_transaction_keeps_cents() {
        let (connection, user_id) = get_test_db_connection();
        let coffee = NewTransaction::new(
            TransactionType::Expense,
            Amount::new(4.35).unwrap(),
            "Food",
            date!(2024 - 05 - 03),
        );

        let transaction = create_transaction(user_id, coffee, &connection).unwrap();

        assert_eq!(transaction.amount.parse(transaction.id), Ok(Money::from_cents(435)));
    }

    #[test]
    fn create_transaction_fails_for_unknown_user() {
        let (connection, user_id) = get_test_db_connection();
        let unknown_user = UserID::new(user_id.as_i64() + 100);

        let result = create_transaction(unknown_user, groceries(), &connection);

        assert_eq!(result, Err(Error::InvalidUser(unknown_user)));
    }

    #[test]
    fn get_transactions_returns_insertion_order() {
        let (connection, user_id) = get_test_db_connection();
        let first = create_transaction(user_id, groceries(), &connection).unwrap();
        let salary = NewTransaction::new(
            TransactionType::Income,
            Amount::new(1500.0).unwrap(),
            "Salary",
            date!(2024 - 05 - 01),
        );
        let second = create_transaction(user_id, salary, &connection).unwrap();

        let transactions = get_transactions_by_user(user_id, &connection).unwrap();

        assert_eq!(transactions, vec![first, second]);
    }

    #[test]
    fn get_transactions_only_returns_users_transactions() {
        let (connection, user_id) = get_test_db_connection();
        let other_user = create_user("user2", &connection).unwrap();
        create_transaction(other_user.id, groceries(), &connection).unwrap();
        let want = create_transaction(user_id, groceries(), &connection).unwrap();

        let transactions = get_transactions_by_user(user_id, &connection).unwrap();

        assert_eq!(transactions, vec![want]);
    }

    #[test]
    fn get_transactions_reads_malformed_amount_as_text() {
        let (connection, user_id) = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO \"transaction\" (user_id, type, amount, description, category, date)
                 VALUES (?1, 'expense', 'abc', 'Broken', 'Food', '2024-05-03')",
                (user_id.as_i64(),),
            )
            .unwrap();

        let transactions = get_transactions_by_user(user_id, &connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, RawAmount::Text("abc".to_owned()));
    }

    #[test]
    fn numeric_text_is_stored_as_number() {
        let (connection, user_id) = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO \"transaction\" (user_id, type, amount, description, category, date)
                 VALUES (?1, 'income', '1500', 'Salary', 'Salary', '2024-05-01')",
                (user_id.as_i64(),),
            )
            .unwrap();

        let transactions = get_transactions_by_user(user_id, &connection).unwrap();

        assert_eq!(transactions[0].amount, RawAmount::Number(1500.0));
    }
}
