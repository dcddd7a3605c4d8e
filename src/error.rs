//! Defines the app level error type.

use crate::{database_id::TransactionID, user::UserID};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount could not be interpreted as a finite number.
    ///
    /// `transaction_id` is `None` when the amount came from user input that
    /// has not been stored yet.
    #[error("invalid amount \"{amount}\" for transaction {}", display_id(.transaction_id))]
    InvalidAmount {
        /// The ID of the offending transaction, if it has been stored.
        transaction_id: Option<TransactionID>,
        /// The amount text that failed to parse.
        amount: String,
    },

    /// A negative amount was used to create a transaction or budget.
    ///
    /// Amounts are magnitudes, the transaction type decides the direction.
    #[error("{0} is negative, amounts must be zero or greater")]
    NegativeAmount(f64),

    /// Adding up amounts gave a total too large to represent.
    #[error("the total of the amounts is too large to calculate")]
    AmountOverflow,

    /// A transaction type other than "income" or "expense" was given.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// A transaction or budget referred to a user that does not exist.
    #[error("there is no user with the ID {0}")]
    InvalidUser(UserID),

    /// The username is already registered.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

fn display_id(transaction_id: &Option<TransactionID>) -> String {
    match transaction_id {
        Some(id) => format!("#{id}"),
        None => "(not yet saved)".to_owned(),
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
