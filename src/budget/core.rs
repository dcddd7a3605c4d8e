//! Defines the budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, category::category_label, money::Money, transaction::Amount, user::UserID};

/// A planned spending ceiling for one category.
///
/// A user has at most one budget per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The user the budget belongs to.
    pub user_id: UserID,
    /// The category the budget applies to, e.g. "Food".
    pub category: String,
    /// The most the user plans to spend in the category.
    pub amount: Money,
}

/// Set the budget for a category, replacing any existing budget for it.
///
/// An empty category is stored under [UNCATEGORIZED_LABEL](crate::category::UNCATEGORIZED_LABEL)
/// so that it lines up with uncategorized expenses. Replacing a budget keeps its
/// position in [get_budgets_by_user].
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_budget(
    user_id: UserID,
    category: &str,
    amount: Amount,
    connection: &Connection,
) -> Result<Budget, Error> {
    let category = category_label(category);

    connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, category) DO UPDATE SET amount = excluded.amount
             RETURNING user_id, category, amount",
        )?
        .query_row((user_id.as_i64(), category, amount), map_budget_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidUser(user_id),
            error => error.into(),
        })
}

/// Retrieve a user's budgets in the order their categories were first budgeted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_budgets_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT user_id, category, amount FROM budget
             WHERE user_id = :user_id
             ORDER BY rowid ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Initialize the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            PRIMARY KEY(user_id, category),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        user_id: UserID::new(row.get(0)?),
        category: row.get(1)?,
        amount: row.get(2)?,
    })
}
