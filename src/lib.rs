//! Finance Manager is a small tool for keeping track of personal finances.
//!
//! Users record income and expenses, see how much they earned, spent and
//! have left over, where the money went by category, and how their spending
//! compares to the budgets they set for each category.
//!
//! The summaries in [summary] are pure functions over a snapshot of a user's
//! records. The [stores] fetch those snapshots from SQLite or from memory.

#![warn(missing_docs)]

pub mod budget;
pub mod category;
pub mod currency;
pub mod database_id;
mod db;
mod error;
pub mod money;
pub mod stores;
pub mod summary;
pub mod timezone;
pub mod transaction;
pub mod user;

pub use db::initialize as initialize_db;
pub use error::Error;
