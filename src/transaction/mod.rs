//! Recording and retrieving income and expenses.

mod amount;
mod core;

pub use amount::{Amount, RawAmount};
pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
    get_transactions_by_user,
};
