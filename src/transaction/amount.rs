//! Amount types for transactions.
//!
//! [Amount] is what gets written: a validated, finite and non-negative
//! number. [RawAmount] is what gets read: whatever the store holds, which
//! may predate validation and is only interpreted when it is aggregated.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionID, money::Money};

/// A validated amount of money: finite and zero or greater.
///
/// Deserializing goes through [Amount::new], so the same checks apply.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(Money);

impl Amount {
    /// Create an amount, rounded to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `value` is NaN, infinite or too large
    /// to count in cents, or [Error::NegativeAmount] if `value` is less than zero.
    pub fn new(value: f64) -> Result<Self, Error> {
        if value < 0.0 {
            return Err(Error::NegativeAmount(value));
        }

        Money::from_f64(value)
            .map(Self)
            .ok_or_else(|| Error::InvalidAmount {
                transaction_id: None,
                amount: value.to_string(),
            })
    }

    /// The amount as money.
    pub fn money(&self) -> Money {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| Error::InvalidAmount {
            transaction_id: None,
            amount: s.to_owned(),
        })?;

        Amount::new(value)
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0.as_f64()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.as_f64().fmt(f)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// A transaction amount exactly as it was read from a store.
///
/// Use [RawAmount::parse] to get the numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// The store held a number.
    Number(f64),
    /// The store held text, which may or may not be a number.
    Text(String),
}

impl RawAmount {
    /// Interpret the amount as money, rounded to the nearest cent.
    ///
    /// Unlike [Amount], negative values are returned as is.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] naming `transaction_id` if the amount is
    /// not a number, is NaN or infinite, or is too large to count in cents.
    pub fn parse(&self, transaction_id: TransactionID) -> Result<Money, Error> {
        let value = match self {
            RawAmount::Number(value) => Some(*value),
            RawAmount::Text(text) => text.trim().parse::<f64>().ok(),
        };

        value
            .and_then(Money::from_f64)
            .ok_or_else(|| Error::InvalidAmount {
                transaction_id: Some(transaction_id),
                amount: self.to_string(),
            })
    }
}

impl Display for RawAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawAmount::Number(value) => value.fmt(f),
            RawAmount::Text(text) => f.write_str(text),
        }
    }
}

impl From<Amount> for RawAmount {
    fn from(value: Amount) -> Self {
        RawAmount::Number(value.money().as_f64())
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_owned())
    }
}

impl FromSql for RawAmount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let amount = match value {
            ValueRef::Integer(integer) => RawAmount::Number(integer as f64),
            ValueRef::Real(real) => RawAmount::Number(real),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                RawAmount::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            ValueRef::Null => RawAmount::Text(String::new()),
        };

        Ok(amount)
    }
}
