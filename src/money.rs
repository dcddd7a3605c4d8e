//! Exact amounts of money.
//!
//! Amounts are kept as a whole number of cents so that adding them up gives
//! the same result no matter the order or grouping of the additions.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The largest magnitude, in cents, that fits in an [i64].
const CENTS_LIMIT: f64 = i64::MAX as f64;

/// An amount of money stored as cents.
///
/// Serializes as a number of dollars, e.g. `Money::from_cents(1050)` becomes
/// `10.5`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(i64);

impl Money {
    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from dollars and cents, e.g. `from_dollars_cents(10, 50)` is $10.50.
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Zero dollars.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Convert a number of dollars to cents, rounding half away from zero.
    ///
    /// Returns `None` if `dollars` is NaN, infinite or too large to count in cents.
    pub fn from_f64(dollars: f64) -> Option<Self> {
        let cents = (dollars * 100.0).round();

        if cents.is_finite() && cents.abs() < CENTS_LIMIT {
            Some(Self(cents as i64))
        } else {
            None
        }
    }

    /// The amount in cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in dollars.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is less than zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add two amounts, or `None` if the result does not fit.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract `other` from this amount, or `None` if the result does not fit.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |total, amount| total + amount)
    }
}

impl TryFrom<f64> for Money {
    type Error = Error;

    fn try_from(dollars: f64) -> Result<Self, Self::Error> {
        Money::from_f64(dollars).ok_or_else(|| Error::InvalidAmount {
            transaction_id: None,
            amount: dollars.to_string(),
        })
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.as_f64()
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_f64()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let dollars = match value {
            ValueRef::Integer(integer) => integer as f64,
            ValueRef::Real(real) => real,
            _ => return Err(FromSqlError::InvalidType),
        };

        Money::from_f64(dollars).ok_or(FromSqlError::OutOfRange(dollars as i64))
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::Money;

    #[test]
    fn from_f64_rounds_to_nearest_cent() {
        assert_eq!(Money::from_f64(0.3), Some(Money::from_cents(30)));
        assert_eq!(Money::from_f64(10.5), Some(Money::from_cents(1050)));
        assert_eq!(Money::from_f64(0.125), Some(Money::from_cents(13)));
        assert_eq!(Money::from_f64(-2.5), Some(Money::from_cents(-250)));
    }

    #[test]
    fn from_f64_rejects_values_that_do_not_fit() {
        assert_eq!(Money::from_f64(f64::NAN), None);
        assert_eq!(Money::from_f64(f64::INFINITY), None);
        assert_eq!(Money::from_f64(1e17), None);
        assert_eq!(Money::from_f64(-1e17), None);
    }

    #[test]
    fn as_f64_gives_dollars() {
        assert_eq!(Money::from_cents(30).as_f64(), 0.3);
        assert_eq!(Money::from_cents(100).as_f64(), 1.0);
        assert_eq!(Money::from_dollars_cents(1500, 0).as_f64(), 1500.0);
    }

    #[test]
    fn adding_cents_does_not_depend_on_order() {
        let amounts = [0.3, 0.6, 0.1].map(|dollars| Money::from_f64(dollars).unwrap());

        let forwards: Money = amounts.iter().copied().sum();
        let backwards: Money = amounts.iter().rev().copied().sum();

        assert_eq!(forwards, Money::from_cents(100));
        assert_eq!(backwards, forwards);
    }

    #[test]
    fn checked_add_detects_overflow() {
        let large = Money::from_cents(i64::MAX - 1);

        assert_eq!(
            large.checked_add(Money::from_cents(1)),
            Some(Money::from_cents(i64::MAX))
        );
        assert_eq!(large.checked_add(Money::from_cents(2)), None);
        assert_eq!(
            Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)),
            None
        );
    }

    #[test]
    fn display_shows_dollars_and_cents() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-300).to_string(), "-$3.00");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn serializes_as_dollars() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();

        assert_eq!(json, "10.5");
        assert_eq!(
            serde_json::from_str::<Money>("10.5").unwrap(),
            Money::from_cents(1050)
        );
    }

    #[test]
    fn deserializing_rejects_out_of_range_number() {
        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }

    #[test]
    fn try_from_reports_invalid_amount() {
        assert_eq!(
            Money::try_from(f64::INFINITY),
            Err(Error::InvalidAmount {
                transaction_id: None,
                amount: "inf".to_owned()
            })
        );
    }

    #[test]
    fn reads_back_from_sqlite() {
        let connection = Connection::open_in_memory().unwrap();

        let money: Money = connection
            .query_row("SELECT ?1", (Money::from_cents(1999),), |row| row.get(0))
            .unwrap();
        let integer: Money = connection
            .query_row("SELECT 12", (), |row| row.get(0))
            .unwrap();

        assert_eq!(money, Money::from_cents(1999));
        assert_eq!(integer, Money::from_cents(1200));
    }
}
