//! Monetary amounts.
//!
//! Amounts are read as `f64` and rendered with two fixed decimals. Rounding
//! follows Rust's float formatter, which rounds the exact binary value and
//! breaks exact ties to even: `9.005` (stored as 9.00500000000000078...)
//! renders as `"9.01"`, `1.005` (stored as 1.00499999999999989...) as
//! `"1.00"`, and the exact tie `0.125` as `"0.12"`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Invalid monetary amount: {0:?}")]
    Invalid(String),
}

/// A monetary value from an order
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "MoneyRepr")]
pub struct Money(f64);

/// Render an amount with exactly two decimals, no separators or symbol
pub fn format_money(amount: Money) -> String {
    format!("{:.2}", amount.0)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(*self))
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Money(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(value as f64)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Money::default());
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Money)
            .ok_or_else(|| MoneyError::Invalid(s.to_string()))
    }
}

/// Wire shapes an amount may take: a number, a decimal string, or null
#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Number(f64),
    Text(String),
    Null,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = MoneyError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        match repr {
            MoneyRepr::Number(value) => Ok(Money(value)),
            MoneyRepr::Text(text) => text.parse(),
            MoneyRepr::Null => Ok(Money::default()),
        }
    }
}
