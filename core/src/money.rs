//! Monetary amounts and their display.
//!
//! # Design
//! The service sends prices as JSON decimals (`19.9`). In memory they become
//! `Money`, an integer count of minor units (cents), so totals are exact:
//! `10.00 × 2 + 2.50 × 3` is `2750` minor units, never `27.499999`.
//! Conversion from the wire rounds half away from zero to the nearest cent.
//!
//! `CurrencyFormat` renders `Money` as text. The default is Brazilian real
//! (`R$ 1.234,50`), the currency the food service prices in.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An amount in minor currency units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Convert a wire decimal to minor units. Returns `None` for NaN,
    /// infinities and values outside the `i64` cent range.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `self × quantity`, saturating at the `i64` bounds.
    pub fn times(self, quantity: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Serde adapter between a JSON decimal and `Money`.
///
/// Use with `#[serde(with = "crate::money::decimal")]`.
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_decimal(value)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {value}")))
    }
}

/// How to render `Money` as currency text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
    pub space_after_symbol: bool,
}

impl CurrencyFormat {
    /// Brazilian real: `R$ 1.234,50`.
    pub fn brl() -> Self {
        Self {
            symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
            space_after_symbol: true,
        }
    }

    /// US dollar: `$1,234.50`.
    pub fn usd() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: '.',
            thousands_separator: ',',
            space_after_symbol: false,
        }
    }

    pub fn format(&self, money: Money) -> String {
        let abs = money.minor().unsigned_abs();
        let units = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(digit);
        }

        let sign = if money.minor() < 0 { "-" } else { "" };
        let space = if self.space_after_symbol { " " } else { "" };
        format!(
            "{sign}{}{space}{grouped}{}{cents:02}",
            self.symbol, self.decimal_separator
        )
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}
