//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the backend as `numeric` columns and entered in the
//! admin form with a two-decimal step. The backend may return them either as
//! JSON numbers or strings; both deserialize.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a valid number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// More than two digits after the decimal point.
    #[error("price can have at most two decimal places")]
    TooPrecise,
}

/// A shop price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places a price may carry.
    pub const SCALE: u32 = 2;

    /// Create a price from a decimal amount without validation.
    ///
    /// Use this for values read back from the backend.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price typed into a form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, not positive, or
    /// has more than two decimal places.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(input).map_err(|_| PriceError::NotANumber)?;

        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooPrecise);
        }

        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount as a plain two-decimal string (e.g. `"4.50"`), as used for
    /// form `value` attributes.
    #[must_use]
    pub fn to_input_value(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
