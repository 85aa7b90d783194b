use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// A strictly positive amount of money to move in or out of a wallet.
///
/// Amounts are exact decimals. The scale of the submitted text is kept, so
/// "50.0" is displayed back as "50.0" and not "50".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Build an amount from a decimal, rejecting zero and negative values.
    pub fn new(value: Decimal) -> Result<Self, ParseAmountError> {
        if value <= Decimal::ZERO {
            return Err(ParseAmountError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Parse a decimal string such as "50", "50.0" or "0.25".
    ///
    /// Input the decimal type would have to round is rejected, so the parsed
    /// amount always displays as the submitted digits.
    pub fn parse(input: &str) -> Result<Self, ParseAmountError> {
        let value = Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat)?;
        let submitted_scale = input.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        if value.scale() as usize != submitted_scale {
            return Err(ParseAmountError::TooPrecise);
        }
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("not a decimal number")]
    InvalidFormat,

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("too many digits to represent exactly")]
    TooPrecise,
}
