//! Amount type for handling non-negative monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Transactions carry their
//! direction in their `TransactionType`, so an `Amount` is never negative.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a non-negative monetary amount of at most `Amount::MAX`, in whole cents.
///
/// The bounds keep every amount exact as a JSON number and keep any realistic number of them
/// from overflowing when summed.
///
/// Persisted as a JSON number. A JSON string holding a number is also accepted when reading, as
/// are surrounding whitespace and thousands separators.
///
/// # Examples
///
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert!(Amount::from_str("-5").is_err());
/// assert!(Amount::from_str("0.125").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// 999,999,999,999.99
    pub const MAX: Amount = Amount(Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2));

    /// The number of decimal places an amount may carry.
    pub const SCALE: u32 = 2;

    /// Creates a new `Amount`.
    ///
    /// # Errors
    /// Fails if `value` is negative, has more than two decimal places, or exceeds `Amount::MAX`.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        if value.normalize().scale() > Self::SCALE {
            return Err(AmountError::TooPrecise(value));
        }
        if value > Self::MAX.0 {
            return Err(AmountError::TooLarge(value));
        }
        // Normalize negative zero so that it prints and compares as zero.
        Ok(Self(value.abs()))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// An error that can occur when parsing or constructing an `Amount`.
pub enum AmountError {
    /// The text could not be parsed as a decimal number.
    Parse(rust_decimal::Error),
    /// The value was negative.
    Negative(Decimal),
    /// The value had fractions of a cent.
    TooPrecise(Decimal),
    /// The value exceeded `Amount::MAX`.
    TooLarge(Decimal),
    /// The value was a float that `Decimal` cannot represent (NaN, infinite, or out of range).
    Unrepresentable(f64),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Parse(e) => write!(f, "Invalid amount: {e}"),
            AmountError::Negative(v) => write!(f, "Amount must not be negative, got {v}"),
            AmountError::TooPrecise(v) => {
                write!(f, "Amount {v} has more than {} decimal places", Amount::SCALE)
            }
            AmountError::TooLarge(v) => write!(f, "Amount {v} exceeds the maximum {}", Amount::MAX),
            AmountError::Unrepresentable(v) => write!(f, "Amount {v} cannot be represented"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let without_commas = s.trim().replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError::Parse)?;
        Amount::new(value)
    }
}

/// Floats are taken to the nearest cent, since binary noise such as `0.30000000000000004` is
/// common in stored numbers.
impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Going through the shortest round-trip representation keeps `12.34` from turning into
        // `12.339999999999999857891452847979962825775146484375`.
        let decimal = if value.is_finite() {
            Decimal::from_str(&value.to_string())
                .ok()
                .or_else(|| Decimal::from_f64(value))
        } else {
            None
        };
        match decimal {
            Some(d) => Amount::new(
                d.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
            ),
            None => Err(AmountError::Unrepresentable(value)),
        }
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Within the bounds of `Amount` the nearest float reads back as the same number of cents.
        match f64::from_str(&self.0.to_string()) {
            Ok(f) => serializer.serialize_f64(f),
            Err(_) => Err(serde::ser::Error::custom(format!(
                "Amount {} cannot be written as a number",
                self.0
            ))),
        }
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a non-negative number or a string holding one")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Amount::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_with_commas_and_whitespace() {
        let amount = Amount::from_str("  1,234,567.89 ").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_negative_is_rejected() {
        let e = Amount::from_str("-50.00").unwrap_err();
        assert!(e.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_parse_negative_zero_is_zero() {
        let amount = Amount::from_str("-0.00").unwrap();
        assert!(amount.is_zero());
        assert!(!amount.value().is_sign_negative());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("fifty").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_from_f64_keeps_short_representation() {
        let amount = Amount::try_from(12.34).unwrap();
        assert_eq!(amount.value(), dec("12.34"));
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert!(Amount::try_from(f64::NAN).is_err());
        assert!(Amount::try_from(f64::INFINITY).is_err());
        assert!(Amount::try_from(-1.5).is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("200.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "200.5");
    }

    #[test]
    fn test_deserialize_integer_float_and_string() {
        let a: Amount = serde_json::from_str("500").unwrap();
        assert_eq!(a.value(), dec("500"));
        let b: Amount = serde_json::from_str("99.95").unwrap();
        assert_eq!(b.value(), dec("99.95"));
        let c: Amount = serde_json::from_str("\"1,000.25\"").unwrap();
        assert_eq!(c.value(), dec("1000.25"));
    }

    #[test]
    fn test_deserialize_negative_fails() {
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("-3.5").is_err());
    }

    #[test]
    fn test_bounds() {
        assert_eq!(Amount::MAX.value(), dec("999999999999.99"));
        assert_eq!(Amount::from_str("999,999,999,999.99").unwrap(), Amount::MAX);
        assert!(matches!(
            Amount::from_str("1000000000000"),
            Err(AmountError::TooLarge(_))
        ));
        assert!(matches!(
            Amount::from_str("79228162514264337593543950335"),
            Err(AmountError::TooLarge(_)) | Err(AmountError::Parse(_))
        ));
        assert!(matches!(
            Amount::from_str("12.345"),
            Err(AmountError::TooPrecise(_))
        ));
        // Trailing zeros do not count as precision.
        assert_eq!(Amount::from_str("12.3400").unwrap().value(), dec("12.34"));
    }

    #[test]
    fn test_from_f64_rounds_to_cents() {
        let amount = Amount::try_from(0.1 + 0.2).unwrap();
        assert_eq!(amount.value(), dec("0.30"));
        assert!(Amount::try_from(1e13).is_err());
    }

    #[test]
    fn test_extremes_survive_json() {
        for text in ["999999999999.99", "12345678901.23", "0.01", "0"] {
            let amount = Amount::from_str(text).unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(back, amount, "{text} was written as {json}");
        }
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from(30);
        let a2 = Amount::from(50);
        assert!(a1 < a2);
    }
}
