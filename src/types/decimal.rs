//! Exact decimal numbers as delivered by the driver's textual numerics.
//!
//! Digits are arbitrary precision: expression results and aggregates are not
//! bounded by a column's declared precision. Values are never routed through
//! a binary float.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

pub use bigdecimal::ParseBigDecimalError as ParseDecimalError;

/// A decimal value stored as `digits * 10^-scale`.
///
/// The scale is part of the value, so `"1.50"` and `"1.5"` are distinct
/// (`BigDecimal` itself compares them equal). A negative scale stands for
/// trailing zeros left out of the digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactDecimal {
    digits: BigInt,
    scale: i64,
}

impl ExactDecimal {
    pub fn new(digits: impl Into<BigInt>, scale: i64) -> Self {
        Self {
            digits: digits.into(),
            scale,
        }
    }

    pub fn digits(&self) -> &BigInt {
        &self.digits
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn to_big_decimal(&self) -> BigDecimal {
        BigDecimal::new(self.digits.clone(), self.scale)
    }
}

impl FromStr for ExactDecimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // The driver renders fractions below one without the leading zero.
        let text: Cow<'_, str> = match s.strip_prefix('-') {
            Some(rest) if rest.starts_with('.') => format!("-0{rest}").into(),
            _ if s.starts_with('.') => format!("0{s}").into(),
            _ => s.into(),
        };
        let (digits, scale) = BigDecimal::from_str(&text)?.into_bigint_and_exponent();
        Ok(Self { digits, scale })
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.digits.magnitude().to_string();
        if self.digits.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        if self.scale <= 0 {
            f.write_str(&digits)?;
            if digits != "0" {
                for _ in 0..self.scale.unsigned_abs() {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }
        let scale = usize::try_from(self.scale).map_err(|_| fmt::Error)?;
        if digits.len() <= scale {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        } else {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

impl From<BigDecimal> for ExactDecimal {
    fn from(value: BigDecimal) -> Self {
        let (digits, scale) = value.into_bigint_and_exponent();
        Self { digits, scale }
    }
}

impl From<ExactDecimal> for BigDecimal {
    fn from(value: ExactDecimal) -> Self {
        BigDecimal::new(value.digits, value.scale)
    }
}

impl From<rust_decimal::Decimal> for ExactDecimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self::new(value.mantissa(), i64::from(value.scale()))
    }
}

impl TryFrom<ExactDecimal> for rust_decimal::Decimal {
    type Error = rust_decimal::Error;

    /// Fails when the value needs more than 28 digits of scale or 96 bits of mantissa.
    fn try_from(value: ExactDecimal) -> Result<Self, Self::Error> {
        rust_decimal::Decimal::from_str_exact(&value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_digits_and_scale() {
        let d: ExactDecimal = "123.45".parse().unwrap();
        assert_eq!(d, ExactDecimal::new(12345, 2));

        let d: ExactDecimal = "1.50".parse().unwrap();
        assert_eq!(d, ExactDecimal::new(150, 2));
        assert_ne!(d, ExactDecimal::new(15, 1));
    }

    #[test]
    fn test_parse_signs_and_leading_point() {
        assert_eq!("-.5".parse::<ExactDecimal>().unwrap(), ExactDecimal::new(-5, 1));
        assert_eq!(".25".parse::<ExactDecimal>().unwrap(), ExactDecimal::new(25, 2));
        assert_eq!("-0.001".parse::<ExactDecimal>().unwrap(), ExactDecimal::new(-1, 3));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!("1.5E+3".parse::<ExactDecimal>().unwrap(), ExactDecimal::new(15, -2));
        assert_eq!("25e-4".parse::<ExactDecimal>().unwrap(), ExactDecimal::new(25, 4));
    }

    #[test]
    fn test_parse_beyond_i128() {
        let text = "123456789012345678901234567890123456789.5";
        let d: ExactDecimal = text.parse().unwrap();
        assert_eq!(d.scale(), 1);
        assert_eq!(d.digits().to_string(), "1234567890123456789012345678901234567895");
        assert_eq!(d.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ExactDecimal>().is_err());
        assert!("1.2.3".parse::<ExactDecimal>().is_err());
        assert!("12a".parse::<ExactDecimal>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExactDecimal::new(12345, 2).to_string(), "123.45");
        assert_eq!(ExactDecimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(ExactDecimal::new(42, 0).to_string(), "42");
        assert_eq!(ExactDecimal::new(123, -2).to_string(), "12300");
    }

    #[test]
    fn test_big_decimal_interop_keeps_scale() {
        let exact = ExactDecimal::new(150, 2);
        let big = BigDecimal::from(exact.clone());
        assert_eq!(ExactDecimal::from(big), exact);
    }

    #[test]
    fn test_rust_decimal_interop() {
        let d = rust_decimal::Decimal::new(-31415, 4);
        let exact = ExactDecimal::from(d);
        assert_eq!(exact, ExactDecimal::new(-31415, 4));
        assert_eq!(rust_decimal::Decimal::try_from(exact).unwrap(), d);

        let too_wide: ExactDecimal = "1234567890123456789012345678901234567890".parse().unwrap();
        assert!(rust_decimal::Decimal::try_from(too_wide).is_err());
    }
}
