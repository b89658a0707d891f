//! # Fixed-Point Decimal
//!
//! Non-negative decimal with 18 fractional digits stored as an integer count
//! of atoms (`value * 10^18`). Used for slashing fractions and any other
//! ratio that must be identical on every replica.

use crate::entities::U256;
use crate::errors::DecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits.
pub const DEC_PRECISION: u32 = 18;

fn precision_multiplier() -> U256 {
    U256::exp10(DEC_PRECISION as usize)
}

/// Fixed-point decimal with [`DEC_PRECISION`] fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec {
    atoms: U256,
}

impl Dec {
    pub fn zero() -> Self {
        Self { atoms: U256::zero() }
    }

    pub fn one() -> Self {
        Self {
            atoms: precision_multiplier(),
        }
    }

    /// `value * 10^-prec`, e.g. `Dec::new_with_prec(5, 2)` is `0.05`.
    pub fn new_with_prec(value: u64, prec: u32) -> Result<Self, DecError> {
        if prec > DEC_PRECISION {
            return Err(DecError::TooPrecise {
                input: format!("{value}e-{prec}"),
                max: DEC_PRECISION,
            });
        }
        let atoms = U256::from(value)
            .checked_mul(U256::exp10((DEC_PRECISION - prec) as usize))
            .ok_or(DecError::Overflow)?;
        Ok(Self { atoms })
    }

    pub fn from_atoms(atoms: U256) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> U256 {
        self.atoms
    }

    pub fn is_zero(&self) -> bool {
        self.atoms.is_zero()
    }

    /// Multiply an integer amount and truncate toward zero.
    pub fn mul_truncate(&self, amount: U256) -> Result<U256, DecError> {
        let product = amount.checked_mul(self.atoms).ok_or(DecError::Overflow)?;
        Ok(product / precision_multiplier())
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || DecError::InvalidFormat(input.to_string());

        let (whole, frac) = match input.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (input, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if input.contains('.') && frac.is_empty() {
            return Err(invalid());
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > DEC_PRECISION as usize {
            return Err(DecError::TooPrecise {
                input: input.to_string(),
                max: DEC_PRECISION,
            });
        }

        let mut digits = String::with_capacity(whole.len() + DEC_PRECISION as usize);
        digits.push_str(whole);
        digits.push_str(frac);
        for _ in frac.len()..DEC_PRECISION as usize {
            digits.push('0');
        }

        let atoms = U256::from_dec_str(&digits).map_err(|_| DecError::Overflow)?;
        Ok(Self { atoms })
    }
}

/// Always renders all 18 fractional digits, e.g. `0.050000000000000000`.
impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiplier = precision_multiplier();
        let whole = self.atoms / multiplier;
        let frac = self.atoms % multiplier;
        write!(
            f,
            "{}.{:0>width$}",
            whole,
            frac.to_string(),
            width = DEC_PRECISION as usize
        )
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let dec: Dec = "0.05".parse().unwrap();
        assert_eq!(dec.to_string(), "0.050000000000000000");
        assert_eq!(dec, Dec::new_with_prec(5, 2).unwrap());

        let one: Dec = "1".parse().unwrap();
        assert_eq!(one, Dec::one());
        assert_eq!(one.to_string(), "1.000000000000000000");
    }

    #[test]
    fn test_rejects_malformed_input() {
        for bad in ["", ".5", "5.", "-0.1", "1.2.3", "abc", "0,5"] {
            assert!(bad.parse::<Dec>().is_err(), "{bad:?} should be rejected");
        }
        assert!(matches!(
            "0.0000000000000000001".parse::<Dec>(),
            Err(DecError::TooPrecise { .. })
        ));
    }

    #[test]
    fn test_mul_truncate_rounds_down() {
        let fraction: Dec = "0.05".parse().unwrap();
        assert_eq!(fraction.mul_truncate(U256::from(1_000u64)).unwrap(), U256::from(50u64));
        assert_eq!(fraction.mul_truncate(U256::from(39u64)).unwrap(), U256::from(1u64));
        assert_eq!(Dec::zero().mul_truncate(U256::from(39u64)).unwrap(), U256::zero());
    }

    #[test]
    fn test_mul_truncate_overflow() {
        assert_eq!(Dec::one().mul_truncate(U256::MAX), Err(DecError::Overflow));
    }

    #[test]
    fn test_serde_as_string() {
        let dec: Dec = "0.5".parse().unwrap();
        let json = serde_json::to_string(&dec).unwrap();
        assert_eq!(json, "\"0.500000000000000000\"");
        assert_eq!(serde_json::from_str::<Dec>(&json).unwrap(), dec);
    }
}
