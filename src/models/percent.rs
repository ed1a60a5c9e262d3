//! Percentage type with four decimal places of precision
//!
//! Stored as a scaled integer (1% == 10,000 units) so that percentage
//! columns survive export/import byte-for-byte, like Money does for cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::money::{round_div, Money};

/// A percentage stored as units of 1/10,000th of a percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    /// Scaled units in 100% (the divisor when applying a percentage to cents)
    pub(crate) const UNITS_PER_WHOLE: i128 = 1_000_000;

    /// Scaled units in 1%
    pub const UNITS_PER_PERCENT: i64 = 10_000;

    /// Create from raw scaled units (1% == 10,000)
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Create from a whole number of percent
    ///
    /// # Examples
    /// ```
    /// use topsheet::models::Percent;
    /// let p = Percent::from_percent(15); // 15%
    /// assert_eq!(p.units(), 150_000);
    /// ```
    pub const fn from_percent(percent: i64) -> Self {
        Self(percent * Self::UNITS_PER_PERCENT)
    }

    /// Create a zero percentage
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw scaled units
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Check if the percentage is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the percentage is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Derive the percentage that `part` is of `whole`
    ///
    /// Returns zero when `whole` is zero or negative, since no meaningful
    /// ratio exists against an empty base.
    pub fn ratio_of(part: Money, whole: Money) -> Self {
        if whole.cents() <= 0 {
            return Self::zero();
        }
        Self(round_div(
            part.cents() as i128 * Self::UNITS_PER_WHOLE,
            whole.cents() as i128,
        ))
    }

    /// Parse a percentage from a string
    ///
    /// Accepts formats: "12.5", "12.5%", "12", "-3.25", "0.0001"
    pub fn parse(s: &str) -> Result<Self, PercentParseError> {
        let s = s.trim();
        let s = s.strip_suffix('%').unwrap_or(s).trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        if s.is_empty() {
            return Err(PercentParseError::InvalidFormat(s.to_string()));
        }

        let (whole_str, frac_str) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let whole: i64 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| PercentParseError::InvalidFormat(s.to_string()))?
        };

        // Pad or truncate the fraction to 4 digits
        let frac_digits = &frac_str[..frac_str.len().min(4)];
        let frac: i64 = if frac_digits.is_empty() {
            0
        } else {
            frac_digits
                .parse::<i64>()
                .map_err(|_| PercentParseError::InvalidFormat(s.to_string()))?
                * 10_i64.pow((4 - frac_digits.len()) as u32)
        };

        let units = whole * Self::UNITS_PER_PERCENT + frac;
        Ok(Self(if negative { -units } else { units }))
    }
}

impl Default for Percent {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.abs();
        let whole = units / Self::UNITS_PER_PERCENT;
        let frac = units % Self::UNITS_PER_PERCENT;

        if frac == 0 {
            write!(f, "{}{}%", sign, whole)
        } else {
            let mut frac_str = format!("{:04}", frac);
            while frac_str.ends_with('0') {
                frac_str.pop();
            }
            write!(f, "{}{}.{}%", sign, whole, frac_str)
        }
    }
}

impl Add for Percent {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Percent {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Percent {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Percent {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Percent {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Percent {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Percent::zero(), |acc, p| acc + p)
    }
}

/// Error type for percentage parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentParseError {
    InvalidFormat(String),
}

impl fmt::Display for PercentParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentParseError::InvalidFormat(s) => write!(f, "Invalid percentage format: {}", s),
        }
    }
}

impl std::error::Error for PercentParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_percent() {
        assert_eq!(Percent::from_percent(1).units(), 10_000);
        assert_eq!(Percent::from_percent(100).units(), 1_000_000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Percent::parse("12.5").unwrap().units(), 125_000);
        assert_eq!(Percent::parse("12.5%").unwrap().units(), 125_000);
        assert_eq!(Percent::parse("12").unwrap().units(), 120_000);
        assert_eq!(Percent::parse("-3.25").unwrap().units(), -32_500);
        assert_eq!(Percent::parse("0.0001").unwrap().units(), 1);
        assert_eq!(Percent::parse("100").unwrap().units(), 1_000_000);
        assert!(Percent::parse("abc").is_err());
        assert!(Percent::parse("").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Percent::from_percent(12)), "12%");
        assert_eq!(format!("{}", Percent::from_units(125_000)), "12.5%");
        assert_eq!(format!("{}", Percent::from_units(1)), "0.0001%");
        assert_eq!(format!("{}", Percent::from_units(-32_500)), "-3.25%");
        assert_eq!(format!("{}", Percent::zero()), "0%");
    }

    #[test]
    fn test_parse_display_round_trip() {
        for units in [0, 1, 10_000, 125_000, 333_333, 1_000_000] {
            let p = Percent::from_units(units);
            assert_eq!(Percent::parse(&p.to_string()).unwrap(), p);
        }
    }

    #[test]
    fn test_ratio_of() {
        let part = Money::from_cents(25_000);
        let whole = Money::from_cents(100_000);
        assert_eq!(Percent::ratio_of(part, whole).units(), 250_000); // 25%

        // A third rounds at the fourth decimal place
        let third = Percent::ratio_of(Money::from_cents(1), Money::from_cents(3));
        assert_eq!(third.units(), 333_333); // 33.3333%

        assert_eq!(Percent::ratio_of(part, Money::zero()), Percent::zero());
    }

    #[test]
    fn test_serialization() {
        let p = Percent::from_units(125_000);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "125000");

        let deserialized: Percent = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }
}
