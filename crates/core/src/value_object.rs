//! Value objects: equality by value, not identity.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Marker trait for value objects.
///
/// Value objects are immutable, compared by their attribute values, and have
/// no identity of their own. `Money` is the one every ERP page leans on.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Monetary amount in the smallest currency unit (cents).
///
/// Currency is a page/config concern; amounts on one page share a currency.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Amount in major units as a float (for ratios and conversions only).
    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Build from a major-unit float, rounding to the nearest cent.
    pub fn from_major_f64(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// `pct` percent of this amount, rounded to the nearest cent.
    pub fn percent_of(self, pct: f64) -> Money {
        Money((self.0 as f64 * pct / 100.0).round() as i64)
    }

    /// `self * num / den` in integer arithmetic, truncating toward zero.
    ///
    /// A zero denominator yields zero.
    pub fn scale(self, num: i64, den: i64) -> Money {
        if den == 0 {
            return Money::ZERO;
        }
        let scaled = i128::from(self.0) * i128::from(num) / i128::from(den);
        Money(scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Parse a user-typed amount such as `1234`, `1,234.5` or `-12.05`.
    pub fn parse(input: &str) -> Result<Money, DomainError> {
        let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        if digits.is_empty() {
            return Err(DomainError::validation("amount is empty"));
        }

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DomainError::validation("amount has no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!("'{input}' is not a number")));
        }
        if fraction.len() > 2 {
            return Err(DomainError::validation("amount has more than two decimal places"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| DomainError::validation("amount is too large"))?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(|| DomainError::validation("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{grouped}.{:02}", abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> core::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_inputs() {
        assert_eq!(Money::parse("1200").unwrap(), Money::from_cents(120_000));
        assert_eq!(Money::parse("1,234.5").unwrap(), Money::from_cents(123_450));
        assert_eq!(Money::parse(" 0.99 ").unwrap(), Money::from_cents(99));
        assert_eq!(Money::parse(".5").unwrap(), Money::from_cents(50));
        assert_eq!(Money::parse("-12.05").unwrap(), Money::from_cents(-1205));
    }

    #[test]
    fn rejects_malformed_inputs() {
        for bad in ["", "-", "abc", "12.345", "1.2.3", "12e3", "."] {
            assert!(Money::parse(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn displays_with_grouping_and_cents() {
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "1,234,567.89");
        assert_eq!(Money::from_cents(-100_000).to_string(), "-1,000.00");
    }

    #[test]
    fn percent_of_rounds_to_nearest_cent() {
        assert_eq!(Money::from_cents(1000).percent_of(12.5), Money::from_cents(125));
        assert_eq!(Money::from_cents(333).percent_of(10.0), Money::from_cents(33));
    }

    #[test]
    fn scale_handles_zero_denominator() {
        assert_eq!(Money::from_major(10).scale(1, 4), Money::from_cents(250));
        assert_eq!(Money::from_major(10).scale(1, 0), Money::ZERO);
    }

    #[test]
    fn sums_iterators() {
        let total: Money = [Money::from_major(1), Money::from_major(2)].iter().sum();
        assert_eq!(total, Money::from_major(3));
    }
}
