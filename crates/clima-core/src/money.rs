//! # Money Module
//!
//! Provides the `Money` type and the rounding contract used by the pricing
//! engine.
//!
//! ## Precision Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE ROUNDING HAPPENS                                                 │
//! │                                                                         │
//! │  Copper weight ──► round_to(x, 3)   (kg, thousandths)                   │
//! │  Copper price  ──► round_to(x, 2)   (derived from the ROUNDED weight)   │
//! │                                                                         │
//! │  Everything else (line totals, subtotals, discount, total) keeps full  │
//! │  floating precision. Two-decimal rounding is a display concern only.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities can be fractional (meters of tube, kilograms of gas), so
//! amounts are `f64` rather than integer cents.
//!
//! ## Usage
//! ```rust
//! use clima_core::money::Money;
//!
//! let unit_price = Money::new(12.0);
//! let line_total = unit_price * 2.5;
//! assert_eq!(line_total.amount(), 30.0);
//! assert_eq!(line_total.to_string(), "R$ 30,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds `value` to `places` decimal places, half away from zero.
///
/// ## Example
/// ```rust
/// use clima_core::money::round_to;
///
/// assert_eq!(round_to(1.3625, 3), 1.363);
/// assert_eq!(round_to(-0.125, 2), -0.13);
/// assert_eq!(round_to(102.15, 2), 102.15);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in Brazilian Reais.
///
/// ## Design Decisions
/// - **f64**: quantities are fractional and the only mandated intermediate
///   rounding is the copper formula's, so amounts keep full precision
/// - **Signed**: a large fixed discount can drive a total below zero and
///   the engine surfaces it as-is
/// - **Single field tuple struct**: zero-cost wrapper with serde support
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(f64);

impl Money {
    /// Creates a Money value from an amount in Reais.
    #[inline]
    pub const fn new(amount: f64) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0.0)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Returns the amount rounded to cents (for display and documents).
    ///
    /// ## Example
    /// ```rust
    /// use clima_core::money::Money;
    ///
    /// assert_eq!(Money::new(30.826).rounded().amount(), 30.83);
    /// ```
    #[inline]
    pub fn rounded(&self) -> Money {
        Money(round_to(self.0, 2))
    }

    /// Applies a percentage to this amount (`amount * pct / 100`).
    ///
    /// ## Example
    /// ```rust
    /// use clima_core::money::Money;
    ///
    /// let discount = Money::new(250.0).percentage(10.0);
    /// assert_eq!(discount.amount(), 25.0);
    /// ```
    #[inline]
    pub fn percentage(&self, pct: f64) -> Money {
        Money(self.0 * pct / 100.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian Real formatting: `R$ 1.234,56`, negatives as `-R$ 5,50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = (self.0.abs() * 100.0).round() as u64;
        let sign = if self.0 < 0.0 && cents > 0 { "-" } else { "" };
        let reais = (cents / 100).to_string();

        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, ch) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, cents % 100)
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<f64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: f64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.362, 3), 1.362);
        assert_eq!(round_to(0.0005, 3), 0.001);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(10.99).to_string(), "R$ 10,99");
        assert_eq!(Money::new(5.0).to_string(), "R$ 5,00");
        assert_eq!(Money::new(-5.5).to_string(), "-R$ 5,50");
        assert_eq!(Money::new(0.0).to_string(), "R$ 0,00");
        assert_eq!(Money::new(1234.56).to_string(), "R$ 1.234,56");
        assert_eq!(Money::new(1234567.0).to_string(), "R$ 1.234.567,00");
    }

    #[test]
    fn test_display_negative_zero_has_no_sign() {
        assert_eq!(Money::new(-0.001).to_string(), "R$ 0,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(100.0);
        let b = Money::new(40.0);

        assert_eq!((a + b).amount(), 140.0);
        assert_eq!((a - b).amount(), 60.0);
        assert_eq!((b * 1.5).amount(), 60.0);
        assert_eq!((-a).amount(), -100.0);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::new(1.0), Money::new(2.5), Money::new(3.0)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.amount(), 6.5);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(Money::new(1000.0).percentage(10.0).amount(), 100.0);
        assert!(Money::new(0.0).percentage(50.0).is_zero());
    }
}
