//! Quantity type representing a decimal number with a measurement unit.
//!
//! A [`Quantity`] is the fundamental stock measure in larder, combining a
//! decimal number with the standard unit it is expressed in. Arithmetic is
//! only defined between quantities of the same unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::units::Unit;

/// A quantity is a number paired with a standard unit.
///
/// # Examples
///
/// ```
/// use larder_core::{Quantity, Unit};
/// use rust_decimal_macros::dec;
///
/// let stock = Quantity::new(dec!(500), Unit::Gram);
/// assert_eq!(stock.number, dec!(500));
/// assert_eq!(stock.unit, Unit::Gram);
///
/// // Arithmetic operations
/// let used = Quantity::new(dec!(120), Unit::Gram);
/// let left = &stock - &used;
/// assert_eq!(left.number, dec!(380));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantity {
    /// The decimal amount
    pub number: Decimal,
    /// The unit the amount is expressed in
    pub unit: Unit,
}

impl Quantity {
    /// Create a new quantity.
    #[must_use]
    pub const fn new(number: Decimal, unit: Unit) -> Self {
        Self { number, unit }
    }

    /// Create a zero quantity with the given unit.
    #[must_use]
    pub const fn zero(unit: Unit) -> Self {
        Self {
            number: Decimal::ZERO,
            unit,
        }
    }

    /// Check if the quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// Check if the quantity is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.number.is_sign_positive() && !self.number.is_zero()
    }

    /// Check if the quantity is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.number.is_sign_negative() && !self.number.is_zero()
    }

    /// Get the absolute value of this quantity.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            number: self.number.abs(),
            unit: self.unit,
        }
    }

    /// Return the smaller of this quantity and `other`.
    #[must_use]
    pub fn min(&self, other: &Self) -> Self {
        debug_assert_eq!(
            self.unit, other.unit,
            "Cannot compare quantities with different units"
        );
        Self {
            number: self.number.min(other.number),
            unit: self.unit,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.unit)
    }
}

// Arithmetic operations on references

impl Add for &Quantity {
    type Output = Quantity;

    fn add(self, other: &Quantity) -> Quantity {
        debug_assert_eq!(
            self.unit, other.unit,
            "Cannot add quantities with different units"
        );
        Quantity {
            number: self.number + other.number,
            unit: self.unit,
        }
    }
}

impl Sub for &Quantity {
    type Output = Quantity;

    fn sub(self, other: &Quantity) -> Quantity {
        debug_assert_eq!(
            self.unit, other.unit,
            "Cannot subtract quantities with different units"
        );
        Quantity {
            number: self.number - other.number,
            unit: self.unit,
        }
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity {
            number: -self.number,
            unit: self.unit,
        }
    }
}

// Arithmetic operations on owned values

impl Add for Quantity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Neg for Quantity {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl AddAssign<&Self> for Quantity {
    fn add_assign(&mut self, other: &Self) {
        debug_assert_eq!(
            self.unit, other.unit,
            "Cannot add quantities with different units"
        );
        self.number += other.number;
    }
}

impl SubAssign<&Self> for Quantity {
    fn sub_assign(&mut self, other: &Self) {
        debug_assert_eq!(
            self.unit, other.unit,
            "Cannot subtract quantities with different units"
        );
        self.number -= other.number;
    }
}
