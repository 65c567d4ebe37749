//! Standard units and the kitchen unit conversion matrix.
//!
//! Every ingredient declares one [`Unit`] its stock is normalized to. The
//! [`UnitMatrix`] maps human kitchen units ("tbsp", "cup") to a multiplier
//! into that standard unit. The matrix is consumed by the allocator's
//! *caller*: a cook entry is converted before the ledger ever sees it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::quantity::Quantity;

/// The canonical measurement unit an ingredient's quantities are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Mass in grams.
    #[default]
    Gram,
    /// Volume in millilitres.
    Millilitre,
    /// Discrete pieces (eggs, apples).
    Count,
}

/// Error returned when parsing a [`Unit`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown standard unit: {0}")]
pub struct UnitParseError(pub String);

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Self::Gram),
            "ml" | "millilitre" | "millilitres" | "milliliter" => Ok(Self::Millilitre),
            "count" | "pc" | "pcs" | "piece" => Ok(Self::Count),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gram => write!(f, "g"),
            Self::Millilitre => write!(f, "ml"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Named kitchen units and their ratios to the standard unit.
///
/// A ratio is a plain multiplier: entering `2 tbsp` for an ingredient kept in
/// grams yields `2 × 15 = 30 g`. Ratios are reference data; they do not vary
/// per ingredient.
///
/// # Examples
///
/// ```
/// use larder_core::{Unit, UnitMatrix};
/// use rust_decimal_macros::dec;
///
/// let matrix = UnitMatrix::standard();
/// let q = matrix.convert("tbsp", dec!(2), Unit::Millilitre).unwrap();
/// assert_eq!(q.number, dec!(30));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMatrix {
    ratios: BTreeMap<String, Decimal>,
}

impl UnitMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default kitchen units: tablespoon (15), cup (200), teaspoon (5).
    #[must_use]
    pub fn standard() -> Self {
        let mut m = Self::new();
        m.insert("tbsp", Decimal::from(15));
        m.insert("cup", Decimal::from(200));
        m.insert("tsp", Decimal::from(5));
        m
    }

    /// Register a named unit with its ratio to the standard unit.
    pub fn insert(&mut self, name: impl Into<String>, ratio: Decimal) {
        self.ratios.insert(name.into(), ratio);
    }

    /// Look up the ratio for a named unit.
    #[must_use]
    pub fn ratio(&self, name: &str) -> Option<Decimal> {
        self.ratios.get(name).copied()
    }

    /// Convert an entered amount in a named unit to a standard-unit quantity.
    ///
    /// Returns `None` when the unit name is not in the matrix; the caller
    /// decides whether that means "already in the standard unit" or an error.
    #[must_use]
    pub fn convert(&self, name: &str, amount: Decimal, unit: Unit) -> Option<Quantity> {
        self.ratio(name)
            .map(|ratio| Quantity::new(amount * ratio, unit))
    }

    /// Iterate over the registered unit names and ratios.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.ratios.iter().map(|(name, ratio)| (name.as_str(), *ratio))
    }

    /// Check if the matrix has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("g".parse::<Unit>().unwrap(), Unit::Gram);
        assert_eq!("ML".parse::<Unit>().unwrap(), Unit::Millilitre);
        assert_eq!("count".parse::<Unit>().unwrap(), Unit::Count);
        assert!("stone".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_display_roundtrip() {
        for unit in [Unit::Gram, Unit::Millilitre, Unit::Count] {
            assert_eq!(unit.to_string().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_standard_matrix() {
        let matrix = UnitMatrix::standard();
        assert_eq!(matrix.ratio("tbsp"), Some(dec!(15)));
        assert_eq!(matrix.ratio("cup"), Some(dec!(200)));
        assert_eq!(matrix.ratio("tsp"), Some(dec!(5)));
        assert_eq!(matrix.ratio("pinch"), None);
    }

    #[test]
    fn test_convert() {
        let matrix = UnitMatrix::standard();

        let q = matrix.convert("tsp", dec!(3), Unit::Gram).unwrap();
        assert_eq!(q.number, dec!(15));
        assert_eq!(q.unit, Unit::Gram);

        assert!(matrix.convert("pinch", dec!(1), Unit::Gram).is_none());
    }

    #[test]
    fn test_insert_overrides() {
        let mut matrix = UnitMatrix::standard();
        matrix.insert("cup", dec!(240));
        assert_eq!(matrix.ratio("cup"), Some(dec!(240)));
    }
}
