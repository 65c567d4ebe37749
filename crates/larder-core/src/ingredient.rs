//! Ingredient type and its tracking mode.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::Unit;

/// Identifier of an ingredient.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IngredientId(pub u64);

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How precisely an ingredient's consumption is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Every use is measured and costed exactly.
    #[default]
    Precision,
    /// Rough bookkeeping; entries are estimates.
    Simple,
}

/// An ingredient: the thing batches and usages hang off.
///
/// The `revision` counter increments on every ledger mutation that touches
/// this ingredient's batches; callers holding a stale view can detect lost
/// updates by passing their expected revision to the `*_checked` operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient identifier.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Free-form category ("dairy", "meat", ...).
    pub category: String,
    /// Tracking mode.
    pub mode: TrackingMode,
    /// The standard unit all quantities of this ingredient are expressed in.
    pub unit: Unit,
    /// Mutation counter for optimistic concurrency checks.
    pub revision: u64,
}

impl Ingredient {
    /// Create a new ingredient.
    #[must_use]
    pub fn new(id: IngredientId, name: impl Into<String>, unit: Unit) -> Self {
        Self {
            id,
            name: name.into(),
            category: String::from("general"),
            mode: TrackingMode::Precision,
            unit,
            revision: 0,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the tracking mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TrackingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bump the revision counter.
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let ing = Ingredient::new(IngredientId(1), "milk", Unit::Millilitre)
            .with_category("dairy")
            .with_mode(TrackingMode::Simple);

        assert_eq!(ing.name, "milk");
        assert_eq!(ing.category, "dairy");
        assert_eq!(ing.mode, TrackingMode::Simple);
        assert_eq!(ing.revision, 0);
    }

    #[test]
    fn test_touch() {
        let mut ing = Ingredient::new(IngredientId(1), "milk", Unit::Millilitre);
        ing.touch();
        ing.touch();
        assert_eq!(ing.revision, 2);
    }
}
