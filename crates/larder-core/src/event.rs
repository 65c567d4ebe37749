//! Shopping event type: one grocery trip.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a shopping event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One grocery trip grouping the batches bought together.
///
/// `total_cost` is the sum of the batches' paid prices, accrued as batches
/// are recorded. `total_waste` is a running sum maintained additively by the
/// waste recorder; every discard is applied to it exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingEvent {
    /// Event identifier.
    pub id: EventId,
    /// Date of the trip.
    pub date: NaiveDate,
    /// Where the shopping happened.
    pub place: String,
    /// Sum of the paid prices of this event's batches.
    pub total_cost: Decimal,
    /// Running sum of waste cost attributed to this event's batches.
    pub total_waste: Decimal,
}

impl ShoppingEvent {
    /// Create a new, empty shopping event.
    #[must_use]
    pub fn new(id: EventId, date: NaiveDate, place: impl Into<String>) -> Self {
        Self {
            id,
            date,
            place: place.into(),
            total_cost: Decimal::ZERO,
            total_waste: Decimal::ZERO,
        }
    }
}
