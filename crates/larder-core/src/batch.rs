//! Batch type representing one purchase lot of an ingredient.
//!
//! A [`Batch`] is the unit of FIFO accounting: it carries the quantity bought,
//! the quantity still on hand, a per-unit cost fixed at purchase time, and the
//! waste attributed to it. Batches are permanent ledger history; they are
//! depleted and refilled but never deleted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::EventId;
use crate::ingredient::IngredientId;
use crate::quantity::Quantity;

/// Identifier of a purchase batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// The batch still holds (or held) stock available to consume.
    #[default]
    Active,
    /// The batch's remaining stock has been fully discarded.
    Discarded,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

/// One purchase lot of an ingredient.
///
/// Invariants maintained by the ledger operations:
/// `0 ≤ remaining ≤ quantity` and
/// `discarded + remaining + consumed-to-date = quantity`.
/// The unit cost is fixed at creation and never changes.
///
/// # Examples
///
/// ```
/// use larder_core::{Batch, BatchId, IngredientId, Quantity, Unit};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let batch = Batch::new(
///     BatchId(7),
///     IngredientId(2),
///     Quantity::new(dec!(12), Unit::Count),
///     dec!(0.35),
///     NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
/// )
/// .with_expiry(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
///
/// assert_eq!(batch.paid_price(), dec!(4.20));
/// assert!(batch.expiry_date.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch identifier.
    pub id: BatchId,
    /// The ingredient this batch belongs to.
    pub ingredient: IngredientId,
    /// The shopping event this batch was bought in, if any.
    pub event: Option<EventId>,
    /// Date of purchase.
    pub purchase_date: NaiveDate,
    /// Expiry date, when known.
    pub expiry_date: Option<NaiveDate>,
    /// Quantity originally bought.
    pub quantity: Quantity,
    /// Quantity still on hand.
    pub remaining: Quantity,
    /// Cost per standard unit, fixed at creation.
    pub unit_cost: Decimal,
    /// Quantity discarded as waste.
    pub discarded_quantity: Quantity,
    /// Cost of the discarded quantity.
    pub discarded_cost: Decimal,
    /// Lifecycle status.
    pub status: BatchStatus,
}

impl Batch {
    /// Create a new, full batch.
    #[must_use]
    pub fn new(
        id: BatchId,
        ingredient: IngredientId,
        quantity: Quantity,
        unit_cost: Decimal,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            ingredient,
            event: None,
            purchase_date,
            expiry_date: None,
            quantity,
            remaining: quantity,
            unit_cost,
            discarded_quantity: Quantity::zero(quantity.unit),
            discarded_cost: Decimal::ZERO,
            status: BatchStatus::Active,
        }
    }

    /// Attach an expiry date.
    #[must_use]
    pub const fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    /// Attach the owning shopping event.
    #[must_use]
    pub const fn with_event(mut self, event: EventId) -> Self {
        self.event = Some(event);
        self
    }

    /// The price paid for the whole batch.
    #[must_use]
    pub fn paid_price(&self) -> Decimal {
        self.quantity.number * self.unit_cost
    }

    /// Current value of the stock still on hand.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.remaining.number * self.unit_cost
    }

    /// How much quantity could be restored before the batch is full again.
    #[must_use]
    pub fn free_space(&self) -> Decimal {
        self.quantity.number - self.remaining.number
    }

    /// Quantity consumed so far (neither on hand nor discarded).
    #[must_use]
    pub fn consumed(&self) -> Decimal {
        self.quantity.number - self.remaining.number - self.discarded_quantity.number
    }

    /// Check whether there is any stock left to draw from.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Whether the batch is partially or fully drawn down.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.remaining.number < self.quantity.number
    }

    /// Days until expiry relative to `today`; `None` when no expiry is set.
    ///
    /// Negative values mean the batch is already past its date.
    #[must_use]
    pub fn days_until_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry_date
            .map(|expiry| (expiry - today).num_days())
    }

    /// FIFO ordering key: purchase date, then expiry, then id.
    ///
    /// Batches without an expiry sort after those with one bought the same
    /// day; the id keeps the order deterministic regardless of how the
    /// batches were inserted.
    #[must_use]
    pub fn fifo_key(&self) -> (NaiveDate, NaiveDate, BatchId) {
        (
            self.purchase_date,
            self.expiry_date.unwrap_or(NaiveDate::MAX),
            self.id,
        )
    }
}
