//! Usage type: one consumption record and its allocation trace.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::batch::BatchId;
use crate::ingredient::IngredientId;
use crate::quantity::Quantity;

/// Identifier of a usage record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UsageId(pub u64);

impl fmt::Display for UsageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One slice of an allocation: what was taken from a single batch.
///
/// The draws of a usage are its provenance; reversal restores along them
/// instead of guessing which batches the usage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    /// The batch that was drawn from.
    pub batch: BatchId,
    /// Quantity taken, in the ingredient's standard unit.
    pub quantity: Decimal,
    /// Cost of the taken quantity at the batch's unit cost.
    pub cost: Decimal,
}

/// One consumption record.
///
/// The cost is computed by the FIFO allocator at creation time and never
/// changes afterwards; deleting the record (via reversal) undoes its ledger
/// effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Usage identifier.
    pub id: UsageId,
    /// The ingredient consumed.
    pub ingredient: IngredientId,
    /// Date of consumption.
    pub date: NaiveDate,
    /// Meal or category label ("breakfast", "dinner", ...).
    pub meal: String,
    /// The amount as the human entered it ("2 tbsp").
    pub entered: String,
    /// Quantity converted to the ingredient's standard unit.
    pub quantity: Quantity,
    /// FIFO-computed cost of this consumption.
    pub cost: Decimal,
    /// The batches this usage actually drew from.
    pub draws: Vec<Draw>,
}

impl Usage {
    /// Total quantity the draws actually depleted.
    ///
    /// Less than `quantity` when the allocation ran short of stock.
    #[must_use]
    pub fn drawn(&self) -> Decimal {
        self.draws.iter().map(|d| d.quantity).sum()
    }
}
