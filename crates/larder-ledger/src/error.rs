//! Ledger error types.

use larder_core::{BatchId, EventId, IngredientId, Unit, UsageId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error that can occur during a ledger operation.
///
/// None of the operations retry; a failed operation returns before any
/// mutation is applied, leaving the ledger at its prior state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ingredient id is not in the ledger.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(IngredientId),

    /// The batch id is not in the ledger.
    #[error("unknown batch: {0}")]
    UnknownBatch(BatchId),

    /// The usage id is not in the ledger (possibly already reversed).
    #[error("unknown usage: {0}")]
    UnknownUsage(UsageId),

    /// The shopping event id is not in the ledger.
    #[error("unknown shopping event: {0}")]
    UnknownEvent(EventId),

    /// A negative quantity, or one exceeding what is available.
    #[error("invalid quantity: requested {requested}, available {available}")]
    InvalidQuantity {
        /// Quantity the caller asked for.
        requested: Decimal,
        /// Quantity that was actually available.
        available: Decimal,
    },

    /// A quantity was expressed in a different unit than the ingredient's.
    #[error("unit mismatch: expected {expected}, got {got}")]
    UnitMismatch {
        /// The ingredient's standard unit.
        expected: Unit,
        /// The unit the quantity arrived in.
        got: Unit,
    },

    /// A reversal found no batch at all to restore stock into.
    #[error("no batch to restore into for ingredient {0}")]
    NoRestoreTarget(IngredientId),

    /// The ingredient was mutated since the caller last observed it.
    #[error("revision conflict on ingredient {ingredient}: expected {expected}, found {found}")]
    RevisionConflict {
        /// The ingredient whose revision did not match.
        ingredient: IngredientId,
        /// Revision the caller expected.
        expected: u64,
        /// Revision actually in the ledger.
        found: u64,
    },
}
