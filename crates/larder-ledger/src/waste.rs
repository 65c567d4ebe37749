//! The waste recorder: discarding batch stock and attributing its cost.
//!
//! A discard moves quantity from `remaining` to `discarded` at the batch's
//! unit cost and accrues the waste cost onto the owning shopping event's
//! running total. The event total is maintained additively — each discard is
//! applied to it exactly once — so repeated partial discards accumulate
//! correctly.
//!
//! Reverting a discard is unsupported: there is no inverse operation. What
//! went in the bin stays in the bin.

use larder_core::{BatchId, BatchStatus, Quantity};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::LedgerError;
use crate::store::Ledger;

impl Ledger {
    /// Discard stock from a batch and return the waste cost.
    ///
    /// `amount` defaults to the batch's full remaining quantity. Discarding
    /// more than remains (or a negative amount) fails with `InvalidQuantity`
    /// and leaves the batch unmodified. When the discard empties the batch,
    /// its status flips to `discarded`.
    pub fn discard(
        &mut self,
        batch: BatchId,
        amount: Option<Decimal>,
    ) -> Result<Decimal, LedgerError> {
        let target = self.require_batch(batch)?;
        let remaining = target.remaining.number;
        let amount = amount.unwrap_or(remaining);
        if amount.is_sign_negative() || amount > remaining {
            return Err(LedgerError::InvalidQuantity {
                requested: amount,
                available: remaining,
            });
        }

        let unit = target.remaining.unit;
        let ingredient = target.ingredient;
        let event = target.event;
        let waste_cost = amount * target.unit_cost;

        let target = self.batch_mut(batch);
        target.remaining -= &Quantity::new(amount, unit);
        target.discarded_quantity += &Quantity::new(amount, unit);
        target.discarded_cost += waste_cost;
        if target.remaining.is_zero() {
            target.status = BatchStatus::Discarded;
        }

        if let Some(event_id) = event {
            if let Some(evt) = self.event_mut(event_id) {
                evt.total_waste += waste_cost;
            }
        }
        self.touch_ingredient(ingredient);

        debug!(batch = %batch, amount = %amount, waste_cost = %waste_cost, "discarded stock");
        Ok(waste_cost)
    }

    /// Discard a batch's entire remaining stock, idempotently.
    ///
    /// A no-op returning zero when the batch is already `discarded`;
    /// otherwise equivalent to [`Ledger::discard`] with the default amount.
    pub fn set_fully_discarded(&mut self, batch: BatchId) -> Result<Decimal, LedgerError> {
        if self.require_batch(batch)?.status == BatchStatus::Discarded {
            return Ok(Decimal::ZERO);
        }
        self.discard(batch, None)
    }

    /// Like [`Ledger::discard`], guarded by an optimistic revision check on
    /// the batch's ingredient.
    pub fn discard_checked(
        &mut self,
        batch: BatchId,
        expected_revision: u64,
        amount: Option<Decimal>,
    ) -> Result<Decimal, LedgerError> {
        let ingredient = self.require_batch(batch)?.ingredient;
        self.check_revision(ingredient, expected_revision)?;
        self.discard(batch, amount)
    }
}
