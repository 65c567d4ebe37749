//! Usage reversal: undoing a consumption and restoring its stock.
//!
//! Every usage carries the trace of batches it drew from, so reversal
//! restores along that trace first. Draws can find their batch short of
//! space when other reversals refilled it in the meantime; whatever cannot
//! go back where it came from falls back to the oldest partially-depleted
//! batch, and any final residue lands on the most recently purchased batch
//! regardless of its depletion (the batch absorbs the adjustment, possibly
//! ending up above its purchased quantity).
//!
//! With interleaved usages the fallback tail is an approximation, not a true
//! inverse; only the traced portion is exact.

use larder_core::{BatchId, IngredientId, Quantity, UsageId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::LedgerError;
use crate::store::Ledger;

/// Receipt of a usage reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reversal {
    /// The usage that was removed.
    pub usage: UsageId,
    /// Quantity restored into batches (always the usage's full quantity).
    pub restored: Decimal,
    /// Per-batch restore amounts, by batch id.
    pub refills: Vec<(BatchId, Decimal)>,
}

impl Ledger {
    /// Reverse a usage: restore its quantity into the ledger and delete the
    /// record.
    ///
    /// Restoration and deletion are planned together and applied together;
    /// on any error the ledger is untouched and the usage still exists.
    /// Reversing the same usage twice fails with `UnknownUsage` on the
    /// second call.
    pub fn reverse_usage(&mut self, usage_id: UsageId) -> Result<Reversal, LedgerError> {
        let usage = self.require_usage(usage_id)?.clone();
        let ingredient = usage.ingredient;
        let mut left = usage.quantity.number;
        let mut planned: BTreeMap<BatchId, Decimal> = BTreeMap::new();

        // First along the allocation trace: put stock back where it came
        // from, capped by each batch's free space.
        for draw in &usage.draws {
            if left.is_zero() {
                break;
            }
            let Some(batch) = self.batch(draw.batch) else {
                continue;
            };
            let already = planned.get(&draw.batch).copied().unwrap_or_default();
            let space = batch.free_space() - already;
            let give = draw.quantity.min(space).min(left);
            if give.is_sign_positive() && !give.is_zero() {
                *planned.entry(draw.batch).or_default() += give;
                left -= give;
            }
        }

        // Residue goes to the oldest partially-depleted batches.
        if !left.is_zero() {
            let mut touched: Vec<_> = self
                .batches_of(ingredient)
                .filter(|b| b.is_touched())
                .map(|b| (b.fifo_key(), b.id, b.free_space()))
                .collect();
            touched.sort_unstable();
            for (_, id, space) in touched {
                if left.is_zero() {
                    break;
                }
                let already = planned.get(&id).copied().unwrap_or_default();
                let give = (space - already).min(left);
                if give.is_sign_positive() && !give.is_zero() {
                    *planned.entry(id).or_default() += give;
                    left -= give;
                }
            }
        }

        // Whatever is still unplaced lands on the most recent purchase,
        // past pristine if need be.
        if !left.is_zero() {
            let most_recent = self
                .batches_of(ingredient)
                .map(|b| ((b.purchase_date, b.id), b.id))
                .max()
                .map(|(_, id)| id);
            match most_recent {
                Some(id) => {
                    *planned.entry(id).or_default() += left;
                    left = Decimal::ZERO;
                }
                None => return Err(LedgerError::NoRestoreTarget(ingredient)),
            }
        }

        // Apply: refill batches and drop the record in one step.
        let unit = usage.quantity.unit;
        for (&id, &amount) in &planned {
            let batch = self.batch_mut(id);
            batch.remaining += &Quantity::new(amount, unit);
        }
        self.touch_ingredient(ingredient);
        self.remove_usage(usage_id);

        let refills: Vec<_> = planned.into_iter().collect();
        debug!(usage = %usage_id, restored = %usage.quantity.number, "reversed usage");
        Ok(Reversal {
            usage: usage_id,
            restored: usage.quantity.number,
            refills,
        })
    }

    /// Like [`Ledger::reverse_usage`], guarded by an optimistic revision
    /// check on the usage's ingredient.
    pub fn reverse_usage_checked(
        &mut self,
        usage_id: UsageId,
        expected_revision: u64,
    ) -> Result<Reversal, LedgerError> {
        let ingredient = self.require_usage(usage_id)?.ingredient;
        self.check_revision(ingredient, expected_revision)?;
        self.reverse_usage(usage_id)
    }

    /// The ingredient a reversal would touch, for callers that need to read
    /// a revision before going through the checked variant.
    pub fn usage_ingredient(&self, usage_id: UsageId) -> Result<IngredientId, LedgerError> {
        Ok(self.require_usage(usage_id)?.ingredient)
    }
}
