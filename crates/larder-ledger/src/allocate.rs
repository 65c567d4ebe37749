//! The FIFO allocator: costing a consumption by depleting the oldest stock
//! first.
//!
//! Allocation walks the ingredient's batches with remaining stock in FIFO
//! order (purchase date, then expiry with no-expiry last, then id), takes
//! `min(remaining, still needed)` from each, and prices every take at that
//! batch's unit cost. The walk is planned read-only; batches are only
//! mutated once the whole plan exists, together with the insertion of the
//! usage record, so the cost figure and the ledger mutation land atomically.

use chrono::NaiveDate;
use larder_core::{BatchId, Draw, IngredientId, Quantity, Usage, UsageId};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::LedgerError;
use crate::store::Ledger;

/// A consumption request, already converted to the ingredient's standard
/// unit by the caller (see `UnitMatrix`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRequest {
    /// Date of consumption.
    pub date: NaiveDate,
    /// Meal or category label.
    pub meal: String,
    /// The amount as the human entered it ("2 tbsp").
    pub entered: String,
    /// Quantity to consume, in the ingredient's standard unit.
    pub quantity: Quantity,
}

/// Receipt of a FIFO allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The usage record created for this consumption.
    pub usage: UsageId,
    /// Total cost of the allocated stock.
    pub cost: Decimal,
    /// Quantity the caller asked for.
    pub requested: Decimal,
    /// Quantity actually drawn from batches.
    pub allocated: Decimal,
    /// Requested minus allocated; non-zero when stock ran out. Shortfall is
    /// never charged: there is no batch to price it from.
    pub shortfall: Decimal,
    /// The per-batch takes, oldest batch first.
    pub draws: Vec<Draw>,
}

impl Ledger {
    /// Batch ids of an ingredient with remaining stock, in FIFO order.
    #[must_use]
    pub fn fifo_order(&self, ingredient: IngredientId) -> Vec<BatchId> {
        let mut ids: Vec<_> = self
            .batches_of(ingredient)
            .filter(|b| b.remaining.is_positive())
            .map(|b| (b.fifo_key(), b.id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Unit cost of the batch FIFO would consume next, if any stock remains.
    #[must_use]
    pub fn next_unit_cost(&self, ingredient: IngredientId) -> Option<Decimal> {
        self.fifo_order(ingredient)
            .first()
            .and_then(|id| self.batch(*id))
            .map(|b| b.unit_cost)
    }

    /// Allocate stock for a consumption and record the usage.
    ///
    /// Returns the cost receipt; see [`Allocation`]. When the ingredient's
    /// batches run out before the request is filled, the shortfall is
    /// reported on the receipt (and logged) but not charged.
    pub fn allocate(
        &mut self,
        ingredient: IngredientId,
        request: UsageRequest,
    ) -> Result<Allocation, LedgerError> {
        let owner = self.require_ingredient(ingredient)?;
        if request.quantity.unit != owner.unit {
            return Err(LedgerError::UnitMismatch {
                expected: owner.unit,
                got: request.quantity.unit,
            });
        }
        if request.quantity.is_negative() {
            let available: Decimal = self
                .batches_of(ingredient)
                .map(|b| b.remaining.number)
                .sum();
            return Err(LedgerError::InvalidQuantity {
                requested: request.quantity.number,
                available,
            });
        }

        // Plan the walk without touching anything.
        let requested = request.quantity.number;
        let mut still_needed = requested;
        let mut draws = Vec::new();
        for id in self.fifo_order(ingredient) {
            if still_needed.is_zero() {
                break;
            }
            let batch = self.require_batch(id)?;
            let take = batch.remaining.number.min(still_needed);
            draws.push(Draw {
                batch: id,
                quantity: take,
                cost: take * batch.unit_cost,
            });
            still_needed -= take;
        }

        let allocated = requested - still_needed;
        let cost: Decimal = draws.iter().map(|d| d.cost).sum();
        if !still_needed.is_zero() {
            warn!(
                ingredient = %ingredient,
                requested = %requested,
                shortfall = %still_needed,
                "allocation ran out of stock; shortfall is uncosted"
            );
        }

        // Apply: deplete batches, record the usage. Nothing below can fail.
        for draw in &draws {
            let unit = request.quantity.unit;
            let batch = self.batch_mut(draw.batch);
            batch.remaining -= &Quantity::new(draw.quantity, unit);
            debug_assert!(!batch.remaining.is_negative());
        }
        self.touch_ingredient(ingredient);

        let usage = self.next_usage_id();
        self.insert_usage(Usage {
            id: usage,
            ingredient,
            date: request.date,
            meal: request.meal,
            entered: request.entered,
            quantity: request.quantity,
            cost,
            draws: draws.clone(),
        });

        Ok(Allocation {
            usage,
            cost,
            requested,
            allocated,
            shortfall: still_needed,
            draws,
        })
    }

    /// Like [`Ledger::allocate`], guarded by an optimistic revision check.
    ///
    /// Fails with `RevisionConflict` when the ingredient was mutated since
    /// the caller observed `expected_revision`.
    pub fn allocate_checked(
        &mut self,
        ingredient: IngredientId,
        expected_revision: u64,
        request: UsageRequest,
    ) -> Result<Allocation, LedgerError> {
        self.check_revision(ingredient, expected_revision)?;
        self.allocate(ingredient, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::Unit;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn request(n: Decimal) -> UsageRequest {
        UsageRequest {
            date: date(2024, 4, 10),
            meal: "dinner".into(),
            entered: format!("{n} g"),
            quantity: Quantity::new(n, Unit::Gram),
        }
    }

    /// Two batches, the worked example from the ledger's books:
    /// A qty 10 @ 2 bought day 1, B qty 10 @ 3 bought day 2.
    fn two_batch_ledger() -> (Ledger, IngredientId) {
        let mut ledger = Ledger::new();
        let pork = ledger.add_ingredient("pork belly", Unit::Gram);
        ledger
            .record_batch(
                pork,
                Quantity::new(dec!(10), Unit::Gram),
                dec!(2),
                date(2024, 4, 1),
                None,
                None,
            )
            .unwrap();
        ledger
            .record_batch(
                pork,
                Quantity::new(dec!(10), Unit::Gram),
                dec!(3),
                date(2024, 4, 2),
                None,
                None,
            )
            .unwrap();
        (ledger, pork)
    }

    #[test]
    fn test_allocate_spans_batches_oldest_first() {
        let (mut ledger, pork) = two_batch_ledger();

        let allocation = ledger.allocate(pork, request(dec!(15))).unwrap();

        // 10 × 2 + 5 × 3
        assert_eq!(allocation.cost, dec!(35));
        assert_eq!(allocation.allocated, dec!(15));
        assert!(allocation.shortfall.is_zero());

        let mut batches = ledger.batches_of(pork);
        assert_eq!(batches.next().unwrap().remaining.number, dec!(0));
        assert_eq!(batches.next().unwrap().remaining.number, dec!(5));
    }

    #[test]
    fn test_allocate_records_draws() {
        let (mut ledger, pork) = two_batch_ledger();

        let allocation = ledger.allocate(pork, request(dec!(15))).unwrap();
        assert_eq!(allocation.draws.len(), 2);
        assert_eq!(allocation.draws[0].quantity, dec!(10));
        assert_eq!(allocation.draws[0].cost, dec!(20));
        assert_eq!(allocation.draws[1].quantity, dec!(5));
        assert_eq!(allocation.draws[1].cost, dec!(15));

        let usage = ledger.usage(allocation.usage).unwrap();
        assert_eq!(usage.draws, allocation.draws);
        assert_eq!(usage.cost, dec!(35));
    }

    #[test]
    fn test_allocate_exact_stock_empties_everything() {
        let (mut ledger, pork) = two_batch_ledger();

        let allocation = ledger.allocate(pork, request(dec!(20))).unwrap();
        assert_eq!(allocation.cost, dec!(50));
        assert!(ledger.batches_of(pork).all(|b| b.remaining.is_zero()));
    }

    #[test]
    fn test_allocate_shortfall_is_uncosted() {
        let (mut ledger, pork) = two_batch_ledger();

        let allocation = ledger.allocate(pork, request(dec!(25))).unwrap();
        assert_eq!(allocation.cost, dec!(50));
        assert_eq!(allocation.allocated, dec!(20));
        assert_eq!(allocation.shortfall, dec!(5));

        // The usage still records the requested quantity.
        let usage = ledger.usage(allocation.usage).unwrap();
        assert_eq!(usage.quantity.number, dec!(25));
        assert_eq!(usage.drawn(), dec!(20));
    }

    #[test]
    fn test_allocate_zero_is_free_noop() {
        let (mut ledger, pork) = two_batch_ledger();

        let allocation = ledger.allocate(pork, request(dec!(0))).unwrap();
        assert!(allocation.cost.is_zero());
        assert!(allocation.draws.is_empty());
        assert_eq!(
            ledger
                .batches_of(pork)
                .map(|b| b.remaining.number)
                .sum::<Decimal>(),
            dec!(20)
        );
    }

    #[test]
    fn test_allocate_negative_fails() {
        let (mut ledger, pork) = two_batch_ledger();
        let err = ledger.allocate(pork, request(dec!(-1))).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidQuantity {
                requested: dec!(-1),
                available: dec!(20),
            }
        );
        // Nothing recorded.
        assert_eq!(ledger.usages().count(), 0);
    }

    #[test]
    fn test_allocate_unknown_ingredient_fails() {
        let mut ledger = Ledger::new();
        let err = ledger
            .allocate(IngredientId(42), request(dec!(1)))
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownIngredient(IngredientId(42)));
    }

    #[test]
    fn test_fifo_prefers_expiring_batch_on_same_day() {
        let mut ledger = Ledger::new();
        let milk = ledger.add_ingredient("milk", Unit::Millilitre);
        // Inserted first, but no expiry: must sort after its sibling.
        let keeps = ledger
            .record_batch(
                milk,
                Quantity::new(dec!(500), Unit::Millilitre),
                dec!(0.002),
                date(2024, 4, 1),
                None,
                None,
            )
            .unwrap();
        let expiring = ledger
            .record_batch(
                milk,
                Quantity::new(dec!(500), Unit::Millilitre),
                dec!(0.003),
                date(2024, 4, 1),
                Some(date(2024, 4, 8)),
                None,
            )
            .unwrap();

        assert_eq!(ledger.fifo_order(milk), vec![expiring, keeps]);
        assert_eq!(ledger.next_unit_cost(milk), Some(dec!(0.003)));
    }

    #[test]
    fn test_fifo_orders_by_date_not_insertion() {
        let mut ledger = Ledger::new();
        let milk = ledger.add_ingredient("milk", Unit::Millilitre);
        let newer = ledger
            .record_batch(
                milk,
                Quantity::new(dec!(500), Unit::Millilitre),
                dec!(0.003),
                date(2024, 4, 2),
                None,
                None,
            )
            .unwrap();
        let older = ledger
            .record_batch(
                milk,
                Quantity::new(dec!(500), Unit::Millilitre),
                dec!(0.002),
                date(2024, 4, 1),
                None,
                None,
            )
            .unwrap();

        assert_eq!(ledger.fifo_order(milk), vec![older, newer]);
    }

    #[test]
    fn test_allocate_checked_detects_conflict() {
        let (mut ledger, pork) = two_batch_ledger();
        let seen = ledger.ingredient(pork).unwrap().revision;

        // A competing writer discards some stock.
        let batch = ledger.batches_of(pork).next().unwrap().id;
        ledger.discard(batch, Some(dec!(1))).unwrap();

        let err = ledger
            .allocate_checked(pork, seen, request(dec!(5)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::RevisionConflict { .. }));

        // With the fresh revision it goes through.
        let fresh = ledger.ingredient(pork).unwrap().revision;
        assert!(ledger.allocate_checked(pork, fresh, request(dec!(5))).is_ok());
    }
}
