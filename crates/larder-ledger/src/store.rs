//! The ledger store: an explicit, owned collection of ingredients, batches,
//! shopping events and usage records.
//!
//! Every mutating operation takes the ledger by `&mut` — there is no global
//! state. Operations follow a plan-then-apply discipline: validation and
//! planning are pure reads, and the apply phase cannot fail, so an error
//! never leaves the ledger partially mutated.

use chrono::NaiveDate;
use larder_core::{
    Batch, BatchId, EventId, Ingredient, IngredientId, Quantity, ShoppingEvent, Unit, Usage,
    UsageId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LedgerError;

/// The batch ledger and everything hanging off it.
///
/// Batches are permanent history: they are depleted, refilled and discarded,
/// but never removed. Usages are removed only by reversal, which also undoes
/// their ledger effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    ingredients: BTreeMap<IngredientId, Ingredient>,
    batches: BTreeMap<BatchId, Batch>,
    events: BTreeMap<EventId, ShoppingEvent>,
    usages: BTreeMap<UsageId, Usage>,
    next_ingredient: u64,
    next_batch: u64,
    next_event: u64,
    next_usage: u64,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- lookups ---

    /// Get an ingredient by id.
    #[must_use]
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// Get a batch by id.
    #[must_use]
    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    /// Get a shopping event by id.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&ShoppingEvent> {
        self.events.get(&id)
    }

    /// Get a usage record by id.
    #[must_use]
    pub fn usage(&self, id: UsageId) -> Option<&Usage> {
        self.usages.get(&id)
    }

    /// Find an ingredient by its display name.
    #[must_use]
    pub fn find_ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.values().find(|i| i.name == name)
    }

    /// Iterate over all ingredients.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    /// Iterate over all batches.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    /// Iterate over all shopping events.
    pub fn events(&self) -> impl Iterator<Item = &ShoppingEvent> {
        self.events.values()
    }

    /// Iterate over all usage records.
    pub fn usages(&self) -> impl Iterator<Item = &Usage> {
        self.usages.values()
    }

    /// Iterate over the batches of one ingredient.
    pub fn batches_of(&self, ingredient: IngredientId) -> impl Iterator<Item = &Batch> {
        self.batches
            .values()
            .filter(move |b| b.ingredient == ingredient)
    }

    pub(crate) fn require_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<&Ingredient, LedgerError> {
        self.ingredients
            .get(&id)
            .ok_or(LedgerError::UnknownIngredient(id))
    }

    pub(crate) fn require_batch(&self, id: BatchId) -> Result<&Batch, LedgerError> {
        self.batches.get(&id).ok_or(LedgerError::UnknownBatch(id))
    }

    pub(crate) fn require_usage(&self, id: UsageId) -> Result<&Usage, LedgerError> {
        self.usages.get(&id).ok_or(LedgerError::UnknownUsage(id))
    }

    pub(crate) fn batch_mut(&mut self, id: BatchId) -> &mut Batch {
        self.batches.get_mut(&id).expect("batch id was validated")
    }

    /// Bump the ingredient's revision counter. Called by every mutation that
    /// touches the ingredient's batches.
    pub(crate) fn touch_ingredient(&mut self, id: IngredientId) {
        if let Some(ingredient) = self.ingredients.get_mut(&id) {
            ingredient.touch();
        }
    }

    pub(crate) fn check_revision(
        &self,
        id: IngredientId,
        expected: u64,
    ) -> Result<(), LedgerError> {
        let found = self.require_ingredient(id)?.revision;
        if found == expected {
            Ok(())
        } else {
            Err(LedgerError::RevisionConflict {
                ingredient: id,
                expected,
                found,
            })
        }
    }

    pub(crate) fn next_usage_id(&mut self) -> UsageId {
        self.next_usage += 1;
        UsageId(self.next_usage)
    }

    pub(crate) fn insert_usage(&mut self, usage: Usage) {
        self.usages.insert(usage.id, usage);
    }

    pub(crate) fn remove_usage(&mut self, id: UsageId) -> Option<Usage> {
        self.usages.remove(&id)
    }

    pub(crate) fn event_mut(&mut self, id: EventId) -> Option<&mut ShoppingEvent> {
        self.events.get_mut(&id)
    }

    // --- recording ---

    /// Add a new ingredient and return its id.
    pub fn add_ingredient(&mut self, name: impl Into<String>, unit: Unit) -> IngredientId {
        self.next_ingredient += 1;
        let id = IngredientId(self.next_ingredient);
        self.ingredients.insert(id, Ingredient::new(id, name, unit));
        id
    }

    /// Find an ingredient by name, creating it when absent.
    ///
    /// Fails with `UnitMismatch` when the ingredient exists with a different
    /// standard unit than the one requested.
    pub fn ingredient_named(
        &mut self,
        name: &str,
        unit: Unit,
    ) -> Result<IngredientId, LedgerError> {
        if let Some(existing) = self.find_ingredient(name) {
            if existing.unit != unit {
                return Err(LedgerError::UnitMismatch {
                    expected: existing.unit,
                    got: unit,
                });
            }
            return Ok(existing.id);
        }
        Ok(self.add_ingredient(name, unit))
    }

    /// Record a new shopping event and return its id.
    pub fn record_event(&mut self, date: NaiveDate, place: impl Into<String>) -> EventId {
        self.next_event += 1;
        let id = EventId(self.next_event);
        self.events.insert(id, ShoppingEvent::new(id, date, place));
        id
    }

    /// Record a purchase batch.
    ///
    /// The paid price (`quantity × unit_cost`) accrues to the owning event's
    /// total cost. The batch starts full and `active`.
    pub fn record_batch(
        &mut self,
        ingredient: IngredientId,
        quantity: Quantity,
        unit_cost: Decimal,
        purchase_date: NaiveDate,
        expiry: Option<NaiveDate>,
        event: Option<EventId>,
    ) -> Result<BatchId, LedgerError> {
        let owner = self.require_ingredient(ingredient)?;
        if quantity.unit != owner.unit {
            return Err(LedgerError::UnitMismatch {
                expected: owner.unit,
                got: quantity.unit,
            });
        }
        if quantity.is_negative() {
            return Err(LedgerError::InvalidQuantity {
                requested: quantity.number,
                available: Decimal::ZERO,
            });
        }
        if let Some(event_id) = event {
            if !self.events.contains_key(&event_id) {
                return Err(LedgerError::UnknownEvent(event_id));
            }
        }

        self.next_batch += 1;
        let id = BatchId(self.next_batch);
        let mut batch = Batch::new(id, ingredient, quantity, unit_cost, purchase_date);
        if let Some(date) = expiry {
            batch = batch.with_expiry(date);
        }
        if let Some(event_id) = event {
            batch = batch.with_event(event_id);
        }

        let paid = batch.paid_price();
        self.batches.insert(id, batch);
        if let Some(event_id) = event {
            if let Some(evt) = self.events.get_mut(&event_id) {
                evt.total_cost += paid;
            }
        }
        self.touch_ingredient(ingredient);
        Ok(id)
    }
}

/// One line of a shopping trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripItem {
    /// Ingredient name; created on first sight.
    pub name: String,
    /// Quantity bought, in the ingredient's standard unit.
    pub quantity: Quantity,
    /// Total price of this line as printed on the receipt.
    pub price: Decimal,
    /// Expiry date, when known.
    pub expiry: Option<NaiveDate>,
}

/// A whole shopping trip: the original multi-row purchase entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    /// Date of the trip.
    pub date: NaiveDate,
    /// Where the shopping happened.
    pub place: String,
    /// The purchased lines.
    pub items: Vec<TripItem>,
    /// What was actually paid for the whole trip, when it differs from the
    /// sum of line prices (store-wide discount). Line prices are prorated by
    /// `total_paid / Σ prices` before unit costs are derived.
    pub total_paid: Option<Decimal>,
}

/// Receipt for a recorded trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripReceipt {
    /// The created shopping event.
    pub event: EventId,
    /// The event's total cost after all batches were recorded.
    pub total_cost: Decimal,
    /// The created batches, in item order.
    pub batches: Vec<BatchId>,
}

impl Ledger {
    /// Record a whole shopping trip atomically.
    ///
    /// Creates one shopping event, finds or creates each line's ingredient,
    /// prorates line prices by the discount ratio when `total_paid` is given,
    /// and records one batch per line. Validation runs over the entire trip
    /// before anything is written.
    pub fn record_trip(&mut self, trip: TripRequest) -> Result<TripReceipt, LedgerError> {
        // Validate every line before touching the ledger. Units must agree
        // both with existing ingredients and between lines naming the same
        // new ingredient.
        {
            let mut trip_units: BTreeMap<&str, Unit> = BTreeMap::new();
            for item in &trip.items {
                if !item.quantity.is_positive() {
                    return Err(LedgerError::InvalidQuantity {
                        requested: item.quantity.number,
                        available: Decimal::ZERO,
                    });
                }
                let expected = self
                    .find_ingredient(&item.name)
                    .map(|i| i.unit)
                    .or_else(|| trip_units.get(item.name.as_str()).copied());
                if let Some(expected) = expected {
                    if expected != item.quantity.unit {
                        return Err(LedgerError::UnitMismatch {
                            expected,
                            got: item.quantity.unit,
                        });
                    }
                }
                trip_units.insert(&item.name, item.quantity.unit);
            }
        }

        let raw_total: Decimal = trip.items.iter().map(|i| i.price).sum();
        let ratio = match trip.total_paid {
            Some(paid) if raw_total > Decimal::ZERO => paid / raw_total,
            _ => Decimal::ONE,
        };

        let event = self.record_event(trip.date, trip.place);
        let mut batches = Vec::with_capacity(trip.items.len());
        for item in trip.items {
            let ingredient = self
                .ingredient_named(&item.name, item.quantity.unit)
                .expect("trip items were validated");
            let final_price = item.price * ratio;
            let unit_cost = final_price / item.quantity.number;
            let batch = self
                .record_batch(
                    ingredient,
                    item.quantity,
                    unit_cost,
                    trip.date,
                    item.expiry,
                    Some(event),
                )
                .expect("trip items were validated");
            batches.push(batch);
        }

        let total_cost = self.events[&event].total_cost;
        Ok(TripReceipt {
            event,
            total_cost,
            batches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_record_batch_accrues_event_cost() {
        let mut ledger = Ledger::new();
        let milk = ledger.add_ingredient("milk", Unit::Millilitre);
        let event = ledger.record_event(date(2024, 4, 6), "market");

        ledger
            .record_batch(
                milk,
                Quantity::new(dec!(1000), Unit::Millilitre),
                dec!(0.002),
                date(2024, 4, 6),
                None,
                Some(event),
            )
            .unwrap();

        assert_eq!(ledger.event(event).unwrap().total_cost, dec!(2.000));
    }

    #[test]
    fn test_record_batch_unknown_ingredient() {
        let mut ledger = Ledger::new();
        let err = ledger
            .record_batch(
                IngredientId(99),
                Quantity::new(dec!(1), Unit::Gram),
                dec!(1),
                date(2024, 4, 6),
                None,
                None,
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownIngredient(IngredientId(99)));
    }

    #[test]
    fn test_record_batch_unit_mismatch() {
        let mut ledger = Ledger::new();
        let eggs = ledger.add_ingredient("eggs", Unit::Count);
        let err = ledger
            .record_batch(
                eggs,
                Quantity::new(dec!(500), Unit::Gram),
                dec!(1),
                date(2024, 4, 6),
                None,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnitMismatch { .. }));
    }

    #[test]
    fn test_ingredient_named_finds_existing() {
        let mut ledger = Ledger::new();
        let first = ledger.add_ingredient("milk", Unit::Millilitre);
        let second = ledger.ingredient_named("milk", Unit::Millilitre).unwrap();
        assert_eq!(first, second);

        let err = ledger.ingredient_named("milk", Unit::Gram).unwrap_err();
        assert!(matches!(err, LedgerError::UnitMismatch { .. }));
    }

    #[test]
    fn test_record_batch_bumps_revision() {
        let mut ledger = Ledger::new();
        let milk = ledger.add_ingredient("milk", Unit::Millilitre);
        assert_eq!(ledger.ingredient(milk).unwrap().revision, 0);

        ledger
            .record_batch(
                milk,
                Quantity::new(dec!(500), Unit::Millilitre),
                dec!(0.002),
                date(2024, 4, 6),
                None,
                None,
            )
            .unwrap();
        assert_eq!(ledger.ingredient(milk).unwrap().revision, 1);
    }

    #[test]
    fn test_record_trip_prorates_discount() {
        let mut ledger = Ledger::new();
        let receipt = ledger
            .record_trip(TripRequest {
                date: date(2024, 4, 6),
                place: "market".into(),
                items: vec![
                    TripItem {
                        name: "flour".into(),
                        quantity: Quantity::new(dec!(1000), Unit::Gram),
                        price: dec!(3.00),
                        expiry: None,
                    },
                    TripItem {
                        name: "milk".into(),
                        quantity: Quantity::new(dec!(1000), Unit::Millilitre),
                        price: dec!(1.00),
                        expiry: Some(date(2024, 4, 16)),
                    },
                ],
                // Paid 3.00 for a 4.00 receipt: every line is scaled by 0.75.
                total_paid: Some(dec!(3.00)),
            })
            .unwrap();

        assert_eq!(receipt.batches.len(), 2);
        assert_eq!(receipt.total_cost, dec!(3.0000));

        let flour = ledger.find_ingredient("flour").unwrap();
        let flour_batch = ledger.batches_of(flour.id).next().unwrap();
        assert_eq!(flour_batch.unit_cost, dec!(0.00225));
    }

    #[test]
    fn test_record_trip_rejects_zero_quantity() {
        let mut ledger = Ledger::new();
        let err = ledger
            .record_trip(TripRequest {
                date: date(2024, 4, 6),
                place: "market".into(),
                items: vec![TripItem {
                    name: "flour".into(),
                    quantity: Quantity::zero(Unit::Gram),
                    price: dec!(3.00),
                    expiry: None,
                }],
                total_paid: None,
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidQuantity { .. }));
        // Nothing was created.
        assert_eq!(ledger.events().count(), 0);
        assert_eq!(ledger.ingredients().count(), 0);
    }

    #[test]
    fn test_record_trip_rejects_conflicting_units_for_same_name() {
        let mut ledger = Ledger::new();
        let err = ledger
            .record_trip(TripRequest {
                date: date(2024, 4, 6),
                place: "market".into(),
                items: vec![
                    TripItem {
                        name: "milk".into(),
                        quantity: Quantity::new(dec!(1000), Unit::Millilitre),
                        price: dec!(1.00),
                        expiry: None,
                    },
                    TripItem {
                        name: "milk".into(),
                        quantity: Quantity::new(dec!(500), Unit::Gram),
                        price: dec!(1.00),
                        expiry: None,
                    },
                ],
                total_paid: None,
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnitMismatch { .. }));
        assert_eq!(ledger.ingredients().count(), 0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut ledger = Ledger::new();
        let milk = ledger.add_ingredient("milk", Unit::Millilitre);
        let event = ledger.record_event(date(2024, 4, 6), "market");
        ledger
            .record_batch(
                milk,
                Quantity::new(dec!(1000), Unit::Millilitre),
                dec!(0.002),
                date(2024, 4, 6),
                Some(date(2024, 4, 20)),
                Some(event),
            )
            .unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, restored);
    }
}
