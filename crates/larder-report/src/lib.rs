//! Read-side reports over the larder ledger.
//!
//! Everything here is a pure computation over an immutable [`Ledger`]
//! reference; nothing mutates. The reports mirror what a kitchen dashboard
//! needs:
//!
//! - [`asset_value`] - what the stock on hand is worth
//! - [`expiring_soon`] - batches about to go off, with the money at stake
//! - [`day_totals`] / [`month_summary`] / [`daily_breakdown`] - spend,
//!   consumption and waste rolled up by date
//! - [`meal_breakdown`] - one day's usages grouped by meal

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod rollup;

pub use rollup::{
    daily_breakdown, day_totals, meal_breakdown, month_bounds, month_summary, DayTotals,
    MealDetail, MealItem, MonthSummary,
};

use chrono::NaiveDate;
use larder_core::{BatchId, IngredientId, Quantity};
use larder_ledger::Ledger;
use rust_decimal::Decimal;
use serde::Serialize;

/// Total value of current inventory: Σ `remaining × unit_cost` over batches
/// with stock on hand.
#[must_use]
pub fn asset_value(ledger: &Ledger) -> Decimal {
    ledger
        .batches()
        .filter(|b| b.remaining.is_positive())
        .map(larder_core::Batch::stock_value)
        .sum()
}

/// All-time waste cost across shopping events.
#[must_use]
pub fn cumulative_waste(ledger: &Ledger) -> Decimal {
    ledger.events().map(|e| e.total_waste).sum()
}

/// One batch in the expiring-soon report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringBatch {
    /// The batch at risk.
    pub batch: BatchId,
    /// Its ingredient.
    pub ingredient: IngredientId,
    /// Ingredient display name.
    pub name: String,
    /// Days until the expiry date (0 = today).
    pub days_left: i64,
    /// Stock still on hand.
    pub remaining: Quantity,
    /// Value lost if the batch expires unused.
    pub potential_loss: Decimal,
}

/// Batches whose expiry falls within `window_days` of `today`, soonest first.
///
/// Already-expired batches are not listed; they belong in the waste flow,
/// not the warning flow.
#[must_use]
pub fn expiring_soon(ledger: &Ledger, today: NaiveDate, window_days: i64) -> Vec<ExpiringBatch> {
    let mut at_risk: Vec<ExpiringBatch> = ledger
        .batches()
        .filter(|b| b.remaining.is_positive())
        .filter_map(|b| {
            let days_left = b.days_until_expiry(today)?;
            if (0..=window_days).contains(&days_left) {
                let name = ledger
                    .ingredient(b.ingredient)
                    .map(|i| i.name.clone())
                    .unwrap_or_default();
                Some(ExpiringBatch {
                    batch: b.id,
                    ingredient: b.ingredient,
                    name,
                    days_left,
                    remaining: b.remaining,
                    potential_loss: b.stock_value(),
                })
            } else {
                None
            }
        })
        .collect();
    at_risk.sort_by_key(|e| (e.days_left, e.batch));
    at_risk
}
