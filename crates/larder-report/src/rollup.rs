//! Date-based rollups: daily and monthly spend, consumption and waste.
//!
//! Usage cost rolls up by the usage date; shopping cost and waste roll up by
//! the shopping event's date (waste is attributed to the trip that bought
//! the batch, not the day it was binned).

use chrono::NaiveDate;
use larder_core::UsageId;
use larder_ledger::Ledger;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Spend figures for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    /// Cost of what was consumed.
    pub usage: Decimal,
    /// Waste cost attributed to this day's shopping events.
    pub waste: Decimal,
}

impl DayTotals {
    /// Usage plus waste.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.usage + self.waste
    }
}

/// Spend figures for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    /// Money spent shopping.
    pub shopping: Decimal,
    /// Cost of what was consumed.
    pub usage: Decimal,
    /// Waste cost attributed to the month's shopping events.
    pub waste: Decimal,
}

/// First day of the month and first day of the next month.
///
/// The half-open range `[start, end)` is the month window everywhere in this
/// crate; December rolls over into January of the next year.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month end");
    (start, end)
}

/// Totals for a single day.
#[must_use]
pub fn day_totals(ledger: &Ledger, date: NaiveDate) -> DayTotals {
    let usage = ledger
        .usages()
        .filter(|u| u.date == date)
        .map(|u| u.cost)
        .sum();
    let waste = ledger
        .events()
        .filter(|e| e.date == date)
        .map(|e| e.total_waste)
        .sum();
    DayTotals { usage, waste }
}

/// Totals for a whole month.
#[must_use]
pub fn month_summary(ledger: &Ledger, year: i32, month: u32) -> MonthSummary {
    let (start, end) = month_bounds(year, month);
    let in_month = |date: NaiveDate| date >= start && date < end;

    let shopping = ledger
        .events()
        .filter(|e| in_month(e.date))
        .map(|e| e.total_cost)
        .sum();
    let waste = ledger
        .events()
        .filter(|e| in_month(e.date))
        .map(|e| e.total_waste)
        .sum();
    let usage = ledger
        .usages()
        .filter(|u| in_month(u.date))
        .map(|u| u.cost)
        .sum();

    MonthSummary {
        shopping,
        usage,
        waste,
    }
}

/// Per-day totals for a month; days with no activity are absent.
#[must_use]
pub fn daily_breakdown(ledger: &Ledger, year: i32, month: u32) -> BTreeMap<NaiveDate, DayTotals> {
    let (start, end) = month_bounds(year, month);
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for usage in ledger.usages().filter(|u| u.date >= start && u.date < end) {
        days.entry(usage.date).or_default().usage += usage.cost;
    }
    for event in ledger.events().filter(|e| e.date >= start && e.date < end) {
        if !event.total_waste.is_zero() {
            days.entry(event.date).or_default().waste += event.total_waste;
        }
    }

    days
}

/// One usage line in a meal breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealItem {
    /// The usage record.
    pub usage: UsageId,
    /// Ingredient display name.
    pub name: String,
    /// The amount as the human entered it.
    pub entered: String,
    /// FIFO-computed cost.
    pub cost: Decimal,
}

/// One meal's usages and their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MealDetail {
    /// Cost of the whole meal.
    pub total: Decimal,
    /// The individual usages.
    pub items: Vec<MealItem>,
}

/// A day's usages grouped by meal label.
#[must_use]
pub fn meal_breakdown(ledger: &Ledger, date: NaiveDate) -> BTreeMap<String, MealDetail> {
    let mut meals: BTreeMap<String, MealDetail> = BTreeMap::new();

    for usage in ledger.usages().filter(|u| u.date == date) {
        let name = ledger
            .ingredient(usage.ingredient)
            .map(|i| i.name.clone())
            .unwrap_or_default();
        let entry = meals.entry(usage.meal.clone()).or_default();
        entry.total += usage.cost;
        entry.items.push(MealItem {
            usage: usage.id,
            name,
            entered: usage.entered.clone(),
            cost: usage.cost,
        });
    }

    meals
}
