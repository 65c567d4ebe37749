//! Property-based tests for larder-ledger.
//!
//! These tests verify the stock conservation invariant holds for arbitrary
//! operation sequences using proptest:
//!
//! `Σ remaining + Σ drawn-by-usages + Σ discarded == Σ purchased`
//!
//! Run with: cargo test -p larder-ledger --test `property_tests`

use chrono::NaiveDate;
use larder_core::{Quantity, Unit};
use larder_ledger::{Ledger, UsageRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ============================================================================
// Arbitrary generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    /// Buy a batch: quantity in whole grams, unit cost in cents, on a day of
    /// April 2024 (out-of-order days exercise the FIFO sort).
    Purchase { qty: i64, cost_cents: i64, day: u32 },
    /// Consume; the amount is clamped to available stock at apply time so
    /// sequences never run the ledger short.
    Allocate { qty: i64 },
    /// Discard a percentage of some batch's remaining stock.
    Discard { batch: usize, percent: i64 },
    /// Reverse a previously recorded usage.
    Reverse { usage: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..500, 1i64..2_000, 1u32..28)
            .prop_map(|(qty, cost_cents, day)| Op::Purchase { qty, cost_cents, day }),
        (1i64..400).prop_map(|qty| Op::Allocate { qty }),
        (any::<usize>(), 0i64..=100).prop_map(|(batch, percent)| Op::Discard { batch, percent }),
        any::<usize>().prop_map(|usage| Op::Reverse { usage }),
    ]
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
}

fn grams(n: Decimal) -> Quantity {
    Quantity::new(n, Unit::Gram)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn conservation_holds_across_op_sequences(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut ledger = Ledger::new();
        let staple = ledger.add_ingredient("staple", Unit::Gram);
        let mut batches = Vec::new();
        let mut usages = Vec::new();
        let mut purchased = Decimal::ZERO;

        for op in ops {
            match op {
                Op::Purchase { qty, cost_cents, day } => {
                    let id = ledger
                        .record_batch(
                            staple,
                            grams(Decimal::from(qty)),
                            Decimal::new(cost_cents, 2),
                            date(day),
                            None,
                            None,
                        )
                        .unwrap();
                    batches.push(id);
                    purchased += Decimal::from(qty);
                }
                Op::Allocate { qty } => {
                    let available: Decimal =
                        ledger.batches_of(staple).map(|b| b.remaining.number).sum();
                    let qty = Decimal::from(qty).min(available);
                    let allocation = ledger
                        .allocate(
                            staple,
                            UsageRequest {
                                date: date(15),
                                meal: "meal".into(),
                                entered: format!("{qty} g"),
                                quantity: grams(qty),
                            },
                        )
                        .unwrap();
                    usages.push(allocation.usage);
                }
                Op::Discard { batch, percent } => {
                    if batches.is_empty() {
                        continue;
                    }
                    let id = batches[batch % batches.len()];
                    let remaining = ledger.batch(id).unwrap().remaining.number;
                    let amount = remaining * Decimal::new(percent, 2);
                    ledger.discard(id, Some(amount)).unwrap();
                }
                Op::Reverse { usage } => {
                    if usages.is_empty() {
                        continue;
                    }
                    let id = usages.swap_remove(usage % usages.len());
                    ledger.reverse_usage(id).unwrap();
                }
            }

            let remaining: Decimal =
                ledger.batches_of(staple).map(|b| b.remaining.number).sum();
            let drawn: Decimal = ledger.usages().map(larder_core::Usage::drawn).sum();
            let discarded: Decimal = ledger
                .batches_of(staple)
                .map(|b| b.discarded_quantity.number)
                .sum();

            prop_assert_eq!(remaining + drawn + discarded, purchased);
        }
    }

    #[test]
    fn allocation_cost_equals_sum_of_draws(
        quantities in prop::collection::vec((1i64..200, 1i64..500, 1u32..28), 1..6),
        take in 1i64..600,
    ) {
        let mut ledger = Ledger::new();
        let staple = ledger.add_ingredient("staple", Unit::Gram);
        for (qty, cost_cents, day) in quantities {
            ledger
                .record_batch(
                    staple,
                    grams(Decimal::from(qty)),
                    Decimal::new(cost_cents, 2),
                    date(day),
                    None,
                    None,
                )
                .unwrap();
        }

        let allocation = ledger
            .allocate(
                staple,
                UsageRequest {
                    date: date(20),
                    meal: "meal".into(),
                    entered: format!("{take} g"),
                    quantity: grams(Decimal::from(take)),
                },
            )
            .unwrap();

        let draw_cost: Decimal = allocation.draws.iter().map(|d| d.cost).sum();
        prop_assert_eq!(allocation.cost, draw_cost);
        prop_assert_eq!(allocation.allocated + allocation.shortfall, allocation.requested);
    }

    #[test]
    fn emptying_the_ledger_costs_the_full_stock_value(
        quantities in prop::collection::vec((1i64..200, 1i64..500, 1u32..28), 1..6),
    ) {
        let mut ledger = Ledger::new();
        let staple = ledger.add_ingredient("staple", Unit::Gram);
        let mut total_qty = Decimal::ZERO;
        let mut total_value = Decimal::ZERO;
        for (qty, cost_cents, day) in quantities {
            let cost = Decimal::new(cost_cents, 2);
            ledger
                .record_batch(staple, grams(Decimal::from(qty)), cost, date(day), None, None)
                .unwrap();
            total_qty += Decimal::from(qty);
            total_value += Decimal::from(qty) * cost;
        }

        let allocation = ledger
            .allocate(
                staple,
                UsageRequest {
                    date: date(20),
                    meal: "meal".into(),
                    entered: String::new(),
                    quantity: grams(total_qty),
                },
            )
            .unwrap();

        prop_assert_eq!(allocation.cost, total_value);
        prop_assert!(ledger.batches_of(staple).all(|b| b.remaining.is_zero()));
    }
}
