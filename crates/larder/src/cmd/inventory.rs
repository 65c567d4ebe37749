//! `larder inventory`: list the stock on hand.

use anyhow::{Context, Result};
use larder_ledger::Ledger;
use rust_decimal::Decimal;

/// List the stock on hand in FIFO order.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Only this ingredient
    #[arg(long)]
    pub ingredient: Option<String>,

    /// Include depleted and discarded batches
    #[arg(long)]
    pub full_history: bool,
}

/// Run the inventory command.
pub fn run(ledger: &Ledger, args: &Args) -> Result<()> {
    let only = match &args.ingredient {
        Some(name) => Some(
            ledger
                .find_ingredient(name)
                .with_context(|| format!("no ingredient named '{name}'"))?
                .id,
        ),
        None => None,
    };

    let mut grand_total = Decimal::ZERO;
    for ingredient in ledger.ingredients() {
        if only.is_some_and(|id| id != ingredient.id) {
            continue;
        }

        let mut batches: Vec<_> = ledger
            .batches_of(ingredient.id)
            .filter(|b| args.full_history || b.remaining.is_positive())
            .collect();
        if batches.is_empty() {
            continue;
        }
        batches.sort_by_key(|b| b.fifo_key());

        let on_hand: Decimal = batches.iter().map(|b| b.remaining.number).sum();
        let value: Decimal = batches.iter().map(|b| b.stock_value()).sum();
        grand_total += value;
        println!(
            "{} ({}): {} {} on hand, worth {}",
            ingredient.name, ingredient.category, on_hand, ingredient.unit, value
        );

        for b in batches {
            let expiry = b
                .expiry_date
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            println!(
                "  batch {:>4}  bought {}  expiry {:<10}  {:>10} / {:<10} @ {}  [{}]",
                b.id.to_string(),
                b.purchase_date,
                expiry,
                b.remaining.number.to_string(),
                b.quantity.number.to_string(),
                b.unit_cost,
                b.status
            );
        }
    }

    println!("total asset value: {grand_total}");
    Ok(())
}
