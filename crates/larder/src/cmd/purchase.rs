//! `larder purchase`: record a shopping trip.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use larder_core::{Quantity, Unit};
use larder_ledger::{Ledger, TripItem, TripRequest};
use rust_decimal::Decimal;

/// Record a shopping trip as purchase batches.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Trip date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Where the shopping happened
    #[arg(long, default_value = "")]
    pub place: String,

    /// Purchased line: NAME=QTY:UNIT@PRICE[^EXPIRY] (repeatable)
    ///
    /// Example: --item "milk=1000:ml@1.20^2024-04-16"
    #[arg(long = "item", value_name = "SPEC", required = true)]
    pub items: Vec<String>,

    /// Total actually paid; lines are prorated when it differs from their sum
    #[arg(long)]
    pub paid: Option<Decimal>,
}

/// Parse one `NAME=QTY:UNIT@PRICE[^EXPIRY]` line.
fn parse_item(spec: &str) -> Result<TripItem> {
    let Some((name, rest)) = spec.split_once('=') else {
        bail!("item '{spec}' is missing '=': expected NAME=QTY:UNIT@PRICE[^EXPIRY]");
    };
    let (rest, expiry) = match rest.split_once('^') {
        Some((rest, expiry)) => {
            let date: NaiveDate = expiry
                .parse()
                .with_context(|| format!("bad expiry date '{expiry}' in item '{spec}'"))?;
            (rest, Some(date))
        }
        None => (rest, None),
    };
    let Some((amount, price)) = rest.split_once('@') else {
        bail!("item '{spec}' is missing '@PRICE'");
    };
    let Some((qty, unit)) = amount.split_once(':') else {
        bail!("item '{spec}' is missing ':UNIT' after the quantity");
    };

    let unit: Unit = unit
        .parse()
        .with_context(|| format!("bad unit in item '{spec}'"))?;
    let qty: Decimal = qty
        .parse()
        .with_context(|| format!("bad quantity '{qty}' in item '{spec}'"))?;
    let price: Decimal = price
        .parse()
        .with_context(|| format!("bad price '{price}' in item '{spec}'"))?;

    Ok(TripItem {
        name: name.trim().to_string(),
        quantity: Quantity::new(qty, unit),
        price,
        expiry,
    })
}

/// Run the purchase command.
pub fn run(ledger: &mut Ledger, args: &Args) -> Result<()> {
    let date = args.date.unwrap_or_else(super::today);
    let items = args
        .items
        .iter()
        .map(|spec| parse_item(spec))
        .collect::<Result<Vec<_>>>()?;
    let count = items.len();

    let receipt = ledger.record_trip(TripRequest {
        date,
        place: args.place.clone(),
        items,
        total_paid: args.paid,
    })?;

    println!(
        "recorded trip {} on {date}: {count} item(s), total {}",
        receipt.event, receipt.total_cost
    );
    for batch in &receipt.batches {
        let b = ledger.batch(*batch).expect("batch was just recorded");
        let name = ledger
            .ingredient(b.ingredient)
            .map_or("?", |i| i.name.as_str());
        println!("  batch {}: {} {} @ {}", b.id, name, b.quantity, b.unit_cost);
    }
    Ok(())
}
