//! `larder discard`: record waste against a batch.

use anyhow::Result;
use larder_core::BatchId;
use larder_ledger::Ledger;
use rust_decimal::Decimal;

/// Discard batch stock as waste.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// The batch to discard from
    pub batch: u64,

    /// Amount to discard; the whole remaining stock when omitted
    #[arg(long, conflicts_with = "all")]
    pub amount: Option<Decimal>,

    /// Mark the batch fully discarded (idempotent; a no-op when it already is)
    #[arg(long)]
    pub all: bool,
}

/// Run the discard command.
pub fn run(ledger: &mut Ledger, args: &Args) -> Result<()> {
    let batch = BatchId(args.batch);
    let waste_cost = if args.all {
        ledger.set_fully_discarded(batch)?
    } else {
        ledger.discard(batch, args.amount)?
    };

    let b = ledger.batch(batch).expect("batch survived the discard");
    println!(
        "batch {batch}: wasted {waste_cost}, {} left, status {}",
        b.remaining, b.status
    );
    Ok(())
}
