//! `larder reverse`: undo a recorded consumption.

use anyhow::Result;
use larder_core::UsageId;
use larder_ledger::Ledger;

/// Reverse a recorded usage and restore its stock.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// The usage record to reverse
    pub usage: u64,
}

/// Run the reverse command.
pub fn run(ledger: &mut Ledger, args: &Args) -> Result<()> {
    let reversal = ledger.reverse_usage(UsageId(args.usage))?;

    println!(
        "reversed usage {}: restored {} across {} batch(es)",
        reversal.usage,
        reversal.restored,
        reversal.refills.len()
    );
    for (batch, amount) in &reversal.refills {
        println!("  batch {batch}: +{amount}");
    }
    Ok(())
}
