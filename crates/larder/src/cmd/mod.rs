//! Command implementations for the larder CLI.
//!
//! Each module contains one subcommand: its clap `Args` struct and a `run`
//! function taking the loaded ledger. Dispatch, snapshot handling and
//! logging setup live here.

pub mod cook;
pub mod discard;
pub mod inventory;
pub mod purchase;
pub mod report_cmd;
pub mod reverse;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::snapshot;

/// Household kitchen inventory and cost ledger.
#[derive(Parser, Debug)]
#[command(name = "larder", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the ledger snapshot (default: <data dir>/larder/ledger.json)
    #[arg(long, global = true, env = "LARDER_LEDGER", value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The larder subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a shopping trip as purchase batches
    Purchase(purchase::Args),
    /// Record a consumption, costed by FIFO
    Cook(cook::Args),
    /// Discard batch stock as waste
    Discard(discard::Args),
    /// Reverse a recorded usage and restore its stock
    Reverse(reverse::Args),
    /// List the stock on hand in FIFO order
    Inventory(inventory::Args),
    /// Asset value, monthly rollups and expiring stock
    Report(report_cmd::Args),
}

/// Main entry point for the larder binary.
pub fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let path = cli
        .ledger
        .clone()
        .unwrap_or_else(snapshot::default_path);
    let mut ledger = snapshot::load(&path)?;
    tracing::debug!(ledger = %path.display(), "loaded snapshot");

    let mutated = match &cli.command {
        Command::Purchase(args) => {
            purchase::run(&mut ledger, args)?;
            true
        }
        Command::Cook(args) => {
            cook::run(&mut ledger, args)?;
            true
        }
        Command::Discard(args) => {
            discard::run(&mut ledger, args)?;
            true
        }
        Command::Reverse(args) => {
            reverse::run(&mut ledger, args)?;
            true
        }
        Command::Inventory(args) => {
            inventory::run(&ledger, args)?;
            false
        }
        Command::Report(args) => {
            report_cmd::run(&ledger, args)?;
            false
        }
    };

    if mutated {
        snapshot::save(&path, &ledger)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Today in the local timezone; the default for date arguments.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
