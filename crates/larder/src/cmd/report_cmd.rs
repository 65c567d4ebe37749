//! `larder report`: the kitchen dashboard.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use larder_ledger::Ledger;
use larder_report::{
    asset_value, cumulative_waste, daily_breakdown, expiring_soon, month_summary, DayTotals,
    ExpiringBatch, MonthSummary,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling
    Json,
}

/// Asset value, monthly rollups and expiring stock.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Month to roll up (YYYY-MM, default the current month)
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Warn about batches expiring within this many days
    #[arg(long, default_value_t = 3)]
    pub expiring_days: i64,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// The whole dashboard in one serializable value.
#[derive(Debug, Serialize)]
struct Report {
    year: i32,
    month: u32,
    asset_value: rust_decimal::Decimal,
    summary: MonthSummary,
    days: BTreeMap<NaiveDate, DayTotals>,
    expiring: Vec<ExpiringBatch>,
    cumulative_waste: rust_decimal::Decimal,
}

fn parse_month(spec: &str) -> Result<(i32, u32)> {
    let (year, month) = spec
        .split_once('-')
        .with_context(|| format!("bad month '{spec}': expected YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("bad year in '{spec}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("bad month in '{spec}'"))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("month must be 1-12, got {month}");
    }
    Ok((year, month))
}

/// Run the report command.
pub fn run(ledger: &Ledger, args: &Args) -> Result<()> {
    let today = super::today();
    let (year, month) = match &args.month {
        Some(spec) => parse_month(spec)?,
        None => (today.year(), today.month()),
    };

    let report = Report {
        year,
        month,
        asset_value: asset_value(ledger),
        summary: month_summary(ledger, year, month),
        days: daily_breakdown(ledger, year, month),
        expiring: expiring_soon(ledger, today, args.expiring_days),
        cumulative_waste: cumulative_waste(ledger),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    println!("larder report for {}-{:02}", report.year, report.month);
    println!("  stock on hand:    {}", report.asset_value);
    println!("  shopping:         {}", report.summary.shopping);
    println!("  consumed:         {}", report.summary.usage);
    println!("  wasted:           {}", report.summary.waste);
    println!("  waste (all time): {}", report.cumulative_waste);

    if !report.days.is_empty() {
        println!("by day:");
        for (date, totals) in &report.days {
            println!(
                "  {date}  consumed {:>10}  wasted {:>10}",
                totals.usage.to_string(),
                totals.waste.to_string()
            );
        }
    }

    if report.expiring.is_empty() {
        println!("nothing expiring soon");
    } else {
        println!("expiring soon:");
        for item in &report.expiring {
            println!(
                "  {} (batch {}): {} left, {} day(s), {} at stake",
                item.name, item.batch, item.remaining, item.days_left, item.potential_loss
            );
        }
    }
}
