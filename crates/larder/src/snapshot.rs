//! Ledger snapshot persistence.
//!
//! The ledger lives as a JSON file on disk and is the system of record: one
//! CLI invocation loads it, applies a single operation, and writes it back.
//! A missing file means a fresh, empty ledger.

use anyhow::{Context, Result};
use larder_ledger::Ledger;
use std::fs;
use std::path::{Path, PathBuf};

/// Default snapshot location: `<data dir>/larder/ledger.json`.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
        .join("ledger.json")
}

/// Load the ledger from `path`, or an empty ledger when the file is absent.
pub fn load(path: &Path) -> Result<Ledger> {
    if !path.exists() {
        return Ok(Ledger::new());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger snapshot {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("ledger snapshot {} is not valid", path.display()))
}

/// Write the ledger to `path`, creating parent directories as needed.
pub fn save(path: &Path, ledger: &Ledger) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(ledger).context("failed to serialize ledger")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write ledger snapshot {}", path.display()))
}
