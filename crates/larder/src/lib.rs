//! Larder CLI: household kitchen inventory and cost ledger.
//!
//! This crate provides the `larder` binary:
//!
//! - `larder purchase`: record a shopping trip as batches
//! - `larder cook`: record a consumption, costed by FIFO
//! - `larder discard`: record waste
//! - `larder reverse`: undo a recorded consumption
//! - `larder inventory`: list the stock on hand
//! - `larder report`: asset value, monthly rollups, expiring stock
//!
//! # Example Usage
//!
//! ```bash
//! larder purchase --place market --item "milk=1000:ml@1.20^2024-04-16"
//! larder cook milk --amount 2 --unit tbsp --meal breakfast
//! larder report --month 2024-04
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod snapshot;
