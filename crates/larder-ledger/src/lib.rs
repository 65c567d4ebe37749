//! The larder batch ledger: FIFO cost allocation over purchase batches.
//!
//! This crate provides:
//! - [`Ledger`] - the explicit, owned store of ingredients, batches,
//!   shopping events and usages
//! - FIFO allocation ([`Ledger::allocate`]) that costs a consumption by
//!   depleting the oldest stock first and records the usage with its
//!   allocation trace
//! - Waste recording ([`Ledger::discard`], [`Ledger::set_fully_discarded`])
//! - Usage reversal ([`Ledger::reverse_usage`]) that restores stock along
//!   the trace and deletes the record
//!
//! All mutations are plan-then-apply: validation happens before anything is
//! written, so a failed operation leaves the ledger exactly as it was.
//!
//! # Example
//!
//! ```
//! use larder_ledger::{Ledger, UsageRequest};
//! use larder_core::{Quantity, Unit};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
//!
//! let mut ledger = Ledger::new();
//! let rice = ledger.add_ingredient("rice", Unit::Gram);
//! ledger.record_batch(rice, Quantity::new(dec!(10), Unit::Gram), dec!(2), day(1), None, None).unwrap();
//! ledger.record_batch(rice, Quantity::new(dec!(10), Unit::Gram), dec!(3), day(2), None, None).unwrap();
//!
//! let allocation = ledger.allocate(rice, UsageRequest {
//!     date: day(10),
//!     meal: "dinner".into(),
//!     entered: "15 g".into(),
//!     quantity: Quantity::new(dec!(15), Unit::Gram),
//! }).unwrap();
//!
//! // 10 × 2 from the older batch, 5 × 3 from the newer.
//! assert_eq!(allocation.cost, dec!(35));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allocate;
mod error;
mod reverse;
mod store;
mod waste;

pub use allocate::{Allocation, UsageRequest};
pub use error::LedgerError;
pub use reverse::Reversal;
pub use store::{Ledger, TripItem, TripReceipt, TripRequest};
