//! Core types for larder
//!
//! This crate provides the fundamental types used throughout the larder project:
//!
//! - [`Quantity`] - A decimal number with a measurement unit
//! - [`Unit`] - The standard units quantities are normalized to (g, ml, count)
//! - [`UnitMatrix`] - Named kitchen units and their conversion ratios
//! - [`Batch`] - One purchase lot of an ingredient with its own cost and stock
//! - [`Ingredient`] - An ingredient and its standard unit
//! - [`ShoppingEvent`] - One grocery trip grouping batches bought together
//! - [`Usage`] - One consumption record with its allocation trace
//!
//! # Example
//!
//! ```
//! use larder_core::{Batch, BatchId, IngredientId, Quantity, Unit};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! // A 500 g batch of flour bought at 0.004 per gram
//! let batch = Batch::new(
//!     BatchId(1),
//!     IngredientId(1),
//!     Quantity::new(dec!(500), Unit::Gram),
//!     dec!(0.004),
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//! );
//!
//! assert_eq!(batch.paid_price(), dec!(2.000));
//! assert_eq!(batch.stock_value(), dec!(2.000));
//! assert!(batch.free_space().is_zero());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod event;
pub mod ingredient;
pub mod quantity;
pub mod units;
pub mod usage;

pub use batch::{Batch, BatchId, BatchStatus};
pub use event::{EventId, ShoppingEvent};
pub use ingredient::{Ingredient, IngredientId, TrackingMode};
pub use quantity::Quantity;
pub use units::{Unit, UnitMatrix, UnitParseError};
pub use usage::{Draw, Usage, UsageId};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
