//! Core domain types for the perp quoting engine.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `Px`, `Qty`, `Usd`: integer fixed-point numerics (six implied decimals)
//! - `Instrument`, `InstrumentSet`: configured market identities
//! - `ReferenceQuote`, `Position`, `RestingOrders`, `QuoteLadder`: per-cycle
//!   read models and quoting output
//! - `Instruction`, `OrderBatch`, `Side`: gateway submission types
//! - `CoreError`: the shared error taxonomy

pub mod batch;
pub mod error;
pub mod fixed;
pub mod instrument;
pub mod types;

pub use batch::{Instruction, OrderBatch, Side};
pub use error::{CoreError, Result};
pub use fixed::{Px, Qty, Usd, PPM, SCALE};
pub use instrument::{Instrument, InstrumentSet};
pub use types::{Position, QuoteLadder, ReferenceQuote, RestingOrders};
