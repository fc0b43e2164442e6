//! Quoting engine: ladder calculation, unwind policy, and the cycle
//! orchestrator.
//!
//! # Architecture
//!
//! ```text
//! Quoter.run_cycle()
//!   per instrument (sequential, fail-soft):
//!     PositionSource ── should_close? ──> ClosePosition batch, skip rung math
//!     PriceFeed ──> compute_ladder ──> cancels + placements ──> OrderGateway
//!   then sleep(cycle_delay) and repeat (run_forever)
//! ```
//!
//! The pure functions (`compute_ladder`, `should_close`, `effective_pnl`)
//! carry all of the numeric behavior and are testable without any
//! collaborator; the orchestrator adds only sequencing, batching, and the
//! fail-soft boundary.

pub mod config;
pub mod gateway;
pub mod ladder;
pub mod orchestrator;
pub mod unwind;

pub use config::EngineConfig;
pub use gateway::{
    BoxFuture, DynOrderGateway, DynPositionSource, DynPriceFeed, OrderGateway, PositionSource,
    PriceFeed,
};
pub use ladder::compute_ladder;
pub use orchestrator::Quoter;
pub use unwind::{effective_pnl, should_close, UnwindPolicy};
