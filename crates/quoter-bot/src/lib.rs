//! Perp quoting bot.
//!
//! Wires the quoting engine to a venue:
//! - TOML application config with startup validation
//! - A simulated venue implementing the collaborator traits
//! - The `run_forever` driver behind a thin CLI

pub mod config;
pub mod error;
pub mod sim;

pub use config::{AppConfig, LoggingConfig, SimConfig};
pub use error::{AppError, AppResult};
pub use sim::{DryRunGateway, SimVenue};
