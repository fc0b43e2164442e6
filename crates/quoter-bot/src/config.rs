//! Application configuration.

use crate::error::{AppError, AppResult};
use quoter_core::Px;
use quoter_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Simulated venue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting mid price per symbol. A symbol without an entry has no
    /// feed, which the cycle treats as FeedUnavailable.
    #[serde(default)]
    pub start_prices: BTreeMap<String, Px>,

    /// Half-spread between the walked mid and each touch, in ppm.
    #[serde(default = "default_half_spread_ppm")]
    pub half_spread_ppm: u32,

    /// Seed for the deterministic price walk.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_half_spread_ppm() -> u32 {
    500
}

fn default_seed() -> u64 {
    0x5eed_cafe
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_prices: BTreeMap::new(),
            half_spread_ppm: default_half_spread_ppm(),
            seed: default_seed(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub sim: SimConfig,
}

impl AppConfig {
    /// Load configuration, resolving the path as CLI arg > QUOTER_CONFIG
    /// env var > `config/default.toml`.
    pub fn load(cli_path: Option<&str>) -> AppResult<Self> {
        let path = cli_path
            .map(str::to_string)
            .or_else(|| std::env::var("QUOTER_CONFIG").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());
        Self::from_file(&path)
    }

    /// Load from a specific file. Engine validation runs here so an
    /// inconsistent file fails at startup, not mid-cycle.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {path}: {e}")))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse {path}: {e}")))?;

        config.engine.validate()?;
        Ok(config)
    }
}
