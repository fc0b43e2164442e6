//! Engine configuration.
//!
//! Loaded once at startup and read-only afterwards. `validate()` enforces
//! every cross-field rule; a violation is `ConfigurationInvalid` and fatal.
//! Nothing here is ever silently defaulted at runtime.

use crate::unwind::UnwindPolicy;
use quoter_core::{CoreError, Instrument, Qty, Result, PPM};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Quoting engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Instruments to quote, in iteration order.
    #[serde(default)]
    pub instruments: Vec<Instrument>,

    /// Per-symbol spread offsets in parts-per-million of the touch price,
    /// one entry per ladder rung, shared by both sides.
    #[serde(default)]
    pub spreads_ppm: BTreeMap<String, Vec<u32>>,

    /// Per-symbol order sizes in base units, one entry per rung.
    #[serde(default)]
    pub sizes: BTreeMap<String, Vec<Qty>>,

    /// When to unwind an open position.
    #[serde(default = "default_unwind")]
    pub unwind: UnwindPolicy,

    /// Ceiling on resting orders per instrument. At or above it, the cycle
    /// still cancels but places nothing new.
    #[serde(default = "default_max_resting_orders")]
    pub max_resting_orders: u32,

    /// Inter-cycle pacing delay in milliseconds.
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,
}

fn default_unwind() -> UnwindPolicy {
    UnwindPolicy::LossOnly
}

fn default_max_resting_orders() -> u32 {
    28
}

fn default_cycle_delay_ms() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instruments: Vec::new(),
            spreads_ppm: BTreeMap::new(),
            sizes: BTreeMap::new(),
            unwind: default_unwind(),
            max_resting_orders: default_max_resting_orders(),
            cycle_delay_ms: default_cycle_delay_ms(),
        }
    }
}

impl EngineConfig {
    /// Validate every cross-field rule. Call once at startup, before the
    /// first cycle.
    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(invalid("no instruments configured"));
        }
        if self.max_resting_orders == 0 {
            return Err(invalid("max_resting_orders must be positive"));
        }
        if self.cycle_delay_ms == 0 {
            return Err(invalid("cycle_delay_ms must be positive"));
        }

        let mut symbols = HashSet::new();
        let mut indices = HashSet::new();
        for instrument in &self.instruments {
            if instrument.symbol.is_empty() {
                return Err(invalid("instrument with empty symbol"));
            }
            if !symbols.insert(instrument.symbol.as_str()) {
                return Err(invalid(&format!(
                    "duplicate instrument symbol {}",
                    instrument.symbol
                )));
            }
            if !indices.insert(instrument.market_index) {
                return Err(invalid(&format!(
                    "duplicate market index {} ({})",
                    instrument.market_index, instrument.symbol
                )));
            }

            let spreads = self
                .spreads_ppm
                .get(&instrument.symbol)
                .ok_or_else(|| invalid(&format!("no spreads for {}", instrument.symbol)))?;
            let sizes = self
                .sizes
                .get(&instrument.symbol)
                .ok_or_else(|| invalid(&format!("no sizes for {}", instrument.symbol)))?;

            if spreads.is_empty() {
                return Err(invalid(&format!("empty spreads for {}", instrument.symbol)));
            }
            // An offset of one full price already zeroes the rung; anything
            // at or past it would quote a non-positive bid.
            if spreads.iter().any(|&o| i64::from(o) >= PPM) {
                return Err(invalid(&format!(
                    "{}: spread offset must be below {PPM} ppm",
                    instrument.symbol
                )));
            }
            if spreads.len() != sizes.len() {
                return Err(invalid(&format!(
                    "{}: {} spread rungs but {} sizes",
                    instrument.symbol,
                    spreads.len(),
                    sizes.len()
                )));
            }
            if sizes.iter().any(|s| !s.is_positive()) {
                return Err(invalid(&format!(
                    "non-positive size for {}",
                    instrument.symbol
                )));
            }
        }

        if let UnwindPolicy::Band {
            lower_bound,
            upper_bound,
        } = &self.unwind
        {
            if lower_bound > upper_bound {
                return Err(invalid("unwind band lower_bound exceeds upper_bound"));
            }
        }

        Ok(())
    }

    /// Spread offsets for a validated symbol.
    pub fn spreads_for(&self, symbol: &str) -> &[u32] {
        self.spreads_ppm.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rung sizes for a validated symbol.
    pub fn sizes_for(&self, symbol: &str) -> &[Qty] {
        self.sizes.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn invalid(reason: &str) -> CoreError {
    CoreError::ConfigurationInvalid(reason.to_string())
}
