//! Instrument identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One tradable perpetual market: a stable symbol plus the venue's numeric
/// market index. Immutable once loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub market_index: u32,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, market_index: u32) -> Self {
        Self {
            symbol: symbol.into(),
            market_index,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// The configured instruments in their fixed iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSet {
    instruments: Vec<Instrument>,
}

impl InstrumentSet {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    pub fn by_index(&self, market_index: u32) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.market_index == market_index)
    }

    /// Look up by symbol and/or market index. Symbol wins when both are
    /// supplied and disagree.
    pub fn resolve(&self, symbol: Option<&str>, market_index: Option<u32>) -> Option<&Instrument> {
        match (symbol, market_index) {
            (Some(s), _) => self.by_symbol(s),
            (None, Some(idx)) => self.by_index(idx),
            (None, None) => None,
        }
    }
}
