//! Per-cycle read models: reference quote, position, resting orders, and
//! the computed quote ladder.
//!
//! All of these are snapshots. The engine builds them fresh every cycle and
//! never mutates one in place; ownership of the underlying state stays with
//! the external collaborators.

use crate::fixed::{Px, Qty, Usd};
use serde::{Deserialize, Serialize};

/// Per-instrument market snapshot: reference (oracle) price plus the touch
/// prices derived from book depth or the venue's fallback curve.
///
/// A zero side means the book was empty there and no fallback applied; that
/// side is degenerate and the ladder skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceQuote {
    pub price: Px,
    pub best_bid: Px,
    pub best_ask: Px,
}

impl ReferenceQuote {
    pub fn new(price: Px, best_bid: Px, best_ask: Px) -> Self {
        Self {
            price,
            best_bid,
            best_ask,
        }
    }

    pub fn has_bid(&self) -> bool {
        self.best_bid.is_positive()
    }

    pub fn has_ask(&self) -> bool {
        self.best_ask.is_positive()
    }
}

/// Read-only view of one instrument's open position.
///
/// The engine never writes this; it issues a close instruction and relies on
/// the position tracker to reflect the result on a later read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Signed net size. Positive long, negative short.
    pub size: Qty,
    /// Cost basis in quote currency. Zero means flat.
    pub quote_entry_amount: Usd,
    pub settled_pnl: Usd,
    pub unrealized_pnl: Usd,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.quote_entry_amount.is_zero()
    }
}

/// Snapshot of the orders currently resting on the venue for one instrument.
/// Re-read fresh every cycle; never cached across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrders {
    pub count: u32,
    pub has_long_side: bool,
    pub has_short_side: bool,
}

impl RestingOrders {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_any(&self) -> bool {
        self.count > 0
    }
}

/// One cycle's quoting output for one instrument: rung 0 is the most
/// aggressive (closest to the touch), later rungs progressively wider.
///
/// Invariant: every bid is at or below `best_bid` and every ask at or above
/// `best_ask` of the reference quote it was computed from. A degenerate side
/// is represented as an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteLadder {
    pub bids: Vec<Px>,
    pub asks: Vec<Px>,
}

impl QuoteLadder {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
