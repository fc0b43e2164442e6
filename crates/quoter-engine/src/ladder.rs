//! Quote ladder calculation.
//!
//! Pure price math: no I/O, no book dependency, callable from tests with
//! bare integers. All arithmetic is integer fixed-point via `Px`.

use quoter_core::{QuoteLadder, ReferenceQuote};

/// Compute one instrument's quote ladder from its reference quote and the
/// configured ppm spread offsets.
///
/// Rung `i` with offset `o`:
/// `bid_i = best_bid - best_bid * o / 1_000_000`,
/// `ask_i = best_ask + best_ask * o / 1_000_000`.
/// An offset of 0 reproduces the touch price exactly; larger offsets widen
/// away from it, so bids never exceed `best_bid` and asks never undercut
/// `best_ask`.
///
/// A degenerate side (zero best bid or ask) yields an empty sequence for
/// that side only; the other side is computed normally.
pub fn compute_ladder(reference: &ReferenceQuote, offsets_ppm: &[u32]) -> QuoteLadder {
    let bids = if reference.has_bid() {
        offsets_ppm
            .iter()
            .map(|&o| reference.best_bid.offset_down(o))
            .collect()
    } else {
        Vec::new()
    };

    let asks = if reference.has_ask() {
        offsets_ppm
            .iter()
            .map(|&o| reference.best_ask.offset_up(o))
            .collect()
    } else {
        Vec::new()
    };

    QuoteLadder { bids, asks }
}
