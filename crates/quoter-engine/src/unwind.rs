//! Position unwind policy.
//!
//! Pure decision functions. Closing the position is the orchestrator's job;
//! this module only answers "should it be closed now".

use quoter_core::{Position, Usd};
use serde::{Deserialize, Serialize};

/// When to unwind an open position, selected per deployment.
///
/// Deployments disagree on the right trigger, so both recognized modes are
/// configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum UnwindPolicy {
    /// Close as soon as effective P&L goes negative.
    LossOnly,
    /// Close when effective P&L leaves the closed band `[lower, upper]`.
    /// P&L exactly at a bound does not close.
    Band { lower_bound: Usd, upper_bound: Usd },
}

/// Effective P&L of a position.
///
/// Unrealized P&L alone while nothing has settled; once settled P&L is
/// non-zero it supersedes the pure-unrealized figure and the two are
/// additive.
pub fn effective_pnl(position: &Position) -> Usd {
    if position.settled_pnl.is_zero() {
        position.unrealized_pnl
    } else {
        position.settled_pnl + position.unrealized_pnl
    }
}

/// Whether the position should be closed under the given policy.
///
/// Always false for a flat position (zero cost basis), whatever the P&L
/// fields say.
pub fn should_close(position: &Position, policy: &UnwindPolicy) -> bool {
    if position.is_flat() {
        return false;
    }
    let pnl = effective_pnl(position);
    match policy {
        UnwindPolicy::LossOnly => pnl.is_negative(),
        UnwindPolicy::Band {
            lower_bound,
            upper_bound,
        } => pnl < *lower_bound || pnl > *upper_bound,
    }
}
