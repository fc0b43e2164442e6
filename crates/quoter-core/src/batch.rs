//! Order-management instructions and the per-submission batch.

use crate::fixed::{Px, Qty};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// One order-management instruction destined for the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Cancel every resting order on one side of the instrument.
    /// Side-scoped rather than per-order to keep the batch size bounded.
    CancelSide { market_index: u32, side: Side },
    /// Place a resting limit order.
    PlaceLimit {
        market_index: u32,
        side: Side,
        price: Px,
        size: Qty,
    },
    /// Reduce-only market close of the open position.
    ClosePosition { market_index: u32 },
}

impl Instruction {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Instruction::CancelSide { .. })
    }

    pub fn is_placement(&self) -> bool {
        matches!(self, Instruction::PlaceLimit { .. })
    }
}

/// An ordered instruction sequence for one atomic gateway submission.
///
/// Built fresh each cycle and discarded after submission regardless of
/// outcome. Within a batch, an instrument's cancels must precede its own
/// placements; the orchestrator constructs batches in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBatch {
    instructions: Vec<Instruction>,
}

impl OrderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(instruction: Instruction) -> Self {
        Self {
            instructions: vec![instruction],
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn cancel_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_cancel()).count()
    }

    pub fn placement_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_placement()).count()
    }
}

impl IntoIterator for OrderBatch {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}
