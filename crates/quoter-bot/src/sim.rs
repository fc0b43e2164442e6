//! Simulated venue.
//!
//! Stands in for the external price feed, position tracker, and order
//! gateway so the quoting loop can run end-to-end without a live venue.
//! The price walk is a deterministic LCG: same seed, same path, every run.
//! Fills are not simulated; positions change only through close
//! instructions or `set_position` (used by tests and demos).

use dashmap::DashMap;
use parking_lot::Mutex;
use quoter_core::{
    CoreError, Instruction, Instrument, OrderBatch, Position, Px, ReferenceQuote, Result,
    RestingOrders, Side,
};
use quoter_engine::{BoxFuture, OrderGateway, PositionSource, PriceFeed};
use tracing::info;

use crate::config::SimConfig;

#[derive(Default, Clone, Copy)]
struct SimBook {
    resting_long: u32,
    resting_short: u32,
    position: Position,
}

/// In-process venue implementing all three collaborator traits.
pub struct SimVenue {
    prices: DashMap<String, Px>,
    books: DashMap<u32, SimBook>,
    seed: Mutex<u64>,
    half_spread_ppm: u32,
}

impl SimVenue {
    pub fn new(config: &SimConfig) -> Self {
        let prices = DashMap::new();
        for (symbol, px) in &config.start_prices {
            prices.insert(symbol.clone(), *px);
        }
        Self {
            prices,
            books: DashMap::new(),
            seed: Mutex::new(config.seed),
            half_spread_ppm: config.half_spread_ppm,
        }
    }

    /// Seed an open position, e.g. to exercise the unwind path.
    pub fn set_position(&self, instrument: &Instrument, position: Position) {
        self.books.entry(instrument.market_index).or_default().position = position;
    }

    pub fn resting_counts(&self, market_index: u32) -> (u32, u32) {
        self.books
            .get(&market_index)
            .map(|b| (b.resting_long, b.resting_short))
            .unwrap_or((0, 0))
    }

    /// Advance the LCG and return a mid-price drift in [-200, 200] ppm.
    fn next_drift_ppm(&self) -> i64 {
        let mut seed = self.seed.lock();
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((*seed >> 33) % 401) as i64 - 200
    }
}

impl PriceFeed for SimVenue {
    fn reference_quote(&self, instrument: &Instrument) -> BoxFuture<'_, Result<ReferenceQuote>> {
        let symbol = instrument.symbol.clone();
        Box::pin(async move {
            let drift = self.next_drift_ppm();
            let mut entry = self
                .prices
                .get_mut(&symbol)
                .ok_or(CoreError::FeedUnavailable(symbol))?;

            let mid = if drift < 0 {
                entry.offset_down((-drift) as u32)
            } else {
                entry.offset_up(drift as u32)
            };
            *entry = mid;

            Ok(ReferenceQuote::new(
                mid,
                mid.offset_down(self.half_spread_ppm),
                mid.offset_up(self.half_spread_ppm),
            ))
        })
    }
}

impl PositionSource for SimVenue {
    fn position(&self, instrument: &Instrument) -> BoxFuture<'_, Result<Option<Position>>> {
        let market_index = instrument.market_index;
        Box::pin(async move {
            Ok(self.books.get(&market_index).map(|b| b.position))
        })
    }

    fn resting_orders(&self, instrument: &Instrument) -> BoxFuture<'_, Result<RestingOrders>> {
        let market_index = instrument.market_index;
        Box::pin(async move {
            let (long, short) = self.resting_counts(market_index);
            Ok(RestingOrders {
                count: long + short,
                has_long_side: long > 0,
                has_short_side: short > 0,
            })
        })
    }
}

impl OrderGateway for SimVenue {
    fn submit_batch(&self, batch: OrderBatch) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            for instruction in batch {
                match instruction {
                    Instruction::CancelSide { market_index, side } => {
                        let mut book = self.books.entry(market_index).or_default();
                        match side {
                            Side::Long => book.resting_long = 0,
                            Side::Short => book.resting_short = 0,
                        }
                    }
                    Instruction::PlaceLimit {
                        market_index, side, ..
                    } => {
                        let mut book = self.books.entry(market_index).or_default();
                        match side {
                            Side::Long => book.resting_long += 1,
                            Side::Short => book.resting_short += 1,
                        }
                    }
                    Instruction::ClosePosition { market_index } => {
                        self.books.entry(market_index).or_default().position =
                            Position::default();
                    }
                }
            }
            Ok(())
        })
    }
}

/// Gateway that logs each batch instead of applying it.
#[derive(Default)]
pub struct DryRunGateway;

impl DryRunGateway {
    pub fn new() -> Self {
        Self
    }
}

impl OrderGateway for DryRunGateway {
    fn submit_batch(&self, batch: OrderBatch) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            info!(
                cancels = batch.cancel_count(),
                placements = batch.placement_count(),
                "dry run, batch dropped"
            );
            for instruction in batch.iter() {
                info!(?instruction, "dry run instruction");
            }
            Ok(())
        })
    }
}
