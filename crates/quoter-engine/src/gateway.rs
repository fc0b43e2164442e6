//! External collaborator contracts.
//!
//! The engine talks to the outside world through three narrow traits: a
//! price feed, a position source, and an order gateway. Concrete wire
//! formats and transports belong to the implementations, never to the
//! engine. Trait objects are injected at orchestrator construction; there
//! are no ambient globals.

use std::pin::Pin;
use std::sync::Arc;

use quoter_core::{Instrument, OrderBatch, Position, ReferenceQuote, Result, RestingOrders};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Read-only market data source.
pub trait PriceFeed: Send + Sync {
    /// Reference price plus best bid/ask for one instrument.
    ///
    /// Returns `CoreError::FeedUnavailable` when the feed has nothing for
    /// this instrument right now; the cycle skips it and moves on.
    fn reference_quote(&self, instrument: &Instrument) -> BoxFuture<'_, Result<ReferenceQuote>>;
}

/// Read-only view of account state on the venue.
pub trait PositionSource: Send + Sync {
    /// The open position, or `None` when the account has never traded the
    /// instrument.
    fn position(&self, instrument: &Instrument) -> BoxFuture<'_, Result<Option<Position>>>;

    /// Snapshot of currently-resting orders. Re-read every cycle.
    fn resting_orders(&self, instrument: &Instrument) -> BoxFuture<'_, Result<RestingOrders>>;
}

/// Order submission endpoint.
///
/// A submission is all-or-nothing from the engine's point of view; partial
/// application is the venue's concern and surfaces on the next cycle's
/// fresh reads.
pub trait OrderGateway: Send + Sync {
    fn submit_batch(&self, batch: OrderBatch) -> BoxFuture<'_, Result<()>>;
}

pub type DynPriceFeed = Arc<dyn PriceFeed>;
pub type DynPositionSource = Arc<dyn PositionSource>;
pub type DynOrderGateway = Arc<dyn OrderGateway>;

/// Mock collaborators for orchestrator tests.
///
/// Hand-rolled recorded-call mocks: responses are keyed per symbol and
/// settable mid-test, submissions are recorded for assertion.
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use quoter_core::CoreError;
    use std::collections::HashMap;

    /// Price feed returning per-symbol canned quotes.
    #[derive(Default)]
    pub struct MockPriceFeed {
        quotes: Mutex<HashMap<String, ReferenceQuote>>,
    }

    impl MockPriceFeed {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_quote(&self, symbol: &str, quote: ReferenceQuote) {
            self.quotes.lock().insert(symbol.to_string(), quote);
        }

        /// Remove the canned quote so the next read fails.
        pub fn set_unavailable(&self, symbol: &str) {
            self.quotes.lock().remove(symbol);
        }
    }

    impl PriceFeed for MockPriceFeed {
        fn reference_quote(
            &self,
            instrument: &Instrument,
        ) -> BoxFuture<'_, Result<ReferenceQuote>> {
            let symbol = instrument.symbol.clone();
            Box::pin(async move {
                self.quotes
                    .lock()
                    .get(&symbol)
                    .copied()
                    .ok_or(CoreError::FeedUnavailable(symbol))
            })
        }
    }

    /// Position source with settable per-symbol positions and resting
    /// order snapshots.
    #[derive(Default)]
    pub struct MockPositionSource {
        positions: Mutex<HashMap<String, Position>>,
        resting: Mutex<HashMap<String, RestingOrders>>,
        fail_position_reads: Mutex<bool>,
    }

    impl MockPositionSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_position(&self, symbol: &str, position: Position) {
            self.positions.lock().insert(symbol.to_string(), position);
        }

        pub fn set_resting(&self, symbol: &str, resting: RestingOrders) {
            self.resting.lock().insert(symbol.to_string(), resting);
        }

        pub fn set_fail_position_reads(&self, fail: bool) {
            *self.fail_position_reads.lock() = fail;
        }
    }

    impl PositionSource for MockPositionSource {
        fn position(&self, instrument: &Instrument) -> BoxFuture<'_, Result<Option<Position>>> {
            let symbol = instrument.symbol.clone();
            Box::pin(async move {
                if *self.fail_position_reads.lock() {
                    return Err(CoreError::FeedUnavailable(symbol));
                }
                Ok(self.positions.lock().get(&symbol).copied())
            })
        }

        fn resting_orders(&self, instrument: &Instrument) -> BoxFuture<'_, Result<RestingOrders>> {
            let symbol = instrument.symbol.clone();
            Box::pin(async move {
                Ok(self
                    .resting
                    .lock()
                    .get(&symbol)
                    .copied()
                    .unwrap_or_default())
            })
        }
    }

    /// Gateway recording every submitted batch.
    #[derive(Default)]
    pub struct MockOrderGateway {
        submissions: Mutex<Vec<OrderBatch>>,
        reject_next: Mutex<Option<String>>,
    }

    impl MockOrderGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reject the next submission with the given reason.
        pub fn set_reject_next(&self, reason: &str) {
            *self.reject_next.lock() = Some(reason.to_string());
        }

        pub fn submissions(&self) -> Vec<OrderBatch> {
            self.submissions.lock().clone()
        }

        pub fn clear(&self) {
            self.submissions.lock().clear();
        }
    }

    impl OrderGateway for MockOrderGateway {
        fn submit_batch(&self, batch: OrderBatch) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                if let Some(reason) = self.reject_next.lock().take() {
                    return Err(CoreError::GatewayRejected(reason));
                }
                self.submissions.lock().push(batch);
                Ok(())
            })
        }
    }
}
