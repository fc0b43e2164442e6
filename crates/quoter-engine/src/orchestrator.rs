//! Quoting cycle orchestrator.
//!
//! One `Quoter` per running instance. It owns nothing but configuration and
//! collaborator handles; all venue state is re-read fresh every cycle.
//!
//! A cycle walks the configured instruments strictly in order. Within one
//! instrument's step the sequence is fixed: read position → (maybe close) →
//! read reference quote → read resting orders → compute ladder → cancels →
//! placements → submit. Any failure in a step is absorbed at the instrument
//! boundary and the cycle moves on; nothing short of process shutdown stops
//! the loop.

use std::time::Duration;

use quoter_core::{
    CoreError, Instruction, Instrument, OrderBatch, QuoteLadder, Qty, RestingOrders, Result, Side,
};
use quoter_telemetry::Metrics;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::gateway::{DynOrderGateway, DynPositionSource, DynPriceFeed};
use crate::ladder::compute_ladder;
use crate::unwind::should_close;

/// The quoting cycle orchestrator.
pub struct Quoter {
    config: EngineConfig,
    feed: DynPriceFeed,
    positions: DynPositionSource,
    gateway: DynOrderGateway,
}

impl Quoter {
    /// Build a quoter from validated configuration and collaborator handles.
    ///
    /// Validation runs again here so a quoter can never be constructed from
    /// an inconsistent config, whatever path it arrived by.
    pub fn new(
        config: EngineConfig,
        feed: DynPriceFeed,
        positions: DynPositionSource,
        gateway: DynOrderGateway,
    ) -> Result<Self> {
        config.validate()?;
        Metrics::set_instruments_configured(config.instruments.len());
        Ok(Self {
            config,
            feed,
            positions,
            gateway,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One full pass over all configured instruments.
    ///
    /// Never fails: per-instrument errors are logged with their step
    /// context, counted, and contained here.
    pub async fn run_cycle(&self) {
        for instrument in &self.config.instruments {
            if let Err(err) = self.process_instrument(instrument).await {
                let reason = skip_reason(&err);
                if matches!(err, CoreError::GatewayRejected(_)) {
                    Metrics::gateway_rejected(&instrument.symbol);
                } else {
                    Metrics::instrument_skipped(&instrument.symbol, reason);
                }
                warn!(
                    symbol = %instrument.symbol,
                    reason,
                    error = %err,
                    "instrument step failed, continuing cycle"
                );
            }
        }
        Metrics::cycle_completed();
    }

    /// Run cycles forever, sleeping `cycle_delay` between passes.
    ///
    /// The delay paces feed and gateway rate limits; it comes from
    /// configuration, never a constant. Only process shutdown (handled by
    /// the caller) ends the loop.
    pub async fn run_forever(&self, cycle_delay: Duration) {
        info!(
            instruments = self.config.instruments.len(),
            delay_ms = cycle_delay.as_millis() as u64,
            "quoting loop started"
        );
        loop {
            self.run_cycle().await;
            tokio::time::sleep(cycle_delay).await;
        }
    }

    /// `run_forever` with the configured `cycle_delay_ms`.
    pub async fn run_forever_configured(&self) {
        self.run_forever(Duration::from_millis(self.config.cycle_delay_ms))
            .await;
    }

    async fn process_instrument(&self, instrument: &Instrument) -> Result<()> {
        // Unwind check comes first: re-quoting around a position that is
        // about to be flattened would fight our own close.
        if let Some(position) = self.positions.position(instrument).await? {
            if should_close(&position, &self.config.unwind) {
                info!(
                    symbol = %instrument.symbol,
                    size = %position.size,
                    settled = %position.settled_pnl,
                    unrealized = %position.unrealized_pnl,
                    "unwind triggered, closing position"
                );
                self.gateway
                    .submit_batch(OrderBatch::single(Instruction::ClosePosition {
                        market_index: instrument.market_index,
                    }))
                    .await?;
                Metrics::unwind_close(&instrument.symbol);
                // Skip quoting this cycle; the next read sees the flat position.
                return Ok(());
            }
        }

        let reference = self.feed.reference_quote(instrument).await?;
        let resting = self.positions.resting_orders(instrument).await?;
        let ladder = compute_ladder(&reference, self.config.spreads_for(&instrument.symbol));

        let allow_placements = resting.count < self.config.max_resting_orders;
        if !allow_placements {
            warn!(
                symbol = %instrument.symbol,
                resting = resting.count,
                cap = self.config.max_resting_orders,
                "resting order ceiling reached, suppressing placements"
            );
            Metrics::instrument_skipped(&instrument.symbol, "order_cap");
        }

        let batch = build_batch(
            instrument.market_index,
            &resting,
            &ladder,
            self.config.sizes_for(&instrument.symbol),
            allow_placements,
        );
        if batch.is_empty() {
            debug!(symbol = %instrument.symbol, "nothing to do this cycle");
            return Ok(());
        }

        debug!(
            symbol = %instrument.symbol,
            cancels = batch.cancel_count(),
            placements = batch.placement_count(),
            "submitting batch"
        );
        self.gateway.submit_batch(batch).await?;
        Metrics::batch_submitted(&instrument.symbol);
        Ok(())
    }
}

/// Assemble one instrument's submission.
///
/// Cancels for each side that currently has resting orders always come
/// first, so a partial-fill race can never leave both an old and a crossed
/// new order resting. Placements pair ladder rungs with the size schedule;
/// a degenerate (empty) ladder side simply contributes nothing.
fn build_batch(
    market_index: u32,
    resting: &RestingOrders,
    ladder: &QuoteLadder,
    sizes: &[Qty],
    allow_placements: bool,
) -> OrderBatch {
    let mut batch = OrderBatch::new();

    if resting.has_long_side {
        batch.push(Instruction::CancelSide {
            market_index,
            side: Side::Long,
        });
    }
    if resting.has_short_side {
        batch.push(Instruction::CancelSide {
            market_index,
            side: Side::Short,
        });
    }

    if allow_placements {
        for (&price, &size) in ladder.bids.iter().zip(sizes) {
            batch.push(Instruction::PlaceLimit {
                market_index,
                side: Side::Long,
                price,
                size,
            });
        }
        for (&price, &size) in ladder.asks.iter().zip(sizes) {
            batch.push(Instruction::PlaceLimit {
                market_index,
                side: Side::Short,
                price,
                size,
            });
        }
    }

    batch
}

fn skip_reason(err: &CoreError) -> &'static str {
    match err {
        CoreError::FeedUnavailable(_) => "feed_unavailable",
        CoreError::LadderDegenerate(_) => "degenerate",
        CoreError::GatewayRejected(_) => "gateway_rejected",
        CoreError::ConfigurationInvalid(_) => "config",
        CoreError::InvalidFixed(_) => "bad_value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{MockOrderGateway, MockPositionSource, MockPriceFeed};
    use crate::unwind::UnwindPolicy;
    use quoter_core::{Position, Px, ReferenceQuote, Usd};
    use std::sync::Arc;

    struct Harness {
        feed: Arc<MockPriceFeed>,
        positions: Arc<MockPositionSource>,
        gateway: Arc<MockOrderGateway>,
        quoter: Quoter,
    }

    fn px(s: &str) -> Px {
        s.parse().unwrap()
    }

    fn two_instrument_config() -> EngineConfig {
        let mut config = EngineConfig {
            instruments: vec![Instrument::new("SOL", 0), Instrument::new("ETH", 2)],
            ..EngineConfig::default()
        };
        for symbol in ["SOL", "ETH"] {
            config.spreads_ppm.insert(symbol.to_string(), vec![0, 2000]);
            config.sizes.insert(
                symbol.to_string(),
                vec![Qty::from_raw(500_000), Qty::from_units(1)],
            );
        }
        config
    }

    fn harness(config: EngineConfig) -> Harness {
        let feed = Arc::new(MockPriceFeed::new());
        let positions = Arc::new(MockPositionSource::new());
        let gateway = Arc::new(MockOrderGateway::new());
        let quoter = Quoter::new(
            config,
            feed.clone(),
            positions.clone(),
            gateway.clone(),
        )
        .unwrap();
        Harness {
            feed,
            positions,
            gateway,
            quoter,
        }
    }

    fn sol_quote() -> ReferenceQuote {
        ReferenceQuote::new(px("100.05"), px("100.00"), px("100.10"))
    }

    #[test]
    fn test_constructor_rejects_invalid_config() {
        let feed = Arc::new(MockPriceFeed::new());
        let positions = Arc::new(MockPositionSource::new());
        let gateway = Arc::new(MockOrderGateway::new());
        let err = Quoter::new(EngineConfig::default(), feed, positions, gateway)
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::ConfigurationInvalid(_)));
    }

    #[tokio::test]
    async fn test_places_full_ladder_when_flat() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.feed
            .set_quote("ETH", ReferenceQuote::new(px("2000"), px("1999.5"), px("2000.5")));

        h.quoter.run_cycle().await;

        let submissions = h.gateway.submissions();
        assert_eq!(submissions.len(), 2);

        let sol = &submissions[0];
        assert_eq!(sol.cancel_count(), 0);
        assert_eq!(sol.placement_count(), 4);

        let placed: Vec<_> = sol.iter().cloned().collect();
        assert_eq!(
            placed[0],
            Instruction::PlaceLimit {
                market_index: 0,
                side: Side::Long,
                price: px("100.00"),
                size: Qty::from_raw(500_000),
            }
        );
        assert_eq!(
            placed[1],
            Instruction::PlaceLimit {
                market_index: 0,
                side: Side::Long,
                price: px("99.80"),
                size: Qty::from_units(1),
            }
        );
        assert_eq!(
            placed[2],
            Instruction::PlaceLimit {
                market_index: 0,
                side: Side::Short,
                price: px("100.10"),
                size: Qty::from_raw(500_000),
            }
        );
        assert_eq!(
            placed[3],
            Instruction::PlaceLimit {
                market_index: 0,
                side: Side::Short,
                price: px("100.3002"),
                size: Qty::from_units(1),
            }
        );
    }

    #[tokio::test]
    async fn test_fault_isolation_between_instruments() {
        let h = harness(two_instrument_config());
        // SOL's feed works; ETH's does not.
        h.feed.set_quote("SOL", sol_quote());

        h.quoter.run_cycle().await;

        let submissions = h.gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].placement_count(), 4);

        // And the reverse: the first instrument failing must not block the
        // second.
        h.gateway.clear();
        h.feed.set_unavailable("SOL");
        h.feed
            .set_quote("ETH", ReferenceQuote::new(px("2000"), px("1999.5"), px("2000.5")));

        h.quoter.run_cycle().await;
        assert_eq!(h.gateway.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_cancels_precede_placements() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_resting(
            "SOL",
            RestingOrders {
                count: 4,
                has_long_side: true,
                has_short_side: true,
            },
        );

        h.quoter.run_cycle().await;

        let batch = &h.gateway.submissions()[0];
        let instructions: Vec<_> = batch.iter().cloned().collect();
        assert_eq!(
            instructions[0],
            Instruction::CancelSide {
                market_index: 0,
                side: Side::Long,
            }
        );
        assert_eq!(
            instructions[1],
            Instruction::CancelSide {
                market_index: 0,
                side: Side::Short,
            }
        );
        assert!(instructions[2..].iter().all(Instruction::is_placement));
        assert_eq!(batch.placement_count(), 4);
    }

    #[tokio::test]
    async fn test_cancels_only_touched_sides() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_resting(
            "SOL",
            RestingOrders {
                count: 2,
                has_long_side: false,
                has_short_side: true,
            },
        );

        h.quoter.run_cycle().await;

        let batch = &h.gateway.submissions()[0];
        assert_eq!(batch.cancel_count(), 1);
        assert_eq!(
            batch.iter().next().unwrap(),
            &Instruction::CancelSide {
                market_index: 0,
                side: Side::Short,
            }
        );
    }

    #[tokio::test]
    async fn test_order_cap_suppresses_placements_not_cancels() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_resting(
            "SOL",
            RestingOrders {
                count: 28,
                has_long_side: true,
                has_short_side: true,
            },
        );

        h.quoter.run_cycle().await;

        let batch = &h.gateway.submissions()[0];
        assert_eq!(batch.placement_count(), 0);
        assert_eq!(batch.cancel_count(), 2);
    }

    #[tokio::test]
    async fn test_unwind_closes_and_skips_quoting() {
        let mut config = two_instrument_config();
        config.unwind = UnwindPolicy::LossOnly;
        let h = harness(config);
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_position(
            "SOL",
            Position {
                size: Qty::from_units(3),
                quote_entry_amount: Usd::from_units(300),
                settled_pnl: Usd::ZERO,
                unrealized_pnl: Usd::from_raw(-2_000_000),
            },
        );

        h.quoter.run_cycle().await;

        let submissions = h.gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(
            submissions[0].iter().next().unwrap(),
            &Instruction::ClosePosition { market_index: 0 }
        );
        assert_eq!(submissions[0].len(), 1);
    }

    #[tokio::test]
    async fn test_profitable_position_keeps_quoting() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_position(
            "SOL",
            Position {
                size: Qty::from_units(3),
                quote_entry_amount: Usd::from_units(300),
                settled_pnl: Usd::ZERO,
                unrealized_pnl: Usd::from_units(5),
            },
        );

        h.quoter.run_cycle().await;

        let submissions = h.gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].placement_count(), 4);
    }

    #[tokio::test]
    async fn test_gateway_rejection_does_not_abort_cycle() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.feed
            .set_quote("ETH", ReferenceQuote::new(px("2000"), px("1999.5"), px("2000.5")));
        h.gateway.set_reject_next("stale nonce");

        h.quoter.run_cycle().await;

        // SOL's submission was rejected; ETH's still went through.
        let submissions = h.gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert!(matches!(
            submissions[0].iter().next().unwrap(),
            Instruction::PlaceLimit { market_index: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_degenerate_side_places_other_side_only() {
        let h = harness(two_instrument_config());
        h.feed.set_quote(
            "SOL",
            ReferenceQuote::new(px("100"), Px::ZERO, px("100.10")),
        );

        h.quoter.run_cycle().await;

        let batch = &h.gateway.submissions()[0];
        assert_eq!(batch.placement_count(), 2);
        assert!(batch.iter().all(|i| matches!(
            i,
            Instruction::PlaceLimit {
                side: Side::Short,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_submitted() {
        let h = harness(two_instrument_config());
        // Both sides degenerate, nothing resting: no submission at all.
        h.feed
            .set_quote("SOL", ReferenceQuote::new(px("100"), Px::ZERO, Px::ZERO));

        h.quoter.run_cycle().await;
        assert!(h.gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_position_read_failure_skips_instrument() {
        let h = harness(two_instrument_config());
        h.feed.set_quote("SOL", sol_quote());
        h.positions.set_fail_position_reads(true);

        h.quoter.run_cycle().await;
        assert!(h.gateway.submissions().is_empty());
    }
}
