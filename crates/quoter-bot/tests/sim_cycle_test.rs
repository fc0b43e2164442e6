//! End-to-end cycle tests against the simulated venue.
//!
//! These run the real orchestrator over the real sim implementations of all
//! three collaborator traits; nothing is mocked.

use std::sync::Arc;

use quoter_bot::{AppConfig, SimVenue};
use quoter_core::{Position, Qty, Usd};
use quoter_engine::Quoter;

const CONFIG: &str = r#"
    [engine]
    max_resting_orders = 28
    cycle_delay_ms = 100

    [[engine.instruments]]
    symbol = "SOL"
    market_index = 0

    [[engine.instruments]]
    symbol = "ETH"
    market_index = 2

    [engine.spreads_ppm]
    SOL = [500, 1000]
    ETH = [500, 1000]

    [engine.sizes]
    SOL = ["2", "4"]
    ETH = ["0.2", "0.4"]

    [engine.unwind]
    mode = "loss-only"

    [sim.start_prices]
    SOL = "100"
    ETH = "2000"
"#;

fn build() -> (Arc<SimVenue>, Quoter) {
    let config: AppConfig = toml::from_str(CONFIG).unwrap();
    config.engine.validate().unwrap();
    let venue = Arc::new(SimVenue::new(&config.sim));
    let quoter = Quoter::new(
        config.engine,
        venue.clone(),
        venue.clone(),
        venue.clone(),
    )
    .unwrap();
    (venue, quoter)
}

#[tokio::test]
async fn test_first_cycle_places_full_ladders() {
    let (venue, quoter) = build();

    quoter.run_cycle().await;

    // Two rungs per side for both instruments.
    assert_eq!(venue.resting_counts(0), (2, 2));
    assert_eq!(venue.resting_counts(2), (2, 2));
}

#[tokio::test]
async fn test_steady_state_replaces_rather_than_accumulates() {
    let (venue, quoter) = build();

    for _ in 0..5 {
        quoter.run_cycle().await;
    }

    // Every cycle cancels both sides before re-placing, so the resting
    // count stays at one ladder per side no matter how many cycles ran.
    assert_eq!(venue.resting_counts(0), (2, 2));
    assert_eq!(venue.resting_counts(2), (2, 2));
}

#[tokio::test]
async fn test_losing_position_is_closed_then_quoting_resumes() {
    let (venue, quoter) = build();
    let sol = quoter.config().instruments[0].clone();

    venue.set_position(
        &sol,
        Position {
            size: Qty::from_units(2),
            quote_entry_amount: Usd::from_units(200),
            settled_pnl: Usd::ZERO,
            unrealized_pnl: Usd::from_raw(-3_000_000),
        },
    );

    // Cycle 1: SOL unwinds instead of quoting; ETH quotes normally.
    quoter.run_cycle().await;
    assert_eq!(venue.resting_counts(0), (0, 0));
    assert_eq!(venue.resting_counts(2), (2, 2));

    // Cycle 2: SOL is flat again and quotes.
    quoter.run_cycle().await;
    assert_eq!(venue.resting_counts(0), (2, 2));
}
