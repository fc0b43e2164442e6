//! Prometheus metrics for the quoting cycle.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration
//! failure means a duplicate metric name, which should crash at startup
//! rather than fail silently. These panics only occur during static
//! initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_int_gauge, Counter, CounterVec, Encoder,
    IntGauge, TextEncoder,
};

/// Total completed quoting cycles.
pub static CYCLES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("quoter_cycles_total", "Total completed quoting cycles").unwrap()
});

/// Instruments skipped within a cycle, by reason.
/// Labels: symbol, reason (feed_unavailable/degenerate/order_cap).
pub static INSTRUMENT_SKIPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "quoter_instrument_skips_total",
        "Instrument steps skipped within a cycle",
        &["symbol", "reason"]
    )
    .unwrap()
});

/// Batches accepted by the gateway.
pub static BATCHES_SUBMITTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "quoter_batches_submitted_total",
        "Batches accepted by the order gateway",
        &["symbol"]
    )
    .unwrap()
});

/// Batches the gateway rejected.
pub static GATEWAY_REJECTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "quoter_gateway_rejects_total",
        "Batches rejected by the order gateway",
        &["symbol"]
    )
    .unwrap()
});

/// Position closes triggered by the unwind policy.
pub static UNWIND_CLOSES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "quoter_unwind_closes_total",
        "Position closes triggered by the unwind policy",
        &["symbol"]
    )
    .unwrap()
});

/// Instruments configured on the running instance.
pub static INSTRUMENTS_CONFIGURED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "quoter_instruments_configured",
        "Number of configured instruments"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    pub fn cycle_completed() {
        CYCLES_TOTAL.inc();
    }

    pub fn instrument_skipped(symbol: &str, reason: &str) {
        INSTRUMENT_SKIPS_TOTAL
            .with_label_values(&[symbol, reason])
            .inc();
    }

    pub fn batch_submitted(symbol: &str) {
        BATCHES_SUBMITTED_TOTAL.with_label_values(&[symbol]).inc();
    }

    pub fn gateway_rejected(symbol: &str) {
        GATEWAY_REJECTS_TOTAL.with_label_values(&[symbol]).inc();
    }

    pub fn unwind_close(symbol: &str) {
        UNWIND_CLOSES_TOTAL.with_label_values(&[symbol]).inc();
    }

    pub fn set_instruments_configured(count: usize) {
        INSTRUMENTS_CONFIGURED.set(count as i64);
    }

    /// Encode the default registry in Prometheus text format.
    pub fn encode() -> String {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buf = Vec::new();
        if encoder.encode(&families, &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_register_and_increment() {
        Metrics::cycle_completed();
        Metrics::instrument_skipped("SOL", "feed_unavailable");
        Metrics::batch_submitted("SOL");
        Metrics::gateway_rejected("ETH");
        Metrics::unwind_close("SOL");
        Metrics::set_instruments_configured(2);

        assert!(CYCLES_TOTAL.get() >= 1.0);
        assert!(
            INSTRUMENT_SKIPS_TOTAL
                .with_label_values(&["SOL", "feed_unavailable"])
                .get()
                >= 1.0
        );
        assert_eq!(INSTRUMENTS_CONFIGURED.get(), 2);
    }

    #[test]
    fn test_encode_contains_metric_names() {
        Metrics::cycle_completed();
        let text = Metrics::encode();
        assert!(text.contains("quoter_cycles_total"));
    }
}
