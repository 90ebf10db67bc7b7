//! Prometheus metrics describing the forwarder itself.
//!
//! All metrics use the `prom2pushgateway_` prefix. They are served next to
//! `/healthz` and never mixed into the pushed payload.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Label values for `prom2pushgateway_cycles_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcomeLabel {
    Success,
    ScrapeFailed,
    PushFailed,
}

impl CycleOutcomeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleOutcomeLabel::Success => "success",
            CycleOutcomeLabel::ScrapeFailed => "scrape_failed",
            CycleOutcomeLabel::PushFailed => "push_failed",
        }
    }
}

/// Prometheus metrics for the forward loop
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Cycles by outcome
    pub cycles_total: CounterVec,
    /// Custom metrics render failures
    pub custom_metrics_errors_total: IntCounter,
    /// Unix time of the last successful push
    pub last_success_timestamp_seconds: Gauge,
    /// Size of the last pushed payload
    pub push_payload_bytes: Gauge,
    /// Wall time of a whole cycle
    pub cycle_duration_seconds: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let cycles_total = CounterVec::new(
            Opts::new(
                "prom2pushgateway_cycles_total",
                "Scrape-push cycles by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(cycles_total.clone()))?;

        let custom_metrics_errors_total = IntCounter::with_opts(Opts::new(
            "prom2pushgateway_custom_metrics_errors_total",
            "Custom metrics fragments that could not be rendered",
        ))?;
        registry.register(Box::new(custom_metrics_errors_total.clone()))?;

        let last_success_timestamp_seconds = Gauge::with_opts(Opts::new(
            "prom2pushgateway_last_success_timestamp_seconds",
            "Unix timestamp of the last completed push",
        ))?;
        registry.register(Box::new(last_success_timestamp_seconds.clone()))?;

        let push_payload_bytes = Gauge::with_opts(Opts::new(
            "prom2pushgateway_push_payload_bytes",
            "Size of the last pushed payload in bytes",
        ))?;
        registry.register(Box::new(push_payload_bytes.clone()))?;

        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "prom2pushgateway_cycle_duration_seconds",
                "Duration of a scrape-push cycle in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;

        // Pre-create every outcome so all series exist from the first scrape.
        for outcome in [
            CycleOutcomeLabel::Success,
            CycleOutcomeLabel::ScrapeFailed,
            CycleOutcomeLabel::PushFailed,
        ] {
            cycles_total.with_label_values(&[outcome.as_str()]);
        }

        Ok(Self {
            registry: Arc::new(registry),
            cycles_total,
            custom_metrics_errors_total,
            last_success_timestamp_seconds,
            push_payload_bytes,
            cycle_duration_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_cycle(&self, outcome: CycleOutcomeLabel) {
        self.cycles_total.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_push(&self, payload_bytes: usize) {
        self.push_payload_bytes.set(payload_bytes as f64);
        self.last_success_timestamp_seconds
            .set(chrono::Utc::now().timestamp() as f64);
    }
}
