//! Self-observability for prom2pushgateway
//!
//! The forwarder's own counters live in a private Prometheus registry and
//! are exposed on the health listener at `/metrics`.

pub mod metrics;

pub use metrics::{CycleOutcomeLabel, Metrics};
