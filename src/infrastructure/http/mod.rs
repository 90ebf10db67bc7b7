//! reqwest-backed adapters for the scrape and push legs.

pub mod pushgateway;
pub mod source;

pub use pushgateway::PushgatewaySink;
pub use source::HttpMetricsSource;
