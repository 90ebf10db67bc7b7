//! Configuration module for prom2pushgateway.
//!
//! Every tunable comes from the process environment and is resolved once at
//! startup into an immutable [`Config`]. Resolution never fails: a missing,
//! empty or malformed value falls back to its default.

mod custom_metrics_config;
mod forwarder_config;
mod observability_config;

pub use custom_metrics_config::CustomMetricsConfig;
pub use forwarder_config::ForwarderEnvConfig;
pub use observability_config::ObservabilityEnvConfig;

use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Read-only view over environment-like key/value pairs.
///
/// Values that are set but empty are reported as absent.
pub struct EnvLookup<'a> {
    get: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> EnvLookup<'a> {
    pub fn new(get: impl Fn(&str) -> Option<String> + 'a) -> Self {
        Self { get: Box::new(get) }
    }

    /// Lookup backed by the real process environment.
    pub fn process() -> EnvLookup<'static> {
        EnvLookup::new(|key| env::var(key).ok())
    }

    pub fn from_map(map: &'a HashMap<String, String>) -> Self {
        Self::new(move |key| map.get(key).cloned())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        (self.get)(key).filter(|v| !v.is_empty())
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Whole seconds. Zero, negative and unparsable values use the default.
    pub fn seconds(&self, key: &str, default: Duration) -> Duration {
        self.get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    pub fn f64(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(default)
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub forwarder: ForwarderEnvConfig,
    pub custom_metrics: CustomMetricsConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(&EnvLookup::process())
    }

    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        Self {
            forwarder: ForwarderEnvConfig::from_lookup(lookup),
            custom_metrics: CustomMetricsConfig::from_lookup(lookup),
            observability: ObservabilityEnvConfig::from_lookup(lookup),
        }
    }
}
