//! Custom metrics strategy selection.
//!
//! A non-empty `CUSTOM_METRIC_NAME` selects the literal strategy, everything
//! else reads the template file at `CUSTOM_METRICS_FILE`.

use super::EnvLookup;

pub const DEFAULT_CUSTOM_METRICS_FILE: &str = "/etc/custom-metrics.txt";

#[derive(Debug, Clone, PartialEq)]
pub enum CustomMetricsConfig {
    /// Template file rendered against the environment on every cycle.
    TemplateFile { path: String },
    /// Single `<name> <value>` line fixed at startup.
    Literal { name: String, value: f64 },
}

impl CustomMetricsConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        match lookup.get("CUSTOM_METRIC_NAME") {
            Some(name) => CustomMetricsConfig::Literal {
                name,
                value: lookup.f64("CUSTOM_METRIC_VALUE", 0.0),
            },
            None => CustomMetricsConfig::TemplateFile {
                path: lookup.string("CUSTOM_METRICS_FILE", DEFAULT_CUSTOM_METRICS_FILE),
            },
        }
    }
}
