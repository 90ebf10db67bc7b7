//! Interchangeable custom metrics strategies.

pub mod literal;
pub mod template_file;

pub use literal::LiteralMetric;
pub use template_file::{EnvSource, TemplateFileMetrics};

use crate::config::CustomMetricsConfig;
use crate::domain::ports::CustomMetricsProvider;
use std::sync::Arc;

/// Build the provider selected by configuration.
pub fn build_provider(config: &CustomMetricsConfig) -> Arc<dyn CustomMetricsProvider> {
    match config {
        CustomMetricsConfig::TemplateFile { path } => Arc::new(TemplateFileMetrics::new(path.clone())),
        CustomMetricsConfig::Literal { name, value } => Arc::new(LiteralMetric::new(name.clone(), *value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_follows_config() {
        let provider = build_provider(&CustomMetricsConfig::Literal {
            name: "marker".to_string(),
            value: 1.0,
        });
        assert_eq!(provider.describe(), "literal metric marker=1");

        let provider = build_provider(&CustomMetricsConfig::TemplateFile {
            path: "/etc/custom-metrics.txt".to_string(),
        });
        assert_eq!(provider.describe(), "template file /etc/custom-metrics.txt");
    }
}
