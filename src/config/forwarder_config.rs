//! Scrape and push endpoint configuration.

use super::EnvLookup;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "http://app:8080/metrics";
pub const DEFAULT_PUSH_URL: &str = "http://pushgateway:9091/metrics/job/example";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source, push target, credentials and timing.
#[derive(Clone)]
pub struct ForwarderEnvConfig {
    pub source_url: String,
    pub push_url: String,
    pub push_user: String,
    pub push_pass: String,
    pub interval: Duration,
    pub scrape_timeout: Duration,
    pub push_timeout: Duration,
}

impl Default for ForwarderEnvConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            push_user: String::new(),
            push_pass: String::new(),
            interval: DEFAULT_INTERVAL,
            scrape_timeout: DEFAULT_SCRAPE_TIMEOUT,
            push_timeout: DEFAULT_PUSH_TIMEOUT,
        }
    }
}

impl ForwarderEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        Self {
            source_url: lookup.string("SOURCE_URL", DEFAULT_SOURCE_URL),
            push_url: lookup.string("PUSHGATEWAY_URL", DEFAULT_PUSH_URL),
            push_user: lookup.string("PUSHGATEWAY_USER", ""),
            push_pass: lookup.string("PUSHGATEWAY_PASS", ""),
            interval: lookup.seconds("INTERVAL", DEFAULT_INTERVAL),
            scrape_timeout: lookup.seconds("SCRAPE_TIMEOUT", DEFAULT_SCRAPE_TIMEOUT),
            push_timeout: lookup.seconds("PUSH_TIMEOUT", DEFAULT_PUSH_TIMEOUT),
        }
    }
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for ForwarderEnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwarderEnvConfig")
            .field("source_url", &self.source_url)
            .field("push_url", &self.push_url)
            .field("push_user", &self.push_user)
            .field("push_pass", &if self.push_pass.is_empty() { "" } else { "***" })
            .field("interval", &self.interval)
            .field("scrape_timeout", &self.scrape_timeout)
            .field("push_timeout", &self.push_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_forwarder_config_defaults() {
        let env = HashMap::new();
        let config = ForwarderEnvConfig::from_lookup(&EnvLookup::from_map(&env));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.push_url, DEFAULT_PUSH_URL);
        assert!(config.push_user.is_empty());
        assert!(config.push_pass.is_empty());
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.scrape_timeout, Duration::from_secs(5));
        assert_eq!(config.push_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_forwarder_config_overrides() {
        let env = lookup_of(&[
            ("SOURCE_URL", "http://localhost:9100/metrics"),
            ("PUSHGATEWAY_URL", "http://gw/metrics/job/node"),
            ("PUSHGATEWAY_USER", "alice"),
            ("PUSHGATEWAY_PASS", "s3cret"),
            ("INTERVAL", "30"),
            ("SCRAPE_TIMEOUT", "2"),
            ("PUSH_TIMEOUT", "7"),
        ]);
        let config = ForwarderEnvConfig::from_lookup(&EnvLookup::from_map(&env));
        assert_eq!(config.source_url, "http://localhost:9100/metrics");
        assert_eq!(config.push_url, "http://gw/metrics/job/node");
        assert_eq!(config.push_user, "alice");
        assert_eq!(config.push_pass, "s3cret");
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.scrape_timeout, Duration::from_secs(2));
        assert_eq!(config.push_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_malformed_durations_fall_back_silently() {
        let env = lookup_of(&[
            ("INTERVAL", "fifteen"),
            ("SCRAPE_TIMEOUT", "-3"),
            ("PUSH_TIMEOUT", "0"),
        ]);
        let config = ForwarderEnvConfig::from_lookup(&EnvLookup::from_map(&env));
        assert_eq!(config.interval, DEFAULT_INTERVAL);
        assert_eq!(config.scrape_timeout, DEFAULT_SCRAPE_TIMEOUT);
        assert_eq!(config.push_timeout, DEFAULT_PUSH_TIMEOUT);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let env = lookup_of(&[("SOURCE_URL", ""), ("INTERVAL", "")]);
        let config = ForwarderEnvConfig::from_lookup(&EnvLookup::from_map(&env));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_debug_masks_password() {
        let env = lookup_of(&[("PUSHGATEWAY_USER", "bob"), ("PUSHGATEWAY_PASS", "hunter2")]);
        let config = ForwarderEnvConfig::from_lookup(&EnvLookup::from_map(&env));
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("hunter2"));
    }
}
