//! Observability configuration parsing from environment variables.
//!
//! This module handles the health listener address and its shutdown grace.

use super::EnvLookup;
use std::time::Duration;

pub const DEFAULT_HEALTH_ADDR: &str = ":8081";
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub health_addr: String,
    pub shutdown_grace: Duration,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            health_addr: DEFAULT_HEALTH_ADDR.to_string(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        Self {
            health_addr: lookup.string("HEALTH_ADDR", DEFAULT_HEALTH_ADDR),
            shutdown_grace: lookup.seconds("HEALTH_SHUTDOWN_GRACE", DEFAULT_SHUTDOWN_GRACE),
        }
    }

    /// Address in a form `TcpListener::bind` accepts. A bare `:port` binds
    /// every IPv4 interface.
    pub fn bind_address(&self) -> String {
        if self.health_addr.starts_with(':') {
            format!("0.0.0.0{}", self.health_addr)
        } else {
            self.health_addr.clone()
        }
    }
}
