use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Readiness as reported by `/healthz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ready,
    NotReady,
}

/// Outcome of the most recent cycle, shared between the scheduler and the
/// health listener. Starts as not ready until a cycle completes.
#[derive(Debug, Clone, Default)]
pub struct CycleHealth {
    last_success: Arc<AtomicBool>,
}

impl CycleHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the flag with the outcome of the latest attempt.
    pub fn record(&self, success: bool) {
        let previous = self.last_success.swap(success, Ordering::SeqCst);
        if previous != success {
            info!("CycleHealth: now {:?}", self.status());
        }
    }

    pub fn is_ready(&self) -> bool {
        self.last_success.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> HealthStatus {
        if self.is_ready() {
            HealthStatus::Ready
        } else {
            HealthStatus::NotReady
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_not_ready() {
        assert_eq!(CycleHealth::new().status(), HealthStatus::NotReady);
    }

    #[test]
    fn test_record_overwrites() {
        let health = CycleHealth::new();
        health.record(true);
        assert!(health.is_ready());
        health.record(false);
        assert!(!health.is_ready());
        health.record(true);
        assert_eq!(health.status(), HealthStatus::Ready);
    }

    #[test]
    fn test_clones_share_state() {
        let health = CycleHealth::new();
        let reader = health.clone();
        health.record(true);
        assert!(reader.is_ready());
    }
}
