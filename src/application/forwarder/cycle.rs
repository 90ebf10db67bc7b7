//! One scrape-then-push attempt.

use crate::application::monitoring::cycle_health::CycleHealth;
use crate::domain::errors::{PushError, ScrapeError};
use crate::domain::payload::{BasicAuth, PushRequest, build_push_payload};
use crate::domain::ports::{CustomMetricsProvider, MetricsSink, MetricsSource};
use crate::infrastructure::observability::{CycleOutcomeLabel, Metrics};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// What a single cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Both legs completed a round trip, whatever the status codes.
    Pushed {
        payload_bytes: usize,
        fragment_bytes: usize,
        auth: bool,
    },
    ScrapeFailed(ScrapeError),
    PushFailed(PushError),
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Pushed { .. })
    }

    fn label(&self) -> CycleOutcomeLabel {
        match self {
            CycleOutcome::Pushed { .. } => CycleOutcomeLabel::Success,
            CycleOutcome::ScrapeFailed(_) => CycleOutcomeLabel::ScrapeFailed,
            CycleOutcome::PushFailed(_) => CycleOutcomeLabel::PushFailed,
        }
    }
}

pub struct ForwardCycle {
    source: Arc<dyn MetricsSource>,
    sink: Arc<dyn MetricsSink>,
    custom_metrics: Arc<dyn CustomMetricsProvider>,
    auth: Option<BasicAuth>,
    health: CycleHealth,
    metrics: Metrics,
}

impl ForwardCycle {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        sink: Arc<dyn MetricsSink>,
        custom_metrics: Arc<dyn CustomMetricsProvider>,
        auth: Option<BasicAuth>,
        health: CycleHealth,
        metrics: Metrics,
    ) -> Self {
        Self {
            source,
            sink,
            custom_metrics,
            auth,
            health,
            metrics,
        }
    }

    /// Run one cycle and record its outcome in the health cell.
    pub async fn run(&self) -> CycleOutcome {
        let started = Instant::now();

        let fragment = match self.custom_metrics.fragment().await {
            Ok(fragment) => fragment,
            Err(e) => {
                warn!("custom metrics unavailable, pushing without them: {}", e);
                self.metrics.custom_metrics_errors_total.inc();
                Vec::new()
            }
        };

        let outcome = self.scrape_and_push(&fragment).await;

        self.health.record(outcome.is_success());
        self.metrics.inc_cycle(outcome.label());
        self.metrics
            .cycle_duration_seconds
            .observe(started.elapsed().as_secs_f64());
        outcome
    }

    async fn scrape_and_push(&self, fragment: &[u8]) -> CycleOutcome {
        let body = match self.source.scrape().await {
            Ok(body) => body,
            Err(e) => {
                warn!("{}", e);
                return CycleOutcome::ScrapeFailed(e);
            }
        };

        let payload = build_push_payload(body, fragment);
        let payload_bytes = payload.len();
        let request = PushRequest {
            body: payload,
            auth: self.auth.clone(),
        };

        if let Err(e) = self.sink.push(request).await {
            warn!("{}", e);
            return CycleOutcome::PushFailed(e);
        }

        let auth = self.auth.is_some();
        self.metrics.record_push(payload_bytes);
        info!(
            target_url = self.sink.target(),
            auth,
            custom_metrics_bytes = fragment.len(),
            payload_bytes,
            "[{}] pushed → {} (auth={}, custom metrics={} bytes)",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.sink.target(),
            auth,
            fragment.len()
        );

        CycleOutcome::Pushed {
            payload_bytes,
            fragment_bytes: fragment.len(),
            auth,
        }
    }
}
