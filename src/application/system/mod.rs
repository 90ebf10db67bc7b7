use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod shutdown_service;

use crate::application::forwarder::{CycleOutcome, ForwardCycle, Scheduler};
use crate::application::monitoring::cycle_health::CycleHealth;
use crate::config::Config;
use crate::domain::payload::BasicAuth;
use crate::infrastructure::custom_metrics::build_provider;
use crate::infrastructure::http::{HttpMetricsSource, PushgatewaySink};
use crate::infrastructure::http_client_factory::HttpClientFactory;
use crate::infrastructure::observability::Metrics;
use crate::interfaces::health_server;

/// Fully wired forwarder: one scheduler plus the health listener.
pub struct Application {
    pub config: Config,
    pub health: CycleHealth,
    pub metrics: Metrics,
    scheduler: Scheduler,
}

impl Application {
    pub fn build(config: Config) -> anyhow::Result<Self> {
        let forwarder = &config.forwarder;
        info!(
            "Building forwarder: {} -> {} every {:?}",
            forwarder.source_url, forwarder.push_url, forwarder.interval
        );

        let client = HttpClientFactory::create_client();
        let source = Arc::new(HttpMetricsSource::new(
            client.clone(),
            forwarder.source_url.clone(),
            forwarder.scrape_timeout,
        ));
        let sink = Arc::new(PushgatewaySink::new(
            client,
            forwarder.push_url.clone(),
            forwarder.push_timeout,
        ));
        let custom_metrics = build_provider(&config.custom_metrics);
        info!("Custom metrics: {}", custom_metrics.describe());

        let auth = BasicAuth::from_parts(&forwarder.push_user, &forwarder.push_pass);
        if auth.is_some() {
            info!("Pushing with basic auth as {}", forwarder.push_user);
        }

        let health = CycleHealth::new();
        let metrics = Metrics::new()?;
        let cycle = ForwardCycle::new(
            source,
            sink,
            custom_metrics,
            auth,
            health.clone(),
            metrics.clone(),
        );
        let scheduler = Scheduler::new(cycle, forwarder.interval);

        Ok(Self {
            config,
            health,
            metrics,
            scheduler,
        })
    }

    /// Start the health listener and loop until `shutdown` is cancelled,
    /// then give the listener its grace window.
    pub async fn run(self, shutdown: CancellationToken) -> u64 {
        let router = health_server::build_router(self.health.clone(), self.metrics.clone());
        let health_task = health_server::spawn(
            self.config.observability.bind_address(),
            router,
            shutdown.child_token(),
        );

        let cycles = self.scheduler.run(shutdown.clone()).await;

        // The scheduler only returns once the token is cancelled, which also
        // tells the listener to stop accepting.
        health_server::stop(health_task, self.config.observability.shutdown_grace).await;
        info!("Stopped after {} cycles", cycles);
        cycles
    }

    /// Run exactly one cycle without the health listener.
    pub async fn run_once(&self) -> CycleOutcome {
        self.scheduler.cycle().run().await
    }
}
