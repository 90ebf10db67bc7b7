//! Liveness listener.
//!
//! `GET /healthz` answers `200 ok` after a completed cycle and
//! `503 not ready` otherwise; `GET /metrics` exposes the forwarder's own
//! counters.

use crate::application::monitoring::cycle_health::CycleHealth;
use crate::infrastructure::observability::Metrics;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Clone)]
struct HealthState {
    health: CycleHealth,
    metrics: Metrics,
}

pub fn build_router(health: CycleHealth, metrics: Metrics) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(self_metrics))
        .with_state(HealthState { health, metrics })
}

async fn healthz(State(state): State<HealthState>) -> (StatusCode, &'static str) {
    if state.health.is_ready() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

async fn self_metrics(State(state): State<HealthState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serve `router` on an already bound listener until `shutdown` fires.
pub async fn serve(listener: TcpListener, router: Router, shutdown: CancellationToken) {
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled_owned().await })
        .await;
    if let Err(e) = result {
        error!("health server error: {}", e);
    }
}

/// Bind and serve in the background. A bind failure is logged and the
/// task ends; the scheduler keeps running without a health endpoint.
pub fn spawn(addr: String, router: Router, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("health server error: bind {}: {}", addr, e);
                return;
            }
        };
        info!("health endpoint listening on {}", addr);
        serve(listener, router, shutdown).await;
    })
}

/// Wait up to `grace` for the listener to drain, then abort it.
pub async fn stop(mut handle: JoinHandle<()>, grace: Duration) {
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(_) => info!("health endpoint stopped"),
        Err(_) => {
            warn!("health endpoint did not drain within {:?}, closing", grace);
            handle.abort();
        }
    }
}
