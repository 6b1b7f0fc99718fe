//! Readiness probe endpoint backed by the health registry.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::health::registry::{Health, HealthReport};

/// Router answering `GET /healthz` with 200 when every registered component
/// is healthy and 503 otherwise. The body is the JSON [`HealthReport`].
pub fn probe_router(health: Arc<Health>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(health)
}

async fn healthz(State(health): State<Arc<Health>>) -> (StatusCode, Json<HealthReport>) {
    let report = health.report();
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
