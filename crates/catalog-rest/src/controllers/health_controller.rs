//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use catalog_core::HealthStatus;
use futures::future::join_all;
use serde::Serialize;
use utoipa::ToSchema;

/// Health of one dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    /// `healthy`, `degraded`, or `unhealthy`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Worst status across components.
    pub status: String,
    /// Application version.
    pub version: String,
    pub components: Vec<ComponentHealth>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

fn split(status: &HealthStatus) -> (&'static str, Option<String>) {
    match status {
        HealthStatus::Healthy => ("healthy", None),
        HealthStatus::Degraded(detail) => ("degraded", Some(detail.clone())),
        HealthStatus::Unhealthy(detail) => ("unhealthy", Some(detail.clone())),
    }
}

async fn run_checks(state: &AppState) -> (HealthStatus, Vec<ComponentHealth>) {
    let statuses = join_all(state.health_checks.iter().map(|check| check.check())).await;

    let mut overall = HealthStatus::Healthy;
    let mut components = Vec::with_capacity(statuses.len());
    for (check, status) in state.health_checks.iter().zip(statuses) {
        let (label, detail) = split(&status);
        components.push(ComponentHealth {
            name: check.name().to_string(),
            status: label.to_string(),
            detail,
        });
        overall = overall.worst(status);
    }
    (overall, components)
}

/// Health check endpoint.
///
/// A cache outage shows as `degraded` and still answers 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up, possibly degraded", body = HealthResponse),
        (status = 503, description = "A required dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (overall, components) = run_checks(&state).await;
    let code = if overall.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let body = HealthResponse {
        status: split(&overall).0.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        components,
    };
    (code, Json(body))
}

/// Readiness check endpoint.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let (overall, _) = run_checks(&state).await;
    if overall.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
