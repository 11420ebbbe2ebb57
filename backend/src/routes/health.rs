//! Health check endpoints
//!
//! Liveness is unconditional; readiness probes the database.

use crate::db;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// GET /health - Basic health check
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "flowfit-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready - Readiness check (database connectivity)
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db::health_check(state.db()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "ok" })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "database": "unavailable" })),
        ),
    }
}

/// GET /health/live - Liveness check
pub async fn liveness_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "alive" })))
}
