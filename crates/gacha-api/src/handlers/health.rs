//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let engine = &state.engine;

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: "ok".to_string(),
        ws_connections: engine.connections.connection_count(),
        connected_sessions: engine.connections.session_count(),
        known_sessions: engine.sessions.len(),
        metrics: engine.metrics.snapshot(),
    }))
}
