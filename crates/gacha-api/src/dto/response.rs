//! Response DTOs.

use serde::{Deserialize, Serialize};

use gacha_realtime::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` while the server is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Detailed health response including engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` while the server is serving.
    pub status: String,
    /// Live WebSocket connections.
    pub ws_connections: usize,
    /// Sessions with at least one live connection.
    pub connected_sessions: usize,
    /// Sessions known to the store.
    pub known_sessions: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}
