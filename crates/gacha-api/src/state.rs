//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use gacha_core::config::AppConfig;
use gacha_realtime::GachaEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session engine
    pub engine: GachaEngine,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Build state around a fresh engine.
    pub fn new(config: AppConfig) -> Self {
        let engine = GachaEngine::new(config.realtime.clone());
        Self {
            config: Arc::new(config),
            engine,
            started_at: Instant::now(),
        }
    }
}
