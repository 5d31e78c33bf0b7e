//! Top-level engine that ties together the session store, live connection
//! tracking, and metrics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing::info;

use gacha_core::config::RealtimeConfig;
use gacha_core::error::AppError;

use crate::connection::handler::ConnectionHandler;
use crate::connection::pool::ConnectionPool;
use crate::metrics::GachaMetrics;
use crate::session::store::SessionStore;

/// Odd constant used to spread seeded streams apart.
const STREAM_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// Central engine shared by every connection task.
#[derive(Clone)]
pub struct GachaEngine {
    /// Session store.
    pub sessions: Arc<SessionStore>,
    /// Live connections.
    pub connections: Arc<ConnectionPool>,
    /// Metrics collector.
    pub metrics: Arc<GachaMetrics>,
    /// Configuration.
    config: RealtimeConfig,
    /// Number of random streams handed out so far.
    rng_streams: Arc<AtomicU64>,
    /// Shutdown flag; late subscribers still observe `true`.
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl std::fmt::Debug for GachaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GachaEngine")
            .field("sessions", &self.sessions.len())
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl GachaEngine {
    /// Creates a new engine with an empty session store.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        info!(
            seeded = config.draw_seed.is_some(),
            "Gacha engine initialized"
        );

        Self {
            sessions: Arc::new(SessionStore::new()),
            connections: Arc::new(ConnectionPool::new()),
            metrics: Arc::new(GachaMetrics::new()),
            config,
            rng_streams: Arc::new(AtomicU64::new(0)),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Attach a new connection under a raw, client-supplied session id.
    ///
    /// Fails with a validation error when the id is absent or malformed, and
    /// with a service-unavailable error once shutdown has begun; the
    /// connection must then be closed without entering the command loop.
    pub fn attach(
        &self,
        raw_session_id: Option<&str>,
    ) -> Result<ConnectionHandler<StdRng>, AppError> {
        ConnectionHandler::attach_with_rng(self, raw_session_id, self.next_rng())
    }

    /// A fresh random source for one connection.
    ///
    /// Seeded deterministically when `draw_seed` is configured, otherwise
    /// from OS entropy.
    pub fn next_rng(&self) -> StdRng {
        let stream = self.rng_streams.fetch_add(1, Ordering::Relaxed);
        match self.config.draw_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(STREAM_SPREAD)),
            None => StdRng::from_entropy(),
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Signals every running connection loop to stop.
    ///
    /// Session state is kept; unsent outcomes stay buffered.
    pub fn shutdown(&self) {
        info!(
            connections = self.connections.connection_count(),
            "Shutting down gacha engine"
        );
        self.shutdown_tx.send_replace(true);
    }
}
