//! Individual connection handle.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gacha_core::SessionId;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Metadata about one live connection.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Session this connection is attached to
    pub session_id: SessionId,
    /// When the connection was attached
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(session_id: SessionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            connected_at: Utc::now(),
        }
    }

    /// Milliseconds since the connection attached.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.connected_at).num_milliseconds()
    }
}
