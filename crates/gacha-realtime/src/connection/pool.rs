//! Connection pool — tracks live connections indexed by session ID.

use std::sync::Arc;

use dashmap::DashMap;

use gacha_core::SessionId;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all live connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Session ID → live connections (a stale socket may overlap a reconnect).
    by_session: DashMap<SessionId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self {
            by_session: DashMap::new(),
            by_id: DashMap::new(),
        }
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_session
            .entry(handle.session_id.clone())
            .or_default()
            .push(handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_session.get_mut(&handle.session_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_session
                    .remove_if(&handle.session_id, |_, conns| conns.is_empty());
            }
        }
        Some(handle)
    }

    /// Gets all live connections for a session.
    pub fn session_connections(&self, session_id: &SessionId) -> Vec<Arc<ConnectionHandle>> {
        self.by_session
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Returns total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of sessions with at least one live connection.
    pub fn session_count(&self) -> usize {
        self.by_session.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(session: &str) -> Arc<ConnectionHandle> {
        Arc::new(ConnectionHandle::new(
            SessionId::parse(Some(session), 64).unwrap(),
        ))
    }

    #[test]
    fn test_add_and_remove() {
        let pool = ConnectionPool::new();
        let a1 = handle("a");
        let a2 = handle("a");
        let b = handle("b");
        pool.add(a1.clone());
        pool.add(a2.clone());
        pool.add(b.clone());

        assert_eq!(pool.connection_count(), 3);
        assert_eq!(pool.session_count(), 2);
        assert_eq!(pool.session_connections(&a1.session_id).len(), 2);

        assert!(pool.remove(&a1.id).is_some());
        assert!(pool.remove(&a1.id).is_none());
        assert_eq!(pool.session_connections(&a1.session_id).len(), 1);

        pool.remove(&a2.id);
        assert_eq!(pool.session_count(), 1);
        assert_eq!(pool.connection_count(), 1);
        assert_eq!(pool.session_connections(&b.session_id).len(), 1);
    }
}
