//! Session store — lazily created, never evicted, per-session locking.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use gacha_core::SessionId;

use super::state::{Session, SessionHandle};

/// Thread-safe registry of every session seen by this process.
///
/// The map itself is sharded and only locked for the lookup; all quota and
/// backlog mutation goes through each session's own lock. Entries are never
/// removed, so memory grows with the number of distinct session ids.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Session ID → session state.
    sessions: DashMap<SessionId, SessionHandle>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Return the session for `id`, creating it with a full quota on first
    /// contact.
    pub fn get_or_create(&self, id: &SessionId) -> SessionHandle {
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let session = Arc::new(Session::new(id.clone()));
                entry.insert(session.clone());
                info!(session_id = %id, "Session created");
                session
            }
        }
    }

    /// Look up an existing session without creating it.
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Number of sessions known to the store.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session has been created yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
