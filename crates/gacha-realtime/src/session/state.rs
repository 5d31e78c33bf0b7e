//! Per-session state guarded by its own lock.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use gacha_core::SessionId;

use crate::draw::Tier;

/// Draw allowance granted to every new session.
pub const STARTING_QUOTA: u32 = 20;

/// Shared handle to a session's state.
pub type SessionHandle = Arc<Session>;

/// A logical client identity that survives reconnects.
///
/// All mutable fields live behind a per-session mutex, so two connections
/// racing on the same id serialize while unrelated sessions never contend.
#[derive(Debug)]
pub struct Session {
    /// Client-supplied identifier.
    id: SessionId,
    /// When the session was first seen.
    created_at: DateTime<Utc>,
    /// Quota and undelivered results.
    state: Mutex<SessionState>,
}

/// Mutable fields of a session.
#[derive(Debug)]
pub struct SessionState {
    /// Draws this session may still request.
    quota_remaining: u32,
    /// Total draws granted so far.
    granted_total: u32,
    /// Drawn but undelivered outcomes, oldest first.
    pending: VecDeque<Tier>,
    /// Set while one connection owns sending for this session.
    delivering: bool,
}

impl SessionState {
    fn new(quota: u32) -> Self {
        Self {
            quota_remaining: quota,
            granted_total: 0,
            pending: VecDeque::new(),
            delivering: false,
        }
    }

    /// Clamp `requested` to the remaining quota and consume it.
    pub fn reserve(&mut self, requested: u32) -> u32 {
        let granted = requested.min(self.quota_remaining);
        self.quota_remaining -= granted;
        self.granted_total += granted;
        granted
    }

    /// Remaining draw allowance.
    pub fn quota_remaining(&self) -> u32 {
        self.quota_remaining
    }

    /// Total draws granted since creation.
    pub fn granted_total(&self) -> u32 {
        self.granted_total
    }

    /// Undelivered outcomes, oldest first.
    pub fn pending(&self) -> &VecDeque<Tier> {
        &self.pending
    }

    /// Remove the whole backlog, leaving it empty.
    pub fn take_pending(&mut self) -> VecDeque<Tier> {
        std::mem::take(&mut self.pending)
    }

    /// Put outcomes that were taken for delivery but never sent back at the
    /// head of the backlog.
    ///
    /// Anything buffered in the meantime was drawn later, so it stays behind.
    pub fn restore_pending(&mut self, mut unsent: VecDeque<Tier>) {
        unsent.extend(self.pending.drain(..));
        self.pending = unsent;
    }

    /// Whether some connection is currently sending this session's outcomes.
    pub fn is_delivering(&self) -> bool {
        self.delivering
    }

    /// Claim the right to send, taking the backlog followed by `outcomes`.
    ///
    /// When another delivery already holds the claim, `outcomes` are queued
    /// behind the backlog instead and `None` is returned; the holder sends
    /// them before releasing.
    pub fn begin_delivery(&mut self, outcomes: Vec<Tier>) -> Option<VecDeque<Tier>> {
        if self.delivering {
            self.pending.extend(outcomes);
            return None;
        }
        self.delivering = true;
        let mut queue = self.take_pending();
        queue.extend(outcomes);
        Some(queue)
    }

    /// Hand the holder whatever was queued while it was sending, or release
    /// the claim when nothing was.
    pub fn continue_delivery(&mut self) -> Option<VecDeque<Tier>> {
        if self.pending.is_empty() {
            self.delivering = false;
            None
        } else {
            Some(self.take_pending())
        }
    }

    /// Release the claim after a failed send, keeping `unsent` ahead of
    /// anything queued in the meantime.
    pub fn abort_delivery(&mut self, unsent: VecDeque<Tier>) {
        self.restore_pending(unsent);
        self.delivering = false;
    }
}

impl Session {
    /// Create a session with the full starting quota.
    pub fn new(id: SessionId) -> Self {
        Self::with_quota(id, STARTING_QUOTA)
    }

    pub(crate) fn with_quota(id: SessionId, quota: u32) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            state: Mutex::new(SessionState::new(quota)),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Acquire the session lock.
    ///
    /// Callers must drop the guard before awaiting on a channel.
    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    /// Remaining draw allowance.
    pub async fn quota_remaining(&self) -> u32 {
        self.lock().await.quota_remaining()
    }

    /// Number of buffered, undelivered outcomes.
    pub async fn pending_len(&self) -> usize {
        self.lock().await.pending.len()
    }

    /// Point-in-time view of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock().await;
        SessionSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            quota_remaining: state.quota_remaining,
            granted_total: state.granted_total,
            pending: state.pending.iter().copied().collect(),
        }
    }
}

/// Serializable snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: SessionId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Remaining quota.
    pub quota_remaining: u32,
    /// Draws granted so far.
    pub granted_total: u32,
    /// Undelivered outcomes, oldest first.
    pub pending: Vec<Tier>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> SessionId {
        SessionId::parse(Some(raw), 64).unwrap()
    }

    #[tokio::test]
    async fn test_new_session_has_full_quota() {
        let session = Session::new(sid("a"));
        let snap = session.snapshot().await;
        assert_eq!(snap.quota_remaining, STARTING_QUOTA);
        assert_eq!(snap.granted_total, 0);
        assert!(snap.pending.is_empty());
    }

    #[tokio::test]
    async fn test_restore_keeps_unsent_ahead_of_newer() {
        let session = Session::new(sid("a"));
        let mut state = session.lock().await;
        state.pending.extend([Tier::Common, Tier::Rare]);
        let taken = state.take_pending();
        assert!(state.pending().is_empty());

        state.pending.push_back(Tier::UltraRare);
        state.restore_pending(taken);

        let order: Vec<Tier> = state.pending().iter().copied().collect();
        assert_eq!(order, vec![Tier::Common, Tier::Rare, Tier::UltraRare]);
    }

    #[tokio::test]
    async fn test_second_delivery_queues_behind_holder() {
        let session = Session::new(sid("a"));
        let mut state = session.lock().await;
        state.pending.push_back(Tier::Common);

        let held = state.begin_delivery(vec![Tier::Rare]).unwrap();
        assert_eq!(held, VecDeque::from([Tier::Common, Tier::Rare]));
        assert!(state.is_delivering());

        assert!(state.begin_delivery(vec![Tier::UltraRare]).is_none());
        assert_eq!(state.pending().len(), 1);

        let more = state.continue_delivery().unwrap();
        assert_eq!(more, VecDeque::from([Tier::UltraRare]));
        assert!(state.continue_delivery().is_none());
        assert!(!state.is_delivering());
    }

    #[tokio::test]
    async fn test_abort_releases_claim_and_keeps_order() {
        let session = Session::new(sid("a"));
        let mut state = session.lock().await;

        let held = state.begin_delivery(vec![Tier::Common, Tier::Rare]).unwrap();
        assert!(state.begin_delivery(vec![Tier::UltraRare]).is_none());
        state.abort_delivery(held);

        assert!(!state.is_delivering());
        let order: Vec<Tier> = state.pending().iter().copied().collect();
        assert_eq!(order, vec![Tier::Common, Tier::Rare, Tier::UltraRare]);
    }
}
