//! Engine metrics counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct GachaMetrics {
    /// Connections that passed attach
    connections_opened: AtomicU64,
    /// Connections whose loop has ended
    connections_closed: AtomicU64,
    /// Attach attempts rejected for a bad session id
    connections_rejected: AtomicU64,
    /// Draws granted across all sessions
    draws_granted: AtomicU64,
    /// Outcome frames delivered
    outcomes_delivered: AtomicU64,
    /// Outcomes pushed back to a backlog after a send failure
    outcomes_buffered: AtomicU64,
    /// Commands ignored as unrecognized
    commands_ignored: AtomicU64,
}

impl GachaMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful attach.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the end of a connection loop.
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected attach.
    pub fn connection_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record granted draws.
    pub fn draws_granted(&self, count: u32) {
        self.draws_granted
            .fetch_add(u64::from(count), Ordering::Relaxed);
    }

    /// Record delivered outcome frames.
    pub fn outcomes_delivered(&self, count: usize) {
        self.outcomes_delivered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record outcomes returned to a backlog.
    pub fn outcomes_buffered(&self, count: usize) {
        self.outcomes_buffered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record an ignored command.
    pub fn command_ignored(&self) {
        self.commands_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_closed: closed,
            connections_active: opened.saturating_sub(closed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            draws_granted: self.draws_granted.load(Ordering::Relaxed),
            outcomes_delivered: self.outcomes_delivered.load(Ordering::Relaxed),
            outcomes_buffered: self.outcomes_buffered.load(Ordering::Relaxed),
            commands_ignored: self.commands_ignored.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections ever attached
    pub connections_opened: u64,
    /// Connections ended
    pub connections_closed: u64,
    /// Currently running connections
    pub connections_active: u64,
    /// Rejected attach attempts
    pub connections_rejected: u64,
    /// Draws granted
    pub draws_granted: u64,
    /// Outcome frames delivered
    pub outcomes_delivered: u64,
    /// Outcomes buffered after send failures
    pub outcomes_buffered: u64,
    /// Unrecognized commands
    pub commands_ignored: u64,
}
