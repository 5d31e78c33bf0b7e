//! Per-connection state machine.
//!
//! `Attaching → Flushing → AwaitingCommand → Drawing → Delivering →
//! (AwaitingCommand | Closed)`. Attaching happens in
//! [`ConnectionHandler::attach_with_rng`]; a rejected id never produces a
//! handler. [`ConnectionHandler::run`] drives the rest until the channel
//! closes, a send fails, or the engine shuts down.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use gacha_core::SessionId;
use gacha_core::error::AppError;

use super::command::{Command, status_frame};
use super::handle::{ConnectionHandle, ConnectionId};
use crate::delivery::{DeliveryReport, DuplexChannel, deliver};
use crate::draw::draw_many;
use crate::server::GachaEngine;
use crate::session::{SessionHandle, quota};

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Session resolved, nothing sent yet.
    Attaching,
    /// Draining the backlog left by an earlier connection.
    Flushing,
    /// Waiting for the next command.
    AwaitingCommand,
    /// Reserving quota and drawing.
    Drawing,
    /// Sending the batch.
    Delivering,
    /// Terminal for this connection; the session lives on.
    Closed,
}

/// Why a connection loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the channel or the read failed.
    ClientClosed,
    /// A send failed; unsent outcomes were buffered.
    SendFailed,
    /// The engine is shutting down.
    Shutdown,
}

/// What happened over the life of one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    /// Connection ID.
    pub connection_id: ConnectionId,
    /// Session the connection was attached to.
    pub session_id: SessionId,
    /// Recognized commands processed.
    pub commands: u32,
    /// Draws granted by the quota manager.
    pub draws_granted: u32,
    /// Outcome frames delivered, backlog included.
    pub outcomes_delivered: usize,
    /// Outcomes left in the backlog when the loop ended.
    pub outcomes_buffered: usize,
    /// Final state; always `Closed` once `run` returns.
    pub state: ConnectionState,
    /// Why the loop ended.
    pub close_reason: Option<CloseReason>,
}

enum Inbound {
    Payload(String),
    Closed,
    Shutdown,
}

/// Drives one duplex channel against one session.
pub struct ConnectionHandler<R> {
    engine: GachaEngine,
    handle: Arc<ConnectionHandle>,
    session: SessionHandle,
    rng: R,
    shutdown: watch::Receiver<bool>,
    summary: ConnectionSummary,
}

impl<R> std::fmt::Debug for ConnectionHandler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandler")
            .field("connection_id", &self.handle.id)
            .field("session_id", &self.handle.session_id)
            .field("state", &self.summary.state)
            .finish()
    }
}

impl<R: Rng + Send> ConnectionHandler<R> {
    /// Resolve the session for a new connection and register it.
    ///
    /// The caller owns `rng`; draws for this connection come from it alone.
    pub fn attach_with_rng(
        engine: &GachaEngine,
        raw_session_id: Option<&str>,
        rng: R,
    ) -> Result<Self, AppError> {
        if engine.is_shutting_down() {
            engine.metrics.connection_rejected();
            warn!("Rejected connection during shutdown");
            return Err(AppError::service_unavailable("Server is shutting down"));
        }

        let session_id =
            match SessionId::parse(raw_session_id, engine.config().max_session_id_length) {
                Ok(id) => id,
                Err(e) => {
                    engine.metrics.connection_rejected();
                    warn!(error = %e, "Rejected connection");
                    return Err(e);
                }
            };

        let session = engine.sessions.get_or_create(&session_id);
        let handle = Arc::new(ConnectionHandle::new(session_id));

        let overlapping = engine.connections.session_connections(&handle.session_id).len();
        if overlapping > 0 {
            warn!(
                session_id = %handle.session_id,
                overlapping,
                "Session already has a live connection"
            );
        }

        engine.connections.add(handle.clone());
        engine.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            session_id = %handle.session_id,
            "Connection attached"
        );

        Ok(Self {
            engine: engine.clone(),
            summary: ConnectionSummary {
                connection_id: handle.id,
                session_id: handle.session_id.clone(),
                commands: 0,
                draws_granted: 0,
                outcomes_delivered: 0,
                outcomes_buffered: 0,
                state: ConnectionState::Attaching,
                close_reason: None,
            },
            handle,
            session,
            rng,
            shutdown: engine.shutdown_receiver(),
        })
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.summary.state
    }

    /// Session this connection is attached to.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Connection ID.
    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    /// Run the connection to completion.
    ///
    /// Flushes any backlog first, then serves commands. Returns once the
    /// connection is closed; nothing here is an error for the caller.
    pub async fn run<C>(mut self, channel: &mut C) -> ConnectionSummary
    where
        C: DuplexChannel + ?Sized,
    {
        self.transition(ConnectionState::Flushing);
        let backlog = self.session.pending_len().await;
        if backlog > 0 {
            debug!(session_id = %self.handle.session_id, backlog, "Flushing pending results");
        }
        let report = deliver(&self.session, channel, Vec::new()).await;
        if self.record(report) {
            return self.close(CloseReason::SendFailed);
        }

        loop {
            self.transition(ConnectionState::AwaitingCommand);

            let inbound = tokio::select! {
                payload = channel.receive() => match payload {
                    Some(payload) => Inbound::Payload(payload),
                    None => Inbound::Closed,
                },
                _ = stopping(&mut self.shutdown) => Inbound::Shutdown,
            };

            let payload = match inbound {
                Inbound::Payload(payload) => payload,
                Inbound::Closed => return self.close(CloseReason::ClientClosed),
                Inbound::Shutdown => return self.close(CloseReason::Shutdown),
            };

            let Some(command) = Command::parse(&payload) else {
                self.engine.metrics.command_ignored();
                trace!(conn_id = %self.handle.id, "Ignoring unrecognized command");
                continue;
            };
            self.summary.commands += 1;

            self.transition(ConnectionState::Drawing);
            let granted = quota::reserve(&self.session, command.requested()).await;
            let outcomes = draw_many(&mut self.rng, granted);
            self.summary.draws_granted += granted;
            self.engine.metrics.draws_granted(granted);

            self.transition(ConnectionState::Delivering);
            let report = deliver(&self.session, channel, outcomes).await;
            if self.record(report) {
                return self.close(CloseReason::SendFailed);
            }

            let remaining = self.session.quota_remaining().await;
            if let Err(e) = channel.send(&status_frame(remaining)).await {
                debug!(conn_id = %self.handle.id, error = %e, "Status frame not sent");
                return self.close(CloseReason::SendFailed);
            }
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        trace!(
            conn_id = %self.handle.id,
            from = ?self.summary.state,
            to = ?next,
            "Connection state transition"
        );
        self.summary.state = next;
    }

    /// Fold a delivery report into the summary; true when the channel broke.
    fn record(&mut self, report: DeliveryReport) -> bool {
        self.summary.outcomes_delivered += report.sent();
        self.engine.metrics.outcomes_delivered(report.sent());
        match report {
            DeliveryReport::Delivered { .. } => false,
            DeliveryReport::Queued { queued } => {
                debug!(
                    conn_id = %self.handle.id,
                    queued,
                    "Another connection is delivering for this session"
                );
                false
            }
            DeliveryReport::Interrupted { buffered, .. } => {
                self.summary.outcomes_buffered = buffered;
                self.engine.metrics.outcomes_buffered(buffered);
                true
            }
        }
    }

    fn close(mut self, reason: CloseReason) -> ConnectionSummary {
        self.transition(ConnectionState::Closed);
        self.summary.close_reason = Some(reason);

        info!(
            conn_id = %self.handle.id,
            session_id = %self.handle.session_id,
            reason = ?reason,
            commands = self.summary.commands,
            draws = self.summary.draws_granted,
            buffered = self.summary.outcomes_buffered,
            duration_ms = self.handle.age_ms(),
            "Connection closed"
        );

        self.summary.clone()
    }
}

/// Resolves once the engine has been told to stop, including before the call.
async fn stopping(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stopping| *stopping).await;
}

impl<R> Drop for ConnectionHandler<R> {
    fn drop(&mut self) {
        if self.engine.connections.remove(&self.handle.id).is_some() {
            self.engine.metrics.connection_closed();
        }
    }
}
