//! Delivery manager.
//!
//! One delivery at a time owns sending for a session. The owner takes the
//! backlog and its new batch under the session lock, releases the lock, and
//! sends frame by frame. Batches delivered by other connections meanwhile
//! are queued behind the backlog and picked up by the owner before it lets
//! go. If a send fails, whatever was not sent goes back to the head of the
//! backlog. The lock is never held across a send.

use tracing::{debug, warn};

use super::channel::DuplexChannel;
use crate::draw::Tier;
use crate::session::Session;

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Every outcome, backlog first, reached the channel.
    Delivered {
        /// Frames sent.
        sent: usize,
    },
    /// Another connection was mid-delivery; the batch went to the backlog
    /// behind everything drawn before it.
    Queued {
        /// Outcomes appended to the backlog.
        queued: usize,
    },
    /// A send failed; the unsent suffix is back in the session backlog.
    Interrupted {
        /// Frames sent before the failure.
        sent: usize,
        /// Outcomes returned to the backlog.
        buffered: usize,
    },
}

impl DeliveryReport {
    /// Frames that reached the channel.
    pub fn sent(&self) -> usize {
        match self {
            Self::Delivered { sent } | Self::Interrupted { sent, .. } => *sent,
            Self::Queued { .. } => 0,
        }
    }
}

/// Deliver any backlog followed by `outcomes`, in order.
///
/// Send failures are absorbed: the undelivered remainder, including the
/// outcome whose send failed, is stored back in the session so the next
/// connection under the same id can deliver it.
pub async fn deliver<C>(session: &Session, channel: &mut C, outcomes: Vec<Tier>) -> DeliveryReport
where
    C: DuplexChannel + ?Sized,
{
    let batch = outcomes.len();
    let Some(mut queue) = session.lock().await.begin_delivery(outcomes) else {
        debug!(
            session_id = %session.id(),
            queued = batch,
            "Delivery in flight elsewhere, queued batch"
        );
        return DeliveryReport::Queued { queued: batch };
    };

    let mut sent = 0;
    loop {
        while let Some(outcome) = queue.front().copied() {
            if let Err(e) = channel.send(outcome.label()).await {
                let buffered = queue.len();
                session.lock().await.abort_delivery(queue);
                warn!(
                    session_id = %session.id(),
                    sent,
                    buffered,
                    error = %e,
                    "Cannot send to client, storing remaining results"
                );
                return DeliveryReport::Interrupted { sent, buffered };
            }
            queue.pop_front();
            sent += 1;
        }

        match session.lock().await.continue_delivery() {
            Some(more) => queue = more,
            None => break,
        }
    }

    debug!(session_id = %session.id(), sent, "Batch delivered");
    DeliveryReport::Delivered { sent }
}
