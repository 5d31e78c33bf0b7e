//! In-memory duplex channel for driving the core in tests.

use std::collections::VecDeque;

use async_trait::async_trait;

use gacha_core::{AppError, AppResult};

use crate::delivery::DuplexChannel;

/// Replays a fixed list of inbound payloads and records every sent frame.
///
/// With `fail_after(n)` the first `n` sends succeed and every later send
/// fails, like a socket that went away mid-batch.
#[derive(Debug, Default)]
pub(crate) struct ScriptedChannel {
    inbound: VecDeque<String>,
    pub sent: Vec<String>,
    fail_after: Option<usize>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inbound<I, S>(inbound: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbound: inbound.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn fail_after(mut self, sends: usize) -> Self {
        self.fail_after = Some(sends);
        self
    }
}

#[async_trait]
impl DuplexChannel for ScriptedChannel {
    async fn receive(&mut self) -> Option<String> {
        self.inbound.pop_front()
    }

    async fn send(&mut self, frame: &str) -> AppResult<()> {
        if self.fail_after.is_some_and(|limit| self.sent.len() >= limit) {
            return Err(AppError::transport("scripted send failure"));
        }
        self.sent.push(frame.to_string());
        Ok(())
    }
}
