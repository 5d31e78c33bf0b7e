//! Real-time session engine configuration.
//!
//! The starting draw quota is deliberately absent: it is a fixed property
//! of every session, not a deployment knob.

use serde::{Deserialize, Serialize};

use crate::types::id::DEFAULT_MAX_SESSION_ID_LENGTH;

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum byte length of a client-supplied session identifier.
    #[serde(default = "default_max_session_id_length")]
    pub max_session_id_length: usize,
    /// Maximum size of a single inbound WebSocket message.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Fixed seed for per-connection random sources.
    ///
    /// When set, the n-th attached connection derives its generator from
    /// this seed and `n`, so a fixed connection order reproduces the same
    /// draws. When absent, generators are seeded from OS entropy.
    #[serde(default)]
    pub draw_seed: Option<u64>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_session_id_length: default_max_session_id_length(),
            max_message_bytes: default_max_message_bytes(),
            draw_seed: None,
        }
    }
}

fn default_max_session_id_length() -> usize {
    DEFAULT_MAX_SESSION_ID_LENGTH
}

fn default_max_message_bytes() -> usize {
    4096
}
