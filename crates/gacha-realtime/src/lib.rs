//! # gacha-realtime
//!
//! Session-scoped draw engine for the gacha server. Provides:
//!
//! - A draw engine over an explicit, caller-owned random source
//! - Per-session quota accounting with atomic clamp-and-decrement
//! - A sharded session store with per-session locking
//! - Ordered delivery that buffers unsent outcomes for the next reconnect
//! - The per-connection attach/flush/command state machine

pub mod connection;
pub mod delivery;
pub mod draw;
pub mod metrics;
pub mod server;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::handler::{CloseReason, ConnectionHandler, ConnectionState, ConnectionSummary};
pub use delivery::DuplexChannel;
pub use draw::Tier;
pub use metrics::{GachaMetrics, MetricsSnapshot};
pub use server::GachaEngine;
pub use session::{STARTING_QUOTA, SessionStore};
