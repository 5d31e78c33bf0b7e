//! Duplex channel abstraction the transport layer hands to the core.

use async_trait::async_trait;

use gacha_core::AppResult;

/// A bidirectional, message-oriented connection to one client.
///
/// Implementations wrap a concrete transport (a WebSocket in the API crate).
/// The core only ever has one outstanding `receive` or `send` at a time.
#[async_trait]
pub trait DuplexChannel: Send {
    /// Wait for the next inbound text payload.
    ///
    /// Returns `None` once the peer has closed the connection or the
    /// transport failed; the channel is not read again afterwards.
    async fn receive(&mut self) -> Option<String>;

    /// Send one outbound text frame.
    ///
    /// An error means the channel is no longer usable.
    async fn send(&mut self, frame: &str) -> AppResult<()>;
}
