//! Per-connection lifecycle — command decoding, live connection tracking,
//! and the attach/flush/command state machine.

pub mod command;
pub mod handle;
pub mod handler;
pub mod pool;

pub use command::Command;
pub use handle::{ConnectionHandle, ConnectionId};
pub use handler::{CloseReason, ConnectionHandler, ConnectionState, ConnectionSummary};
pub use pool::ConnectionPool;
