//! Ordered, loss-free delivery of drawn outcomes over a duplex channel.

pub mod channel;
pub mod manager;

pub use channel::DuplexChannel;
pub use manager::{DeliveryReport, deliver};
