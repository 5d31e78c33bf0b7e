//! # gacha-api
//!
//! HTTP API layer for the gacha server built on Axum.
//!
//! Provides the WebSocket upgrade that hands each socket to the real-time
//! engine, health endpoints, request logging, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
