//! # gacha-core
//!
//! Core crate for the gacha session server. Contains configuration schemas,
//! the session identifier type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other gacha crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::id::SessionId;
