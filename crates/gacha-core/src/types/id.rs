//! Client-supplied session identifier.
//!
//! A session id is an opaque token chosen by the client and presented at
//! connection time. It is the only key under which quota and undelivered
//! results survive a reconnect, so it is validated once at the edge and
//! carried as a distinct type afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default upper bound on the byte length of a session identifier.
pub const DEFAULT_MAX_SESSION_ID_LENGTH: usize = 128;

/// Validated, opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validate a raw identifier taken from a connection parameter.
    ///
    /// Surrounding whitespace is ignored. An absent, empty, or over-long
    /// value is a validation error.
    pub fn parse(raw: Option<&str>, max_len: usize) -> Result<Self, AppError> {
        let value = raw.map(str::trim).unwrap_or_default();

        if value.is_empty() {
            return Err(AppError::validation("Session ID required"));
        }
        if value.len() > max_len {
            return Err(AppError::validation(format!(
                "Session ID exceeds {max_len} bytes"
            )));
        }
        if value.chars().any(char::is_control) {
            return Err(AppError::validation(
                "Session ID contains control characters",
            ));
        }

        Ok(Self(value.to_string()))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
