//! Quota manager — clamp-and-decrement under the session lock.

use super::state::Session;

/// Reserve up to `requested` draws for `session`.
///
/// Returns the number actually granted, which is `0` once the quota is
/// exhausted. The read, clamp, and decrement happen under one acquisition of
/// the session lock.
pub async fn reserve(session: &Session, requested: u32) -> u32 {
    session.lock().await.reserve(requested)
}
