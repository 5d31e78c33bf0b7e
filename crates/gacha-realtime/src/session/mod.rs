//! Session state, quota accounting, and the concurrent session store.

pub mod quota;
pub mod state;
pub mod store;

pub use state::{STARTING_QUOTA, Session, SessionHandle, SessionSnapshot};
pub use store::SessionStore;
