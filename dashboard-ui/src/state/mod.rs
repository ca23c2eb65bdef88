//! State Management
//!
//! The browser session record, the reactive auth store and the polling
//! timer.

pub mod auth;
pub mod poll;
pub mod session;

pub use auth::{use_auth, AuthStore};
pub use poll::PollTimer;
pub use session::LocalStorageSession;
