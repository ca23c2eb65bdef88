//! Authentication
//!
//! - [`token`]: JWT payload decoding and the expiry window
//! - [`guard`]: the refresh-before-request procedure
//! - [`state`]: the `Loading / Authenticated / Unauthenticated / Error` machine
//! - [`gate`]: protected-route decisions
//! - [`validation`]: register form checks
//! - `service`, `context` (feature `native`): `/auth/*` calls and the
//!   observable auth context

pub mod gate;
pub mod guard;
pub mod state;
pub mod token;
pub mod validation;

#[cfg(feature = "native")]
mod context;
#[cfg(feature = "native")]
mod service;

#[cfg(feature = "native")]
pub use context::AuthContext;
#[cfg(feature = "native")]
pub use service::AuthService;

pub use gate::GateDecision;
pub use guard::{guarded_access_token, refresh_session};
pub use state::{AuthEvent, AuthMachine, AuthState};
pub use token::{decode_claims, is_expired_or_close, Claims, REFRESH_WINDOW_SECS};
pub use validation::{RegisterForm, ValidationError};

/// Fallback messages when the server gives no `message`
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
