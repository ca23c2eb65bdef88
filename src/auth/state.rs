//! Authentication state machine
//!
//! ```text
//! mount          : Loading -> Authenticated | Unauthenticated
//! login/register : Loading -> Authenticated | Error
//! logout         : Loading -> Unauthenticated
//! clear_error    : Error   -> state held before the failed action
//! ```
//!
//! The machine is pure; the native context and the browser dashboard each
//! wrap it in their own reactive container.

use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Session check or auth action in flight
    #[default]
    Loading,
    /// Signed in. The profile may be missing when the profile call failed.
    Authenticated { user: Option<User> },
    Unauthenticated,
    /// An auth action failed; `user` is whoever was signed in before it
    Error { message: String, user: Option<User> },
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticated { .. } | AuthState::Error { user: Some(_), .. }
        )
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated { user } | AuthState::Error { user, .. } => user.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Inputs to the machine
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// An auth action (or the mount check) started
    Begin,
    SignedIn(Option<User>),
    SignedOut,
    Failed(String),
    ClearError,
}

/// State plus the snapshot needed to undo an error
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthMachine {
    state: AuthState,
    before_action: Option<AuthState>,
}

impl AuthMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Apply an event and return the new state
    pub fn apply(&mut self, event: AuthEvent) -> &AuthState {
        self.state = match event {
            AuthEvent::Begin => {
                if !self.state.is_loading() {
                    self.before_action = Some(self.state.clone());
                }
                AuthState::Loading
            }
            AuthEvent::SignedIn(user) => {
                self.before_action = None;
                AuthState::Authenticated { user }
            }
            AuthEvent::SignedOut => {
                self.before_action = None;
                AuthState::Unauthenticated
            }
            AuthEvent::Failed(message) => {
                let user = self
                    .before_action
                    .as_ref()
                    .and_then(|s| s.user().cloned());
                AuthState::Error { message, user }
            }
            AuthEvent::ClearError => match &self.state {
                AuthState::Error { .. } => self
                    .before_action
                    .take()
                    .unwrap_or(AuthState::Unauthenticated),
                other => other.clone(),
            },
        };
        &self.state
    }
}
