//! Auth Store
//!
//! Reactive wrapper around the shared auth state machine. Provided once at
//! the app root; pages read `state` and call the actions.

use leptos::*;

use energy_monitor::auth::{AuthEvent, AuthMachine, AuthState};
use energy_monitor::models::{AuthTokens, LoginRequest, RegisterRequest};

use crate::api::auth as auth_api;

#[derive(Clone, Copy)]
pub struct AuthStore {
    /// Current auth state
    pub state: RwSignal<AuthState>,
    machine: StoredValue<AuthMachine>,
}

/// Provide the auth store and resolve the stored session
pub fn provide_auth() {
    let store = AuthStore {
        state: create_rw_signal(AuthState::Loading),
        machine: store_value(AuthMachine::new()),
    };
    provide_context(store);

    spawn_local(async move { store.mount().await });
}

pub fn use_auth() -> AuthStore {
    use_context::<AuthStore>().expect("AuthStore not found")
}

impl AuthStore {
    fn apply(&self, event: AuthEvent) {
        let mut next = AuthState::Loading;
        self.machine.update_value(|m| next = m.apply(event).clone());
        self.state.set(next);
    }

    async fn mount(&self) {
        self.apply(AuthEvent::Begin);

        if auth_api::is_authenticated() {
            if let Some(user) = auth_api::get_profile().await {
                self.apply(AuthEvent::SignedIn(Some(user)));
                return;
            }
        }
        self.apply(AuthEvent::SignedOut);
    }

    async fn finish_sign_in(&self, result: Result<AuthTokens, String>) -> bool {
        match result {
            Ok(tokens) => {
                let user = match tokens.user {
                    Some(user) => Some(user),
                    None => auth_api::get_profile().await,
                };
                self.apply(AuthEvent::SignedIn(user));
                true
            }
            Err(message) => {
                self.apply(AuthEvent::Failed(message));
                false
            }
        }
    }

    /// True on success; failures land in `state` as `Error`
    pub async fn login(&self, req: LoginRequest) -> bool {
        self.apply(AuthEvent::Begin);
        let result = auth_api::login(&req).await;
        self.finish_sign_in(result).await
    }

    pub async fn register(&self, req: RegisterRequest) -> bool {
        self.apply(AuthEvent::Begin);
        let result = auth_api::register(&req).await;
        self.finish_sign_in(result).await
    }

    pub async fn logout(&self) {
        self.apply(AuthEvent::Begin);
        auth_api::logout().await;
        self.apply(AuthEvent::SignedOut);
    }

    pub fn clear_error(&self) {
        self.apply(AuthEvent::ClearError);
    }
}
