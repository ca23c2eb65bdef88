//! Native auth context
//!
//! Owns the [`AuthMachine`] and publishes every transition on a
//! `tokio::sync::watch` channel, the way the dashboard publishes it through
//! signals.

use std::sync::Mutex;

use tokio::sync::watch;

use super::service::AuthService;
use super::state::{AuthEvent, AuthMachine, AuthState};
use crate::error::ClientResult;
use crate::models::{AuthTokens, LoginRequest, RegisterRequest};

pub struct AuthContext {
    service: AuthService,
    machine: Mutex<AuthMachine>,
    tx: watch::Sender<AuthState>,
}

impl AuthContext {
    /// New context in the `Loading` state; call [`mount`](Self::mount) next
    pub fn new(service: AuthService) -> Self {
        let (tx, _rx) = watch::channel(AuthState::Loading);
        Self {
            service,
            machine: Mutex::new(AuthMachine::new()),
            tx,
        }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    fn apply(&self, event: AuthEvent) {
        let state = match self.machine.lock() {
            Ok(mut machine) => machine.apply(event).clone(),
            Err(poisoned) => poisoned.into_inner().apply(event).clone(),
        };
        self.tx.send_replace(state);
    }

    /// Resolve the stored session: profile found → Authenticated, else
    /// Unauthenticated
    pub async fn mount(&self) {
        self.apply(AuthEvent::Begin);

        if self.service.is_authenticated() {
            if let Some(user) = self.service.get_profile().await {
                self.apply(AuthEvent::SignedIn(Some(user)));
                return;
            }
        }

        self.apply(AuthEvent::SignedOut);
    }

    pub async fn login(&self, req: &LoginRequest) -> ClientResult<()> {
        self.apply(AuthEvent::Begin);
        let result = self.service.login(req).await;
        self.finish_sign_in(result).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<()> {
        self.apply(AuthEvent::Begin);
        let result = self.service.register(req).await;
        self.finish_sign_in(result).await
    }

    async fn finish_sign_in(&self, result: ClientResult<AuthTokens>) -> ClientResult<()> {
        match result {
            Ok(tokens) => {
                let user = match tokens.user {
                    Some(user) => Some(user),
                    None => self.service.get_profile().await,
                };
                self.apply(AuthEvent::SignedIn(user));
                Ok(())
            }
            Err(e) => {
                self.apply(AuthEvent::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Never fails: ends Unauthenticated whatever the server says
    pub async fn logout(&self) {
        self.apply(AuthEvent::Begin);
        self.service.logout().await;
        self.apply(AuthEvent::SignedOut);
    }

    pub fn clear_error(&self) {
        self.apply(AuthEvent::ClearError);
    }
}
