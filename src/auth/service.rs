//! Auth Service
//!
//! Login, registration, logout and profile calls against `/auth/*`, plus
//! the bookkeeping of the stored session record.

use crate::api::endpoints::{AUTH_LOGIN, AUTH_LOGOUT, AUTH_PROFILE, AUTH_REGISTER};
use crate::api::ApiClient;
use crate::auth::guard::refresh_session;
use crate::auth::{LOGIN_FAILED, REGISTRATION_FAILED};
use crate::error::{ClientError, ClientResult};
use crate::models::{AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest, User};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Sign in and persist the returned token record
    pub async fn login(&self, req: &LoginRequest) -> ClientResult<AuthTokens> {
        let tokens = self
            .client
            .post_json::<_, AuthTokens>(AUTH_LOGIN, req, None, Some(LOGIN_FAILED))
            .await?;

        self.client.session().save(&tokens)?;
        tracing::info!(email = %req.email, "Logged in");
        Ok(tokens)
    }

    /// Create an account and persist the returned token record
    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthTokens> {
        let tokens = self
            .client
            .post_json::<_, AuthTokens>(AUTH_REGISTER, req, None, Some(REGISTRATION_FAILED))
            .await?;

        self.client.session().save(&tokens)?;
        tracing::info!(email = %req.email, "Registered");
        Ok(tokens)
    }

    /// Best-effort server logout; the local session is always cleared
    pub async fn logout(&self) {
        let session = self.client.session();
        let Some(tokens) = session.load() else {
            return;
        };

        let body = RefreshTokenRequest {
            refresh_token: tokens.refresh_token,
        };
        match self
            .client
            .post_json::<_, serde_json::Value>(AUTH_LOGOUT, &body, Some(&tokens.access_token), None)
            .await
        {
            // An empty 2xx body is still a successful logout
            Ok(_) | Err(ClientError::Decode(_)) => {}
            Err(e) => tracing::warn!("Logout request failed: {}", e),
        }

        session.clear();
        tracing::info!("Logged out");
    }

    /// Exchange the refresh token; clears the session on failure
    pub async fn refresh_token(&self) -> Option<AuthTokens> {
        refresh_session(self.client.session().as_ref(), |refresh_token| {
            self.client.request_refresh(refresh_token)
        })
        .await
    }

    /// The signed-in user: cached when possible, otherwise fetched (with one
    /// refresh-and-retry on 401) and cached.
    pub async fn get_profile(&self) -> Option<User> {
        if let Some(user) = self.current_user() {
            return Some(user);
        }

        let token = self.client.session().access_token();
        match self
            .client
            .get_with_token::<User>(AUTH_PROFILE, token.as_deref())
            .await
        {
            Ok(user) => {
                self.cache_user(&user);
                Some(user)
            }
            Err(e) if e.status() == Some(401) => {
                tracing::debug!("Profile request unauthorized, refreshing");
                let tokens = self.refresh_token().await?;
                if let Some(user) = tokens.user {
                    return Some(user);
                }

                match self
                    .client
                    .get_with_token::<User>(AUTH_PROFILE, Some(&tokens.access_token))
                    .await
                {
                    Ok(user) => {
                        self.cache_user(&user);
                        Some(user)
                    }
                    Err(e) => {
                        tracing::warn!("Profile retry failed: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load profile: {}", e);
                None
            }
        }
    }

    /// A stored access token exists
    pub fn is_authenticated(&self) -> bool {
        self.client.session().access_token().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.client.session().current_user()
    }

    fn cache_user(&self, user: &User) {
        let session = self.client.session();
        if let Some(tokens) = session.load() {
            if let Err(e) = session.save(&tokens.with_user(user.clone())) {
                tracing::warn!("Failed to cache profile: {}", e);
            }
        }
    }
}
