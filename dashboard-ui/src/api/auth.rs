//! Auth calls
//!
//! Browser side of `/auth/*`, with the same session bookkeeping as the
//! native auth service.

use gloo_net::http::Request;
use serde::Serialize;

use energy_monitor::api::endpoints::{
    AUTH_LOGIN, AUTH_LOGOUT, AUTH_PROFILE, AUTH_REGISTER,
};
use energy_monitor::auth::{refresh_session, LOGIN_FAILED, REGISTRATION_FAILED};
use energy_monitor::models::{AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest, User};
use energy_monitor::SessionStore;

use super::client::{bearer, error_message, log_error, request_refresh, url};
use crate::state::LocalStorageSession;

/// POST credentials and store the returned record
async fn sign_in<B: Serialize>(path: &str, body: &B, fallback: &str) -> Result<AuthTokens, String> {
    let response = Request::post(&url(path))
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, Some(fallback)).await);
    }

    let tokens: AuthTokens = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    if let Err(e) = LocalStorageSession.save(&tokens) {
        log_error("Failed to store session", e);
    }
    Ok(tokens)
}

pub async fn login(req: &LoginRequest) -> Result<AuthTokens, String> {
    sign_in(AUTH_LOGIN, req, LOGIN_FAILED).await
}

pub async fn register(req: &RegisterRequest) -> Result<AuthTokens, String> {
    sign_in(AUTH_REGISTER, req, REGISTRATION_FAILED).await
}

/// Best-effort server logout; the stored session is always removed
pub async fn logout() {
    let session = LocalStorageSession;
    if let Some(tokens) = session.load() {
        let request = bearer(Request::post(&url(AUTH_LOGOUT)), Some(&tokens.access_token))
            .json(&RefreshTokenRequest {
                refresh_token: tokens.refresh_token.clone(),
            });
        match request {
            Ok(request) => {
                if let Err(e) = request.send().await {
                    log_error("Logout request failed", e);
                }
            }
            Err(e) => log_error("Logout request build error", e),
        }
    }
    session.clear();
}

async fn fetch_profile(token: Option<&str>) -> Result<User, u16> {
    let response = bearer(Request::get(&url(AUTH_PROFILE)), token)
        .send()
        .await
        .map_err(|e| {
            log_error("Profile request failed", e);
            0u16
        })?;

    if !response.ok() {
        return Err(response.status());
    }
    response.json().await.map_err(|e| {
        log_error("Profile parse error", e);
        0
    })
}

fn cache_user(user: &User) {
    let session = LocalStorageSession;
    if let Some(tokens) = session.load() {
        if let Err(e) = session.save(&tokens.with_user(user.clone())) {
            log_error("Failed to cache profile", e);
        }
    }
}

/// Cached user, else `/auth/profile` with one refresh-and-retry on 401
pub async fn get_profile() -> Option<User> {
    let session = LocalStorageSession;
    if let Some(user) = session.current_user() {
        return Some(user);
    }

    match fetch_profile(session.access_token().as_deref()).await {
        Ok(user) => {
            cache_user(&user);
            Some(user)
        }
        Err(401) => {
            let tokens = refresh_session(&session, request_refresh).await?;
            if tokens.user.is_some() {
                return tokens.user;
            }
            let user = fetch_profile(Some(&tokens.access_token)).await.ok()?;
            cache_user(&user);
            Some(user)
        }
        Err(_) => None,
    }
}

pub fn is_authenticated() -> bool {
    LocalStorageSession.access_token().is_some()
}
