//! Token-refresh guard
//!
//! Runs before every authenticated request:
//!
//! 1. no stored record → no token
//! 2. access token valid for longer than the window → use it
//! 3. otherwise call the refresh endpoint once; persist the new pair, or
//!    clear the session when the refresh fails
//!
//! The HTTP call is supplied by the caller as a closure so the same
//! procedure drives both the reqwest client and the browser client. There
//! is no coalescing: callers racing on an expiring token each refresh.

use std::future::Future;

use super::token::is_expired_or_close;
use crate::models::AuthTokens;
use crate::session::SessionStore;

/// Return an access token usable for the next request, refreshing first
/// when the stored one expires within `window_secs` of `now`.
pub async fn guarded_access_token<S, F, Fut>(
    store: &S,
    now: i64,
    window_secs: i64,
    refresh: F,
) -> Option<String>
where
    S: SessionStore + ?Sized,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<AuthTokens>>,
{
    let record = store.load()?;

    if !is_expired_or_close(&record.access_token, now, window_secs) {
        return Some(record.access_token);
    }

    tracing::debug!("Access token expired or close to expiry, refreshing");
    refresh_session(store, refresh)
        .await
        .map(|tokens| tokens.access_token)
}

/// Exchange the stored refresh token for a new pair.
///
/// Success replaces the record (keeping the cached user when the response
/// carries none). Failure, or a missing refresh token, clears the session.
pub async fn refresh_session<S, F, Fut>(store: &S, refresh: F) -> Option<AuthTokens>
where
    S: SessionStore + ?Sized,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<AuthTokens>>,
{
    let record = store.load()?;

    match refresh(record.refresh_token).await {
        Some(mut tokens) => {
            if tokens.user.is_none() {
                tokens.user = record.user;
            }
            if let Err(e) = store.save(&tokens) {
                tracing::warn!("Failed to persist refreshed tokens: {}", e);
            }
            tracing::info!("Session tokens refreshed");
            Some(tokens)
        }
        None => {
            tracing::info!("Token refresh failed, clearing session");
            store.clear();
            None
        }
    }
}
