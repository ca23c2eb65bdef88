//! HTTP API Client
//!
//! Data calls used by the dashboard pages. Failures are logged to the
//! console and surface as `None`.

use chrono::Utc;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use energy_monitor::api::endpoints::{self, HistoricalQuery, MonitoringWindow};
use energy_monitor::auth::{guarded_access_token, REFRESH_WINDOW_SECS};
use energy_monitor::models::{
    ApiMessage, Area, AuthTokens, Centro, CentroMonitoringData, HistoricalData,
    RefreshTokenRequest, Sensor,
};

use crate::state::LocalStorageSession;

/// localStorage key overriding the API base URL
const API_URL_KEY: &str = "energy_monitor_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| endpoints::DEFAULT_BASE_URL.to_string());
    endpoints::ensure_absolute_url(&url)
}

pub fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

pub fn log_error(context: &str, error: impl std::fmt::Display) {
    web_sys::console::error_1(&format!("{}: {}", context, error).into());
}

/// Attach a bearer token when one is available
pub fn bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
        None => request,
    }
}

/// Error text for a non-2xx response: server `message`, else `fallback`,
/// else the status
pub async fn error_message(response: Response, fallback: Option<&str>) -> String {
    let status = response.status();
    let message = response
        .json::<ApiMessage>()
        .await
        .ok()
        .and_then(|m| m.message);
    message
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// POST the refresh token; `None` on any failure
pub async fn request_refresh(refresh_token: String) -> Option<AuthTokens> {
    let request = Request::post(&url(endpoints::AUTH_REFRESH))
        .json(&RefreshTokenRequest { refresh_token })
        .map_err(|e| log_error("Refresh request build error", e))
        .ok()?;

    match request.send().await {
        Ok(response) if response.ok() => response
            .json()
            .await
            .map_err(|e| log_error("Refresh parse error", e))
            .ok(),
        Ok(response) => {
            log_error("Failed to refresh token", error_message(response, None).await);
            None
        }
        Err(e) => {
            log_error("Failed to refresh token", e);
            None
        }
    }
}

/// Access token for the next request, refreshed first when close to expiry
pub async fn access_token() -> Option<String> {
    guarded_access_token(
        &LocalStorageSession,
        Utc::now().timestamp(),
        REFRESH_WINDOW_SECS,
        request_refresh,
    )
    .await
}

/// Guarded GET that logs failures and yields `None`
pub async fn fetch_api<T: DeserializeOwned>(path: &str) -> Option<T> {
    let token = access_token().await;
    let request = bearer(Request::get(&url(path)), token.as_deref());

    match request.send().await {
        Ok(response) if response.ok() => match response.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                log_error(&format!("Parse error for {}", path), e);
                None
            }
        },
        Ok(response) => {
            log_error(&format!("API error for {}", path), error_message(response, None).await);
            None
        }
        Err(e) => {
            log_error(&format!("Network error for {}", path), e);
            None
        }
    }
}

// ============ Data Calls ============

pub async fn get_centros() -> Option<Vec<Centro>> {
    fetch_api(&endpoints::centros()).await
}

pub async fn get_areas() -> Option<Vec<Area>> {
    fetch_api(&endpoints::areas()).await
}

pub async fn get_sensors() -> Option<Vec<Sensor>> {
    fetch_api(&endpoints::sensors()).await
}

pub async fn get_centro_monitoring(centro_id: i64) -> Option<CentroMonitoringData> {
    let path = endpoints::centro_monitoring(centro_id, Utc::now(), &MonitoringWindow::default());
    fetch_api(&path).await
}

pub async fn get_historical(query: &HistoricalQuery) -> Option<HistoricalData> {
    fetch_api(&query.path()).await
}
