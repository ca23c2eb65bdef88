//! Energy API HTTP Client
//!
//! reqwest client for the remote energy API. Every authenticated call runs
//! the token-refresh guard first, then issues exactly one request. Page
//! level callers use the `get_*` methods, which log failures and return
//! `None`; the auth service uses the `ClientResult` helpers underneath.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::endpoints::{self, HistoricalQuery, MonitoringWindow};
use crate::auth::guard::guarded_access_token;
use crate::auth::token::{unix_now, REFRESH_WINDOW_SECS};
use crate::error::{ClientError, ClientResult};
use crate::models::*;
use crate::session::SessionStore;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL, e.g. "http://localhost:3001". Normalised on construction.
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Refresh access tokens expiring within this many seconds
    pub refresh_window_secs: i64,
    /// Window requested by the monitoring view
    pub monitoring: MonitoringWindow,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            refresh_window_secs: REFRESH_WINDOW_SECS,
            monitoring: MonitoringWindow::default(),
        }
    }
}

/// Energy API client
///
/// Cheap to clone: the connection pool and the session store are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    refresh_window_secs: i64,
    monitoring: MonitoringWindow,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client over the given session store
    pub fn new(config: ApiClientConfig, session: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: endpoints::ensure_absolute_url(&config.base_url),
            refresh_window_secs: config.refresh_window_secs,
            monitoring: config.monitoring,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ============================================
    // TOKENS
    // ============================================

    /// Access token for the next request, refreshed first when close to expiry
    pub async fn access_token(&self) -> Option<String> {
        guarded_access_token(
            self.session.as_ref(),
            unix_now(),
            self.refresh_window_secs,
            |refresh_token| self.request_refresh(refresh_token),
        )
        .await
    }

    /// POST the refresh token; `None` on any failure. Does not touch the session.
    pub(crate) async fn request_refresh(&self, refresh_token: String) -> Option<AuthTokens> {
        let body = RefreshTokenRequest { refresh_token };
        match self.send(self.http.post(self.url(endpoints::AUTH_REFRESH)).json(&body)).await {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!("Failed to refresh token: {}", e);
                None
            }
        }
    }

    // ============================================
    // REQUEST HELPERS
    // ============================================

    /// Send a request and decode a 2xx JSON body
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        self.send_or(request, None).await
    }

    /// Like [`send`](Self::send), with `fallback` as the error message when
    /// a non-2xx body carries none
    pub(crate) async fn send_or<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: Option<&str>,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(http_error(status, response, fallback).await);
        }

        Ok(response.json().await?)
    }

    /// Attach a bearer token when one is available
    pub(crate) fn bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Guarded GET
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.access_token().await;
        tracing::debug!(path, authenticated = token.is_some(), "GET");
        let request = Self::bearer(self.http.get(self.url(path)), token.as_deref());
        self.send(request).await
    }

    /// Unguarded POST with a JSON body
    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
        fallback: Option<&str>,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let request = Self::bearer(self.http.post(self.url(path)).json(body), token);
        self.send_or(request, fallback).await
    }

    /// Unguarded GET with an explicit token (profile lookups)
    pub(crate) async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<T> {
        let request = Self::bearer(self.http.get(self.url(path)), token);
        self.send(request).await
    }

    /// Guarded GET that logs failures and yields `None`
    pub async fn fetch_api<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        match self.get_json(path).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path, "API error: {}", e);
                None
            }
        }
    }

    // ============================================
    // SENSORES
    // ============================================

    pub async fn get_sensors(&self) -> Option<Vec<Sensor>> {
        self.fetch_api(&endpoints::sensors()).await
    }

    pub async fn get_sensor(&self, id: i64) -> Option<Sensor> {
        self.fetch_api(&endpoints::sensor(id)).await
    }

    pub async fn get_sensors_by_centro(&self, centro_id: i64) -> Option<Vec<Sensor>> {
        self.fetch_api(&endpoints::sensors_by_centro(centro_id)).await
    }

    pub async fn get_sensors_by_area(&self, area_id: i64) -> Option<Vec<Sensor>> {
        self.fetch_api(&endpoints::sensors_by_area(area_id)).await
    }

    // ============================================
    // MEDICIONES
    // ============================================

    pub async fn get_mediciones(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Option<Paginated<Medicion>> {
        self.fetch_api(&endpoints::mediciones(page, limit)).await
    }

    pub async fn get_mediciones_by_sensor(
        &self,
        sensor_id: i64,
        fecha: Option<&str>,
    ) -> Option<Vec<Medicion>> {
        self.fetch_api(&endpoints::mediciones_by_sensor(sensor_id, fecha))
            .await
    }

    pub async fn get_resumen_by_sensor(
        &self,
        sensor_id: i64,
        fecha: Option<&str>,
    ) -> Option<ResumenSensor> {
        self.fetch_api(&endpoints::resumen_by_sensor(sensor_id, fecha))
            .await
    }

    /// Monitoring window for a centro, ending now
    pub async fn get_centro_monitoring(&self, centro_id: i64) -> Option<CentroMonitoringData> {
        let path = endpoints::centro_monitoring(centro_id, Utc::now(), &self.monitoring);
        self.fetch_api(&path).await
    }

    pub async fn get_historical(&self, query: &HistoricalQuery) -> Option<HistoricalData> {
        self.fetch_api(&query.path()).await
    }

    // ============================================
    // CENTROS / AREAS
    // ============================================

    pub async fn get_centros(&self) -> Option<Vec<Centro>> {
        self.fetch_api(&endpoints::centros()).await
    }

    pub async fn get_centro(&self, id: i64) -> Option<Centro> {
        self.fetch_api(&endpoints::centro(id)).await
    }

    pub async fn get_areas(&self) -> Option<Vec<Area>> {
        self.fetch_api(&endpoints::areas()).await
    }

    pub async fn get_area(&self, id: i64) -> Option<Area> {
        self.fetch_api(&endpoints::area(id)).await
    }

    pub async fn get_areas_by_centro(&self, centro_id: i64) -> Option<Vec<Area>> {
        self.fetch_api(&endpoints::areas_by_centro(centro_id)).await
    }
}

/// Build an `Http` error, preferring the server's `message` field
async fn http_error(
    status: StatusCode,
    response: reqwest::Response,
    fallback: Option<&str>,
) -> ClientError {
    let message = response
        .json::<ApiMessage>()
        .await
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| {
            fallback
                .or_else(|| status.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string()
        });

    ClientError::Http {
        status: status.as_u16(),
        message,
    }
}
