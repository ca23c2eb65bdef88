//! # Energy Monitor
//!
//! Client core for an energy-monitoring dashboard: voltage, current and
//! consumption readings grouped by centro, área and sensor, served by a
//! remote REST API.
//!
//! ## Modules
//!
//! - [`models`]: Records exchanged with the energy API
//! - [`session`]: Persisted access/refresh token pair
//! - [`auth`]: Token-refresh guard, auth state machine, route gate
//! - [`api`]: Endpoint catalogue and the authenticated HTTP client
//! - [`views`]: Monitoring and historical page state
//! - [`charts`]: SVG line, bar and pie charts
//!
//! Everything except the HTTP client, file sessions, config and polling
//! builds without the `native` feature, so the browser dashboard can share
//! the same views and charts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use energy_monitor::{ApiClient, ApiClientConfig, AuthService, FileSessionStore, LoginRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(FileSessionStore::new(FileSessionStore::default_path()));
//!     let client = ApiClient::new(ApiClientConfig::default(), session)?;
//!     let auth = AuthService::new(client.clone());
//!
//!     auth.login(&LoginRequest {
//!         email: "ana@example.com".to_string(),
//!         password: "secreto".to_string(),
//!     })
//!     .await?;
//!
//!     // Every later call refreshes the access token when it is about to expire
//!     if let Some(centros) = client.get_centros().await {
//!         println!("{} centros", centros.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod charts;
#[cfg(feature = "native")]
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod views;

// Re-export top-level types for convenience
pub use models::{
    Area, AuthTokens, Centro, CentroMonitoringData, HistoricalData, HistoricalRecord,
    LoginRequest, Medicion, RegisterRequest, ResumenSensor, Sensor, User,
};

pub use error::{ClientError, ClientResult};

pub use session::{MemorySessionStore, SessionError, SessionStore};

pub use auth::{
    guarded_access_token, AuthEvent, AuthMachine, AuthState, GateDecision, RegisterForm,
    ValidationError,
};

pub use api::{HistoricalQuery, MonitoringWindow};

pub use views::{HistoricalFilters, HistoricalView, MonitoringView};

#[cfg(feature = "native")]
pub use session::FileSessionStore;

#[cfg(feature = "native")]
pub use api::{ApiClient, ApiClientConfig};

#[cfg(feature = "native")]
pub use auth::{AuthContext, AuthService};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
