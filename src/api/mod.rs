//! Energy API
//!
//! - [`endpoints`]: paths and query strings (pure, shared with the browser)
//! - `client` (feature `native`): reqwest client with the refresh guard
//!
//! # Example
//!
//! ```rust,ignore
//! use energy_monitor::api::{ApiClient, ApiClientConfig};
//! use energy_monitor::session::FileSessionStore;
//! use std::sync::Arc;
//!
//! let session = Arc::new(FileSessionStore::new(FileSessionStore::default_path()));
//! let client = ApiClient::new(ApiClientConfig::default(), session)?;
//! let centros = client.get_centros().await.unwrap_or_default();
//! ```

pub mod endpoints;

#[cfg(feature = "native")]
mod client;

#[cfg(feature = "native")]
pub use client::{ApiClient, ApiClientConfig};

pub use endpoints::{ensure_absolute_url, HistoricalQuery, MonitoringWindow, DEFAULT_BASE_URL};
