//! Page Views
//!
//! View state and the data mapping behind the dashboard pages. Each view
//! is plain data plus `apply`-style transitions, so the browser dashboard
//! and the CLI drive the same rules.
//!
//! - [`monitoring`]: real-time page for one centro, polled every two minutes
//! - [`historical`]: filterable daily history and detail table
//! - `poller` (feature `native`): tokio task that re-fetches monitoring data

pub mod historical;
pub mod monitoring;

#[cfg(feature = "native")]
pub mod poller;

pub use historical::{FilterField, HistoricalFilters, HistoricalRow, HistoricalView};
pub use monitoring::{DeviceRow, DeviceStatus, MonitoringView, MONITORING_POLL_INTERVAL};

#[cfg(feature = "native")]
pub use poller::{spawn_monitoring, Poller};
