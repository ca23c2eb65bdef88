//! UI Components
//!
//! Layout, route protection and chart wrappers for the dashboard.

pub mod charts;
pub mod layout;
pub mod loading;
pub mod protected;

pub use charts::{BarChartView, HistoricalChartView, LineChartView, PieChartView};
pub use layout::DashboardLayout;
pub use loading::{Loading, Placeholder};
pub use protected::Protected;
