//! Chart Widgets
//!
//! Pure renderers: data and dimensions in, SVG markup out. Scales are
//! recomputed from the data on every render, so a chart never holds state
//! between redraws. Hover lookups (`hover`) return what the tooltip should
//! show for a pointer position inside the plot area.
//!
//! | Chart | Used by | Series |
//! |-------|---------|--------|
//! | [`LineChart`] | monitoring | voltage + current over time of day |
//! | [`HistoricalChart`] | historical | daily voltage + consumption |
//! | [`BarChart`] | monitoring | energy by device |
//! | [`PieChart`] | monitoring | consumption by type |

pub mod bar_chart;
pub mod historical_chart;
pub mod line_chart;
pub mod pie_chart;
pub mod scale;
pub mod shape;
pub mod svg;
pub mod tooltip;

pub use bar_chart::BarChart;
pub use historical_chart::HistoricalChart;
pub use line_chart::LineChart;
pub use pie_chart::PieChart;

use serde::{Deserialize, Serialize};

/// Space around the plot area for axes and labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn inner_width(&self, width: f64) -> f64 {
        (width - self.left - self.right).max(0.0)
    }

    pub fn inner_height(&self, height: f64) -> f64 {
        (height - self.top - self.bottom).max(0.0)
    }
}

/// Margins shared by the line and historical charts
pub const CHART_MARGIN: Margin = Margin::new(20.0, 30.0, 50.0, 60.0);

pub const VOLTAGE_COLOR: &str = "#3B82F6";
pub const CURRENT_COLOR: &str = "#10B981";

/// d3's category-10 palette
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// A point on the monitoring line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// Time of day, `HH:MM` or `HH:MM:SS`
    pub time: String,
    pub voltage: f64,
    pub current: f64,
}

/// A point on the historical chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub voltage: f64,
    pub consumption: f64,
}

/// A named value, for bars and pie slices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub name: String,
    pub value: f64,
}

impl Datum {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Tooltip content for a hovered data point
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    /// Index of the hovered datum
    pub index: usize,
    /// Marker positions in plot coordinates, one per series
    pub markers: Vec<(f64, f64)>,
    /// Tooltip lines, `label: value`
    pub lines: Vec<String>,
}
