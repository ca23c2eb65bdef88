//! Energy-by-device bar chart

use std::fmt::Write;

use super::scale::{BandScale, LinearScale};
use super::svg::{self, escape, num};
use super::{Datum, Hover, Margin};

const BAR_MARGIN: Margin = Margin::new(20.0, 20.0, 60.0, 40.0);

/// Bars taller than this carry their label inside, rotated
const INSIDE_LABEL_MIN_HEIGHT: f64 = 25.0;

/// Where a bar's label goes
#[derive(Debug, Clone, PartialEq)]
pub struct BarLabel {
    pub x: f64,
    pub y: f64,
    pub inside: bool,
    pub fill: &'static str,
}

pub struct BarChart {
    data: Vec<Datum>,
    width: f64,
    height: f64,
    inner_width: f64,
    inner_height: f64,
    color: String,
    x: BandScale,
    y: LinearScale,
}

impl BarChart {
    pub const DEFAULT_WIDTH: f64 = 500.0;
    pub const DEFAULT_HEIGHT: f64 = 250.0;
    pub const DEFAULT_COLOR: &'static str = "#10B981";

    pub fn new(data: &[Datum], width: f64, height: f64) -> Self {
        let inner_width = BAR_MARGIN.inner_width(width);
        let inner_height = BAR_MARGIN.inner_height(height);
        let names = data.iter().map(|d| d.name.clone()).collect();
        let max = data
            .iter()
            .map(|d| d.value)
            .filter(|v| !v.is_nan())
            .fold(0.0, f64::max);

        Self {
            data: data.to_vec(),
            width,
            height,
            inner_width,
            inner_height,
            color: Self::DEFAULT_COLOR.to_string(),
            x: BandScale::new(names, (0.0, inner_width), 0.3),
            y: LinearScale::new((0.0, max * 1.1), (inner_height, 0.0)),
        }
    }

    /// Builder method: bar fill color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn bar_height(&self, index: usize) -> f64 {
        self.inner_height - self.y.scale(self.data[index].value)
    }

    pub fn label(&self, index: usize) -> BarLabel {
        let bar_height = self.bar_height(index);
        let top = self.y.scale(self.data[index].value);
        let x = self.x.position_at(index) + self.x.bandwidth() / 2.0;

        if bar_height > INSIDE_LABEL_MIN_HEIGHT {
            BarLabel {
                x,
                y: top + bar_height / 2.0,
                inside: true,
                fill: "white",
            }
        } else {
            BarLabel {
                x,
                y: top - 5.0,
                inside: false,
                fill: "#333",
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.data.is_empty() {
            return out;
        }

        svg::open(&mut out, self.width, self.height);
        let _ = write!(
            out,
            r#"<g transform="translate({},{})">"#,
            num(BAR_MARGIN.left),
            num(BAR_MARGIN.top)
        );

        let _ = write!(
            out,
            r##"<path stroke="#ccc" fill="none" d="M0,{y}H{}"/>"##,
            num(self.inner_width),
            y = num(self.inner_height)
        );
        svg::axis_vertical(&mut out, &self.y, 0.0, true, "y-axis");
        svg::grid(&mut out, &self.y, self.inner_width);

        for (i, d) in self.data.iter().enumerate() {
            let top = self.y.scale(d.value);
            let _ = write!(
                out,
                r#"<rect class="bar" data-index="{}" x="{}" y="{}" width="{}" height="{}" fill="{}" rx="2"/>"#,
                i,
                num(self.x.position_at(i)),
                num(top),
                num(self.x.bandwidth()),
                num(self.bar_height(i)),
                escape(&self.color)
            );

            let label = self.label(i);
            let transform = if label.inside {
                format!(
                    r#" transform="rotate(-90, {}, {})""#,
                    num(label.x),
                    num(label.y)
                )
            } else {
                String::new()
            };
            let _ = write!(
                out,
                r#"<text class="bar-label" x="{}" y="{}" text-anchor="middle" font-size="11" font-weight="bold" fill="{}"{}>{}</text>"#,
                num(label.x),
                num(label.y),
                label.fill,
                transform,
                escape(&d.name)
            );
        }

        let _ = write!(
            out,
            r##"<text text-anchor="middle" x="{}" y="{}" font-size="12" fill="#555">Devices</text>"##,
            num(self.inner_width / 2.0),
            num(self.inner_height + BAR_MARGIN.bottom - 10.0)
        );
        let _ = write!(
            out,
            r##"<text text-anchor="middle" transform="rotate(-90)" y="{}" x="{}" font-size="12" fill="#555">Energy Consumption (kW)</text>"##,
            num(-BAR_MARGIN.left + 10.0),
            num(-self.inner_height / 2.0)
        );

        out.push_str("</g>");
        svg::close(&mut out);
        out
    }

    /// Tooltip for the bar at `index`
    pub fn hover(&self, index: usize) -> Option<Hover> {
        let d = self.data.get(index)?;
        let x = self.x.position_at(index) + self.x.bandwidth() / 2.0;

        Some(Hover {
            index,
            markers: vec![(x, self.y.scale(d.value))],
            lines: vec![format!("{}: {:.2}", d.name, d.value)],
        })
    }
}
