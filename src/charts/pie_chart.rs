//! Consumption-by-type pie chart

use std::fmt::Write;

use super::shape::{pie, Slice};
use super::svg::{self, escape, num};
use super::{Datum, Hover, CATEGORY10};

/// Slices at or below this share get no percentage label
const LABEL_MIN_PERCENT: f64 = 8.0;

pub struct PieChart {
    data: Vec<Datum>,
    slices: Vec<Slice>,
    total: f64,
    width: f64,
    height: f64,
}

impl PieChart {
    pub const DEFAULT_SIZE: f64 = 250.0;

    pub fn new(data: &[Datum], width: f64, height: f64) -> Self {
        let values: Vec<f64> = data.iter().map(|d| d.value).collect();
        Self {
            data: data.to_vec(),
            slices: pie(&values),
            total: values.iter().sum(),
            width,
            height,
        }
    }

    pub fn radius(&self) -> f64 {
        (self.width.min(self.height) / 2.0 - 10.0).max(0.0)
    }

    /// Share of the total, in percent
    pub fn percentage(&self, index: usize) -> f64 {
        if self.total == 0.0 {
            return 0.0;
        }
        self.data[index].value / self.total * 100.0
    }

    /// `NN%` for slices above the threshold
    pub fn label(&self, index: usize) -> Option<String> {
        let pct = self.percentage(index);
        (pct > LABEL_MIN_PERCENT).then(|| format!("{:.0}%", pct))
    }

    /// Category-10 colour for a slice
    pub fn color(index: usize) -> &'static str {
        CATEGORY10[index % CATEGORY10.len()]
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        svg::open(&mut out, self.width, self.height);
        let _ = write!(
            out,
            r#"<g transform="translate({},{})">"#,
            num(self.width / 2.0),
            num(self.height / 2.0)
        );

        let radius = self.radius();
        for (i, slice) in self.slices.iter().enumerate() {
            let _ = write!(
                out,
                r#"<g class="arc"><path class="slice" data-index="{}" d="{}" fill="{}" stroke="white" stroke-width="2"/>"#,
                i,
                slice.path(radius),
                Self::color(i)
            );
            if let Some(label) = self.label(i) {
                let (cx, cy) = slice.centroid(radius);
                let _ = write!(
                    out,
                    r#"<text transform="translate({},{})" dy=".35em" text-anchor="middle" fill="white" font-size="12" pointer-events="none">{}</text>"#,
                    num(cx),
                    num(cy),
                    escape(&label)
                );
            }
            out.push_str("</g>");
        }

        out.push_str("</g>");
        svg::close(&mut out);
        out
    }

    pub fn hover(&self, index: usize) -> Option<Hover> {
        let d = self.data.get(index)?;
        let centroid = self.slices[index].centroid(self.radius());

        Some(Hover {
            index,
            markers: vec![centroid],
            lines: vec![format!(
                "{}: {:.2} ({:.1}%)",
                d.name,
                d.value,
                self.percentage(index)
            )],
        })
    }
}
