//! Real-time voltage and current chart

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::scale::{LinearScale, TimeScale};
use super::shape::monotone_x;
use super::svg::{self, num};
use super::tooltip::nearest_index;
use super::{Hover, LinePoint, CHART_MARGIN, CURRENT_COLOR, VOLTAGE_COLOR};

/// Day every time-of-day is pinned to
fn chart_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// `HH:MM[:SS]` on the fixed chart day. Unreadable times sit at midnight.
pub fn parse_time_of_day(time: &str) -> NaiveDateTime {
    let t = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .unwrap_or(NaiveTime::MIN);
    chart_day().and_time(t)
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

/// `[90, 150]`, widened to `[90, max * 1.1]` once a reading passes 145 V
pub fn voltage_domain(points: &[LinePoint]) -> (f64, f64) {
    match max_of(points.iter().map(|p| p.voltage)) {
        Some(max) if max > 145.0 => (90.0, max * 1.1),
        _ => (90.0, 150.0),
    }
}

/// `[0, 50]`, widened to `[0, max * 1.2]` once a reading passes 45
pub fn current_domain(points: &[LinePoint]) -> (f64, f64) {
    match max_of(points.iter().map(|p| p.current)) {
        Some(max) if max > 45.0 => (0.0, max * 1.2),
        _ => (0.0, 50.0),
    }
}

pub struct LineChart {
    points: Vec<LinePoint>,
    xs: Vec<f64>,
    width: f64,
    height: f64,
    inner_width: f64,
    inner_height: f64,
    x: TimeScale,
    voltage: LinearScale,
    current: LinearScale,
}

impl LineChart {
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 320.0;

    pub fn new(points: &[LinePoint], width: f64, height: f64) -> Self {
        let inner_width = CHART_MARGIN.inner_width(width);
        let inner_height = CHART_MARGIN.inner_height(height);

        let times: Vec<NaiveDateTime> = points.iter().map(|p| parse_time_of_day(&p.time)).collect();
        let x = TimeScale::from_extent(times.iter().copied(), (0.0, inner_width)).unwrap_or_else(|| {
            let midnight = parse_time_of_day("00:00");
            TimeScale::new((midnight, midnight), (0.0, inner_width))
        });
        let xs = times.iter().map(|t| x.scale(*t)).collect();

        Self {
            points: points.to_vec(),
            xs,
            width,
            height,
            inner_width,
            inner_height,
            x,
            voltage: LinearScale::new(voltage_domain(points), (inner_height, 0.0)),
            current: LinearScale::new(current_domain(points), (inner_height, 0.0)),
        }
    }

    pub fn voltage_scale(&self) -> &LinearScale {
        &self.voltage
    }

    pub fn current_scale(&self) -> &LinearScale {
        &self.current
    }

    pub fn voltage_path(&self) -> String {
        let pts: Vec<(f64, f64)> = self
            .xs
            .iter()
            .zip(&self.points)
            .map(|(x, p)| (*x, self.voltage.scale(p.voltage)))
            .collect();
        monotone_x(&pts)
    }

    pub fn current_path(&self) -> String {
        let pts: Vec<(f64, f64)> = self
            .xs
            .iter()
            .zip(&self.points)
            .map(|(x, p)| (*x, self.current.scale(p.current)))
            .collect();
        monotone_x(&pts)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        svg::open(&mut out, self.width, self.height);
        let _ = write!(
            out,
            r#"<g transform="translate({},{})">"#,
            num(CHART_MARGIN.left),
            num(CHART_MARGIN.top)
        );

        let ticks: Vec<(f64, String)> = self
            .x
            .ticks(10)
            .into_iter()
            .map(|t| (self.x.scale(t), t.format("%H:%M").to_string()))
            .collect();
        svg::axis_bottom(&mut out, &ticks, self.inner_width, self.inner_height);
        svg::axis_vertical(&mut out, &self.voltage, 0.0, true, "y-axis-voltage");
        svg::axis_vertical(&mut out, &self.current, self.inner_width, false, "y-axis-current");

        let _ = write!(
            out,
            r#"<text transform="rotate(90)" y="{}" x="{}" text-anchor="middle" font-size="12" font-weight="bold" fill="{}">Current (kW)</text>"#,
            num(-self.inner_width - 45.0),
            num(self.inner_height / 2.0),
            CURRENT_COLOR
        );

        svg::grid(&mut out, &self.voltage, self.inner_width);

        for (d, color) in [
            (self.voltage_path(), VOLTAGE_COLOR),
            (self.current_path(), CURRENT_COLOR),
        ] {
            let _ = write!(
                out,
                r#"<path fill="none" stroke="{}" stroke-width="2" d="{}"/>"#,
                color, d
            );
        }

        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">Time</text>"#,
            num(self.inner_width / 2.0),
            num(self.inner_height + CHART_MARGIN.bottom)
        );
        svg::legend(
            &mut out,
            &[(VOLTAGE_COLOR, "Voltage (V)"), (CURRENT_COLOR, "Current (A)")],
            self.inner_width,
        );

        out.push_str("</g>");
        svg::close(&mut out);
        out
    }

    /// Tooltip for a pointer at `px` (plot coordinates)
    pub fn hover(&self, px: f64) -> Option<Hover> {
        let index = nearest_index(&self.xs, px)?;
        let p = &self.points[index];
        let x = self.xs[index];

        Some(Hover {
            index,
            markers: vec![
                (x, self.voltage.scale(p.voltage)),
                (x, self.current.scale(p.current)),
            ],
            lines: vec![
                format!("Hora: {}", p.time),
                format!("Voltaje: {:.2}V", p.voltage),
                format!("Consumo: {:.2}kW", p.current),
            ],
        })
    }
}
