//! Daily voltage and consumption chart

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use super::scale::{LinearScale, TimeScale};
use super::shape::monotone_x;
use super::svg::{self, escape, num};
use super::tooltip::nearest_index;
use super::{Hover, HistoricalPoint, CHART_MARGIN, CURRENT_COLOR, VOLTAGE_COLOR};

/// A parsed, plottable day
#[derive(Debug, Clone, PartialEq)]
struct Day {
    date: NaiveDateTime,
    voltage: f64,
    consumption: f64,
}

/// Upper bound `max * factor`, or `fallback` when that is zero or NaN
fn scaled_max(values: impl Iterator<Item = f64>, factor: f64, fallback: f64) -> f64 {
    let max = values.filter(|v| !v.is_nan()).fold(f64::NAN, f64::max);
    let top = max * factor;
    if top == 0.0 || top.is_nan() {
        fallback
    } else {
        top
    }
}

pub struct HistoricalChart {
    days: Vec<Day>,
    xs: Vec<f64>,
    width: f64,
    height: f64,
    inner_width: f64,
    inner_height: f64,
    x: TimeScale,
    voltage: LinearScale,
    consumption: LinearScale,
}

impl HistoricalChart {
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 320.0;

    /// `today` stands in for dates that do not parse as `%Y-%m-%d`
    pub fn new(points: &[HistoricalPoint], width: f64, height: f64, today: NaiveDate) -> Self {
        let inner_width = CHART_MARGIN.inner_width(width);
        let inner_height = CHART_MARGIN.inner_height(height);
        let fallback = today.and_hms_opt(0, 0, 0).unwrap_or_default();

        let mut days: Vec<Day> = points
            .iter()
            .map(|p| Day {
                date: NaiveDate::parse_from_str(&p.date, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap_or(fallback),
                voltage: p.voltage,
                consumption: p.consumption,
            })
            .collect();
        days.sort_by_key(|d| d.date);

        let x = TimeScale::from_extent(days.iter().map(|d| d.date), (0.0, inner_width))
            .unwrap_or_else(|| TimeScale::new((fallback, fallback), (0.0, inner_width)));
        let xs = days.iter().map(|d| x.scale(d.date)).collect();

        let voltage_top = scaled_max(days.iter().map(|d| d.voltage), 1.1, 150.0);
        let consumption_top = scaled_max(days.iter().map(|d| d.consumption), 1.2, 10.0);

        Self {
            days,
            xs,
            width,
            height,
            inner_width,
            inner_height,
            x,
            voltage: LinearScale::new((90.0, voltage_top), (inner_height, 0.0)),
            consumption: LinearScale::new((0.0, consumption_top), (inner_height, 0.0)),
        }
    }

    pub fn voltage_scale(&self) -> &LinearScale {
        &self.voltage
    }

    pub fn consumption_scale(&self) -> &LinearScale {
        &self.consumption
    }

    /// X tick labels: exactly the data dates, `%d/%m`
    pub fn tick_labels(&self) -> Vec<String> {
        self.days
            .iter()
            .map(|d| d.date.format("%d/%m").to_string())
            .collect()
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
            .xs
            .iter()
            .copied()
            .zip(self.tick_labels())
            .collect();
        svg::axis_bottom(&mut out, &ticks, self.inner_width, self.inner_height);

        let _ = write!(
            out,
            r##"<text text-anchor="middle" x="{}" y="{}" font-size="12" font-weight="bold" fill="#000000">Fecha</text>"##,
            num(self.inner_width / 2.0),
            num(self.inner_height + CHART_MARGIN.bottom)
        );

        svg::axis_vertical(&mut out, &self.voltage, 0.0, true, "y-axis-voltage");
        svg::axis_vertical(&mut out, &self.consumption, self.inner_width, false, "y-axis-consumption");
        svg::grid(&mut out, &self.voltage, self.inner_width);

        let voltage: Vec<(f64, f64)> = self
            .xs
            .iter()
            .zip(&self.days)
            .map(|(x, d)| (*x, self.voltage.scale(d.voltage)))
            .collect();
        let consumption: Vec<(f64, f64)> = self
            .xs
            .iter()
            .zip(&self.days)
            .map(|(x, d)| (*x, self.consumption.scale(d.consumption)))
            .collect();

        for (pts, color) in [(voltage, VOLTAGE_COLOR), (consumption, CURRENT_COLOR)] {
            let _ = write!(
                out,
                r#"<path fill="none" stroke="{}" stroke-width="2" d="{}"/>"#,
                color,
                monotone_x(&pts)
            );
        }

        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" font-weight="bold">{}</text>"#,
            num(self.inner_width / 2.0),
            num(-CHART_MARGIN.top / 2.0),
            escape("Histórico de Voltaje y Consumo por Día")
        );
        svg::legend(
            &mut out,
            &[(VOLTAGE_COLOR, "Voltaje (V)"), (CURRENT_COLOR, "Consumo (kW)")],
            self.inner_width,
        );

        out.push_str("</g>");
        svg::close(&mut out);
        out
    }

    pub fn hover(&self, px: f64) -> Option<Hover> {
        let index = nearest_index(&self.xs, px)?;
        let day = &self.days[index];
        let x = self.xs[index];

        Some(Hover {
            index,
            markers: vec![
                (x, self.voltage.scale(day.voltage)),
                (x, self.consumption.scale(day.consumption)),
            ],
            lines: vec![
                format!("Fecha: {}", day.date.format("%d/%m")),
                format!("Voltaje: {:.2}V", day.voltage),
                format!("Consumo: {:.2}kW", day.consumption),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
    }

    fn point(date: &str, voltage: f64, consumption: f64) -> HistoricalPoint {
        HistoricalPoint {
            date: date.to_string(),
            voltage,
            consumption,
        }
    }

    #[test]
    fn test_sorted_ticks_at_data_dates() {
        let data = [
            point("2024-05-03", 126.0, 4.0),
            point("2024-05-01", 127.0, 3.0),
            point("not-a-date", 125.0, 5.0),
        ];
        let chart = HistoricalChart::new(&data, 800.0, 320.0, today());
        assert_eq!(chart.tick_labels(), vec!["01/05", "03/05", "08/05"]);
        assert!(chart.render().contains(">03/05<"));
    }

    #[test]
    fn test_domains() {
        let chart = HistoricalChart::new(&[point("2024-05-01", 130.0, 5.0)], 800.0, 320.0, today());
        let (_, v_top) = chart.voltage_scale().domain();
        let (_, c_top) = chart.consumption_scale().domain();
        assert!((v_top - 143.0).abs() < 1e-9);
        assert!((c_top - 6.0).abs() < 1e-9);

        // All-zero series fall back to fixed tops
        let zero = HistoricalChart::new(&[point("2024-05-08", 0.0, 0.0)], 800.0, 320.0, today());
        assert_eq!(zero.voltage_scale().domain(), (90.0, 150.0));
        assert_eq!(zero.consumption_scale().domain(), (0.0, 10.0));
    }

    #[test]
    fn test_hover_formats_date() {
        let data = [point("2024-05-01", 127.0, 3.25), point("2024-05-02", 128.0, 3.5)];
        let chart = HistoricalChart::new(&data, 800.0, 320.0, today());
        let hover = chart.hover(0.0).unwrap();
        assert_eq!(hover.lines[0], "Fecha: 01/05");
        assert_eq!(hover.lines[2], "Consumo: 3.25kW");
    }
}
