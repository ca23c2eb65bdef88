//! Scales
//!
//! Linear, time and band scales with d3's mapping rules, so axes land on
//! the same ticks the dashboard has always shown.

use chrono::{Duration, NaiveDateTime, Timelike};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// `(i1, i2, inc)`; a negative `inc` means "divide by -inc"
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let pos = 10f64.powf(-power) / factor;
        i1 = (start * pos).round();
        i2 = (stop * pos).round();
        if i1 / pos < start {
            i1 += 1.0;
        }
        if i2 / pos > stop {
            i2 -= 1.0;
        }
        inc = -pos;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Round tick values (1, 2 or 5 × 10^k) covering `[start, stop]`
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi, reverse) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };

    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();

    if reverse {
        out.reverse();
    }
    out
}

/// Continuous linear scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Domain value to pixel. A collapsed domain maps to the middle of the range.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    /// Pixel to domain value
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if r1 == r0 { 0.5 } else { (px - r0) / (r1 - r0) };
        d0 + t * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Time scale over naive timestamps (millisecond resolution)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDateTime,
    end: NaiveDateTime,
    linear: LinearScale,
}

fn millis(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64
}

fn from_millis(ms: f64) -> NaiveDateTime {
    chrono::DateTime::from_timestamp_millis(ms.round() as i64)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

/// Candidate tick intervals, shortest first
const TIME_INTERVALS: [i64; 16] = [
    1,
    5,
    15,
    30,
    60,
    5 * 60,
    15 * 60,
    30 * 60,
    3600,
    3 * 3600,
    6 * 3600,
    12 * 3600,
    86_400,
    2 * 86_400,
    7 * 86_400,
    30 * 86_400,
];

impl TimeScale {
    /// Scale over `[min, max]` of the given instants
    pub fn from_extent<I>(values: I, range: (f64, f64)) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(Self::new((start, end), range))
    }

    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self {
            start: domain.0,
            end: domain.1,
            linear: LinearScale::new((millis(domain.0), millis(domain.1)), range),
        }
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }

    pub fn scale(&self, t: NaiveDateTime) -> f64 {
        self.linear.scale(millis(t))
    }

    pub fn invert(&self, px: f64) -> NaiveDateTime {
        from_millis(self.linear.invert(px))
    }

    /// About `count` ticks on a calendar-friendly interval
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        if count == 0 {
            return Vec::new();
        }
        if self.start == self.end {
            return vec![self.start];
        }

        let span = (self.end - self.start).num_milliseconds() as f64 / 1000.0;
        let target = span / count as f64;
        let interval = TIME_INTERVALS
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (*a as f64 / target).ln().abs();
                let db = (*b as f64 / target).ln().abs();
                da.total_cmp(&db)
            })
            .unwrap_or(3600);

        let day_start = self.start.date().and_hms_opt(0, 0, 0).unwrap_or(self.start);
        let offset = self.start.num_seconds_from_midnight() as i64;
        let first = day_start + Duration::seconds((offset + interval - 1) / interval * interval);

        let mut out = Vec::new();
        let mut t = first;
        while t <= self.end {
            out.push(t);
            t += Duration::seconds(interval);
        }
        out
    }
}

/// Ordinal band scale (d3 `scaleBand` with `align = 0.5`)
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// `padding` sets both inner and outer padding
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;

        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Left edge of the band for `key`
    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| self.position_at(i))
    }

    pub fn position_at(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }
}
