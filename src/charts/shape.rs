//! Path generators: monotone-X cubic curves and pie arcs

use std::f64::consts::TAU;

use super::svg::num;

fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Divisor that keeps the sign of the neighbouring interval when `h` is 0
fn divisor(h: f64, other: f64) -> f64 {
    if h != 0.0 {
        h
    } else if other < 0.0 {
        -0.0
    } else {
        0.0
    }
}

/// Monotone-X curve through `points` as an SVG path.
///
/// Never overshoots between points (Steffen's method). One point yields a
/// closed degenerate path, two points a straight segment; consecutive
/// duplicate points are skipped.
pub fn monotone_x(points: &[(f64, f64)]) -> String {
    let mut path = String::new();
    let (mut x0, mut y0, mut x1, mut y1) = (f64::NAN, f64::NAN, f64::NAN, f64::NAN);
    let mut t0 = f64::NAN;
    let mut state = 0;

    // Tangent at (x1, y1) given the next point
    let slope3 = |x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64| -> f64 {
        let h0 = x1 - x0;
        let h1 = x2 - x1;
        let s0 = (y1 - y0) / divisor(h0, h1);
        let s1 = (y2 - y1) / divisor(h1, h0);
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        if t.is_nan() {
            0.0
        } else {
            t
        }
    };

    // One-sided tangent at an end point
    let slope2 = |x0: f64, y0: f64, x1: f64, y1: f64, t: f64| -> f64 {
        let h = x1 - x0;
        if h != 0.0 {
            (3.0 * (y1 - y0) / h - t) / 2.0
        } else {
            t
        }
    };

    let bezier = |path: &mut String, x0: f64, y0: f64, x1: f64, y1: f64, ta: f64, tb: f64| {
        let dx = (x1 - x0) / 3.0;
        path.push_str(&format!(
            "C{},{},{},{},{},{}",
            num(x0 + dx),
            num(y0 + dx * ta),
            num(x1 - dx),
            num(y1 - dx * tb),
            num(x1),
            num(y1)
        ));
    };

    for &(x, y) in points {
        if x == x1 && y == y1 {
            continue;
        }

        let mut t1 = f64::NAN;
        match state {
            0 => {
                state = 1;
                path.push_str(&format!("M{},{}", num(x), num(y)));
            }
            1 => state = 2,
            2 => {
                state = 3;
                t1 = slope3(x0, y0, x1, y1, x, y);
                let start = slope2(x0, y0, x1, y1, t1);
                bezier(&mut path, x0, y0, x1, y1, start, t1);
            }
            _ => {
                t1 = slope3(x0, y0, x1, y1, x, y);
                bezier(&mut path, x0, y0, x1, y1, t0, t1);
            }
        }

        x0 = x1;
        x1 = x;
        y0 = y1;
        y1 = y;
        t0 = t1;
    }

    match state {
        1 => path.push('Z'),
        2 => path.push_str(&format!("L{},{}", num(x1), num(y1))),
        3 => {
            let end = slope2(x0, y0, x1, y1, t0);
            bezier(&mut path, x0, y0, x1, y1, t0, end);
        }
        _ => {}
    }

    path
}

/// One pie slice: angles in radians, clockwise from twelve o'clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Slice {
    /// Filled wedge path centred on the origin
    pub fn path(&self, radius: f64) -> String {
        let sweep = self.end_angle - self.start_angle;
        if sweep <= 0.0 {
            return String::new();
        }

        let r = num(radius);
        if sweep >= TAU - 1e-9 {
            return format!("M0,-{r}A{r},{r},0,1,1,0,{r}A{r},{r},0,1,1,0,-{r}Z", r = r);
        }

        let (x0, y0) = polar(radius, self.start_angle);
        let (x1, y1) = polar(radius, self.end_angle);
        let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
        format!(
            "M{},{}A{r},{r},0,{},1,{},{}L0,0Z",
            num(x0),
            num(y0),
            large,
            num(x1),
            num(y1),
            r = r
        )
    }

    /// Label anchor: halfway out along the bisecting angle
    pub fn centroid(&self, radius: f64) -> (f64, f64) {
        polar(radius / 2.0, (self.start_angle + self.end_angle) / 2.0)
    }
}

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Slice angles for `values` in data order; a zero total gives empty slices
pub fn pie(values: &[f64]) -> Vec<Slice> {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { TAU / total } else { 0.0 };

    let mut angle = 0.0;
    values
        .iter()
        .map(|v| {
            let start = angle;
            angle += v * k;
            Slice {
                start_angle: start,
                end_angle: angle,
            }
        })
        .collect()
}
