//! Hover lookup

/// First index whose value is not less than `x` (values sorted ascending)
pub fn bisect_left(values: &[f64], x: f64) -> usize {
    values.partition_point(|v| *v < x)
}

/// Datum under the pointer: left-bisect on the x positions, clamped to the
/// last point when the pointer is past the end
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    if xs.is_empty() {
        return None;
    }
    Some(bisect_left(xs, x).min(xs.len() - 1))
}
