//! SVG writing helpers shared by the charts

use std::fmt::Write;

use super::scale::LinearScale;

/// Compact number formatting: at most three decimals, no trailing zeros
pub fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Tick label for a linear axis, d3-style (no needless decimals)
pub fn tick_label(v: f64) -> String {
    num(v)
}

/// Opening `<svg>` tag with a viewBox so the chart scales with its container
pub fn open(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid meet">"#,
        num(width),
        num(height)
    );
}

pub fn close(out: &mut String) {
    out.push_str("</svg>");
}

/// Vertical axis at `x` with ticks to the left (`left = true`) or right
pub fn axis_vertical(out: &mut String, scale: &LinearScale, x: f64, left: bool, class: &str) {
    let (r0, r1) = scale.range();
    let dir = if left { -1.0 } else { 1.0 };
    let anchor = if left { "end" } else { "start" };

    let _ = write!(
        out,
        r#"<g class="{}" transform="translate({},0)"><path stroke="currentColor" fill="none" d="M{},{}H0V{}H{}"/>"#,
        class,
        num(x),
        num(6.0 * dir),
        num(r0),
        num(r1),
        num(6.0 * dir)
    );
    for t in scale.ticks(10) {
        let y = scale.scale(t);
        let _ = write!(
            out,
            r##"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="{}"/><text fill="#000000" font-size="11" font-weight="600" x="{}" dy="0.32em" text-anchor="{}">{}</text></g>"##,
            num(y),
            num(6.0 * dir),
            num(9.0 * dir),
            anchor,
            tick_label(t)
        );
    }
    out.push_str("</g>");
}

/// Dashed horizontal grid lines at the scale's ticks
pub fn grid(out: &mut String, scale: &LinearScale, width: f64) {
    out.push_str(r##"<g class="grid" stroke="#808080" stroke-opacity="0.2" stroke-dasharray="3,3">"##);
    for t in scale.ticks(10) {
        let _ = write!(
            out,
            r#"<line x1="0" x2="{}" y1="{y}" y2="{y}"/>"#,
            num(width),
            y = num(scale.scale(t))
        );
    }
    out.push_str("</g>");
}

/// Bottom axis with rotated labels at the given pixel positions
pub fn axis_bottom(out: &mut String, ticks: &[(f64, String)], width: f64, y: f64) {
    let _ = write!(
        out,
        r#"<g class="x-axis" transform="translate(0,{})"><path stroke="currentColor" fill="none" d="M0,6V0H{}V6"/>"#,
        num(y),
        num(width)
    );
    for (x, label) in ticks {
        let _ = write!(
            out,
            r##"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="6"/><text fill="#000000" font-size="11" font-weight="600" y="9" dx="-.8em" dy=".15em" text-anchor="end" transform="rotate(-45)">{}</text></g>"##,
            num(*x),
            escape(label)
        );
    }
    out.push_str("</g>");
}

/// Two-entry legend in the top right corner of the plot area
pub fn legend(out: &mut String, entries: &[(&str, &str)], inner_width: f64) {
    for (i, (color, text)) in entries.iter().enumerate() {
        let _ = write!(
            out,
            r#"<g class="legend" transform="translate(0,{})"><rect x="{}" y="10" width="15" height="3" fill="{c}" stroke="{c}"/><text x="{}" y="10" dy=".35em" font-size="11" font-weight="bold" fill="{c}">{}</text></g>"#,
            i * 20,
            num(inner_width - 100.0),
            num(inner_width - 80.0),
            escape(text),
            c = color
        );
    }
}
