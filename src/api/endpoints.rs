//! Endpoint catalogue
//!
//! Paths and query strings for every call the dashboard makes. Pure, so
//! the native and browser clients build identical requests.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// API base URL when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Prefix `https://` when the URL has no scheme; drop trailing slashes
pub fn ensure_absolute_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn with_fecha(path: String, fecha: Option<&str>) -> String {
    match fecha {
        Some(f) if !f.is_empty() => format!("{}?fecha={}", path, urlencoding::encode(f)),
        _ => path,
    }
}

// ============================================
// AUTH
// ============================================

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_REFRESH: &str = "/auth/refresh-token";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_PROFILE: &str = "/auth/profile";

// ============================================
// SENSORES
// ============================================

pub fn sensors() -> String {
    "/sensores".to_string()
}

pub fn sensor(id: i64) -> String {
    format!("/sensores/{}", id)
}

pub fn sensors_by_centro(centro_id: i64) -> String {
    format!("/sensores/centro/{}", centro_id)
}

pub fn sensors_by_area(area_id: i64) -> String {
    format!("/sensores/area/{}", area_id)
}

// ============================================
// MEDICIONES
// ============================================

/// `/mediciones?page=&limit=`, each parameter only when given
pub fn mediciones(page: Option<u32>, limit: Option<u32>) -> String {
    let mut params = Vec::new();
    if let Some(page) = page {
        params.push(format!("page={}", page));
    }
    if let Some(limit) = limit {
        params.push(format!("limit={}", limit));
    }
    format!("/mediciones?{}", params.join("&"))
}

pub fn mediciones_by_sensor(sensor_id: i64, fecha: Option<&str>) -> String {
    with_fecha(format!("/mediciones/sensor/{}", sensor_id), fecha)
}

pub fn resumen_by_sensor(sensor_id: i64, fecha: Option<&str>) -> String {
    with_fecha(format!("/mediciones/resumen/sensor/{}", sensor_id), fecha)
}

/// Time window requested by the monitoring view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringWindow {
    pub hours: i64,
    pub timezone: String,
    pub timezone_offset_minutes: i32,
}

impl Default for MonitoringWindow {
    fn default() -> Self {
        Self {
            hours: 3,
            timezone: "America/Mexico_City".to_string(),
            timezone_offset_minutes: -360,
        }
    }
}

/// `/mediciones/centro/{id}/monitoring?desde=<now - window>&timezoneOffset=&timezone=`
pub fn centro_monitoring(centro_id: i64, now: DateTime<Utc>, window: &MonitoringWindow) -> String {
    let desde = (now - Duration::hours(window.hours)).to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        "/mediciones/centro/{}/monitoring?desde={}&timezoneOffset={}&timezone={}",
        centro_id, desde, window.timezone_offset_minutes, window.timezone
    )
}

/// Filters for `/mediciones/historico`. Unset, empty and zero values are
/// left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub centro_id: Option<i64>,
    pub area_id: Option<i64>,
    pub sensor_id: Option<i64>,
}

impl HistoricalQuery {
    /// Query parameters in wire order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let dates = [("startDate", &self.start_date), ("endDate", &self.end_date)];
        for (name, value) in dates {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push((name, v.to_string()));
            }
        }

        let ids = [
            ("centroId", self.centro_id),
            ("areaId", self.area_id),
            ("sensorId", self.sensor_id),
        ];
        for (name, value) in ids {
            if let Some(id) = value.filter(|id| *id != 0) {
                params.push((name, id.to_string()));
            }
        }

        params
    }

    pub fn path(&self) -> String {
        let query = self
            .params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("/mediciones/historico?{}", query)
    }
}

// ============================================
// CENTROS / AREAS
// ============================================

pub fn centros() -> String {
    "/centros".to_string()
}

pub fn centro(id: i64) -> String {
    format!("/centros/{}", id)
}

pub fn areas() -> String {
    "/areas".to_string()
}

pub fn area(id: i64) -> String {
    format!("/areas/{}", id)
}

pub fn areas_by_centro(centro_id: i64) -> String {
    format!("/areas/centro/{}", centro_id)
}
