//! Real-time monitoring view
//!
//! View state for one selected centro: the last three hours of voltage and
//! current, the device table, energy by device and consumption by type.
//! Refreshed on selection change and every [`MONITORING_POLL_INTERVAL`].

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::charts::{Datum, LinePoint};
use crate::models::{Centro, CentroMonitoringData, Dispositivo};

pub const MONITORING_POLL_INTERVAL: Duration = Duration::from_secs(120);

pub const NO_DEVICES: &str = "No devices available";
pub const NO_DEVICE_DATA: &str = "No device data available";
pub const NO_CONSUMPTION_DATA: &str = "No consumption data available";
pub const NO_CENTERS: &str = "No centers available";
pub const MONITORING_LOAD_FAILED: &str = "Failed to load center monitoring data";
pub const CENTROS_LOAD_FAILED: &str = "Failed to load centers data";

/// Round to one decimal
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// Online iff the API reports `activo`
    pub fn from_estado(estado: &str) -> Self {
        if estado == "activo" {
            DeviceStatus::Online
        } else {
            DeviceStatus::Offline
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "Online"),
            DeviceStatus::Offline => write!(f, "Offline"),
        }
    }
}

/// One row of the device status table
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub id: i64,
    pub name: String,
    pub status: DeviceStatus,
    /// kWh, one decimal
    pub consumption: f64,
    pub last_update: String,
}

impl DeviceRow {
    pub fn from_device(device: &Dispositivo, now: DateTime<Utc>, tz: FixedOffset) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            status: DeviceStatus::from_estado(&device.status),
            consumption: device.consumption.map(round1).unwrap_or(0.0),
            last_update: format_last_update(
                device.last_update.as_deref().unwrap_or_default(),
                now,
                tz,
            ),
        }
    }
}

/// Accepted shapes for timestamps without an offset
const LOCAL_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339, or a bare local timestamp read in `tz`
fn parse_timestamp(raw: &str, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(when) = DateTime::parse_from_rfc3339(raw) {
        return Some(when);
    }
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).single())
}

/// "Just now", "1 min ago", "N mins ago" within the hour, else `HH:MM` in `tz`
pub fn format_last_update(raw: &str, now: DateTime<Utc>, tz: FixedOffset) -> String {
    let Some(when) = parse_timestamp(raw.trim(), tz) else {
        return "N/A".to_string();
    };

    let mins = (now - when.with_timezone(&Utc)).num_milliseconds().div_euclid(60_000);
    match mins {
        m if m < 1 => "Just now".to_string(),
        1 => "1 min ago".to_string(),
        m if m < 60 => format!("{} mins ago", m),
        _ => when.with_timezone(&tz).format("%H:%M").to_string(),
    }
}

/// Lighting / HVAC / Equipment at 25 / 40 / 35 % of the total, rounded
pub fn consumption_split(total: f64) -> Vec<Datum> {
    vec![
        Datum::new("Lighting", (total * 0.25).round()),
        Datum::new("HVAC", (total * 0.40).round()),
        Datum::new("Equipment", (total * 0.35).round()),
    ]
}

/// Everything the monitoring page renders
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringView {
    pub centros: Vec<Centro>,
    pub selected_centro: Option<i64>,
    pub realtime: Vec<LinePoint>,
    pub devices: Vec<DeviceRow>,
    pub energy_by_device: Vec<Datum>,
    pub consumption_by_type: Vec<Datum>,
    /// kWh, one decimal
    pub current_consumption: f64,
    /// Percent, as reported
    pub efficiency: f64,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for MonitoringView {
    fn default() -> Self {
        Self {
            centros: Vec::new(),
            selected_centro: None,
            realtime: vec![LinePoint {
                time: "00:00".to_string(),
                voltage: 0.0,
                current: 0.0,
            }],
            devices: Vec::new(),
            energy_by_device: Vec::new(),
            consumption_by_type: consumption_split(0.0),
            current_consumption: 0.0,
            efficiency: 0.0,
            loading: true,
            error: None,
        }
    }
}

impl MonitoringView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the centro list and select the first one. Returns the selection.
    pub fn set_centros(&mut self, centros: Option<Vec<Centro>>) -> Option<i64> {
        match centros {
            Some(centros) => {
                self.selected_centro = centros.first().map(|c| c.id);
                self.centros = centros;
            }
            None => {
                self.error = Some(CENTROS_LOAD_FAILED.to_string());
                self.loading = false;
            }
        }
        self.selected_centro
    }

    /// Change the selection; true when it actually changed
    pub fn select(&mut self, centro_id: i64) -> bool {
        if self.selected_centro == Some(centro_id) {
            return false;
        }
        self.selected_centro = Some(centro_id);
        true
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a monitoring response; `None` is a failed fetch.
    ///
    /// Empty series and empty energy lists keep what was shown before.
    pub fn apply(&mut self, data: Option<CentroMonitoringData>, now: DateTime<Utc>, tz: FixedOffset) {
        self.loading = false;

        let Some(data) = data else {
            self.error = Some(MONITORING_LOAD_FAILED.to_string());
            return;
        };

        let series: Vec<LinePoint> = data
            .series
            .iter()
            .map(|s| LinePoint {
                time: s.time.clone(),
                voltage: s.voltage,
                current: s.current,
            })
            .collect();
        if !series.is_empty() {
            self.realtime = series;
        }

        if !data.energy_by_device.is_empty() {
            self.energy_by_device = data
                .energy_by_device
                .iter()
                .map(|d| Datum::new(d.name.clone(), d.value))
                .collect();
        }

        self.consumption_by_type = if data.consumption_by_type.is_empty() {
            consumption_split(data.total_consumption)
        } else {
            data.consumption_by_type
                .iter()
                .map(|d| Datum::new(d.name.clone(), d.value))
                .collect()
        };

        self.devices = data
            .devices
            .iter()
            .map(|d| DeviceRow::from_device(d, now, tz))
            .collect();
        self.current_consumption = round1(data.total_consumption);
        self.efficiency = data.efficiency;
        self.error = None;
    }

    pub fn device_placeholder(&self) -> Option<&'static str> {
        self.devices.is_empty().then_some(NO_DEVICES)
    }

    pub fn energy_placeholder(&self) -> Option<&'static str> {
        self.energy_by_device.is_empty().then_some(NO_DEVICE_DATA)
    }

    pub fn consumption_placeholder(&self) -> Option<&'static str> {
        self.consumption_by_type
            .iter()
            .all(|d| d.value == 0.0)
            .then_some(NO_CONSUMPTION_DATA)
    }
}

#[cfg(feature = "native")]
mod driver {
    use super::*;
    use crate::api::ApiClient;

    impl MonitoringView {
        /// Load the centro list once and select the first
        pub async fn load_centros(&mut self, client: &ApiClient) -> Option<i64> {
            let centros = client.get_centros().await;
            self.set_centros(centros)
        }

        /// Fetch the selected centro's window, if any is selected
        pub async fn refresh(&mut self, client: &ApiClient, tz: FixedOffset) {
            let Some(centro_id) = self.selected_centro else {
                return;
            };
            self.begin_fetch();
            let data = client.get_centro_monitoring(centro_id).await;
            self.apply(data, Utc::now(), tz);
            tracing::debug!(centro_id, devices = self.devices.len(), "Monitoring view refreshed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamedValue, VoltageCurrentSample};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
    }

    fn cdmx() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn data() -> CentroMonitoringData {
        CentroMonitoringData {
            centro_id: 1,
            centro_name: "Norte".to_string(),
            total_consumption: 123.456,
            efficiency: 87.5,
            series: vec![VoltageCurrentSample {
                date: "2024-05-01".to_string(),
                time: "11:55".to_string(),
                voltage: 127.1,
                current: 3.4,
            }],
            devices: vec![
                Dispositivo {
                    id: 1,
                    name: "Chiller".to_string(),
                    status: "activo".to_string(),
                    last_update: Some("2024-05-01T17:59:30Z".to_string()),
                    consumption: Some(12.345),
                },
                Dispositivo {
                    id: 2,
                    name: "Bomba".to_string(),
                    status: "inactivo".to_string(),
                    last_update: Some("2024-05-01T16:00:00Z".to_string()),
                    consumption: None,
                },
            ],
            energy_by_device: vec![NamedValue {
                name: "Chiller".to_string(),
                value: 40.0,
            }],
            consumption_by_type: vec![],
        }
    }

    #[test]
    fn test_last_update_labels() {
        let tz = cdmx();
        assert_eq!(format_last_update("2024-05-01T17:59:30Z", now(), tz), "Just now");
        assert_eq!(format_last_update("2024-05-01T17:59:00Z", now(), tz), "1 min ago");
        assert_eq!(format_last_update("2024-05-01T17:35:00Z", now(), tz), "25 mins ago");
        assert_eq!(format_last_update("2024-05-01T16:00:00Z", now(), tz), "10:00");
        assert_eq!(format_last_update("yesterday", now(), tz), "N/A");
        assert_eq!(format_last_update("", now(), tz), "N/A");
    }

    #[test]
    fn test_last_update_without_offset_is_local() {
        let tz = cdmx();
        // 11:59:30 in Mexico City is 17:59:30Z
        assert_eq!(format_last_update("2024-05-01T11:59:30", now(), tz), "Just now");
        assert_eq!(format_last_update("2024-05-01 11:35:00", now(), tz), "25 mins ago");
        assert_eq!(format_last_update("2024-05-01T10:00:00.000", now(), tz), "10:00");
    }

    #[test]
    fn test_device_without_last_update_is_na() {
        let device = Dispositivo {
            id: 3,
            name: "Compresor".to_string(),
            status: "activo".to_string(),
            last_update: None,
            consumption: Some(1.0),
        };
        let row = DeviceRow::from_device(&device, now(), cdmx());
        assert_eq!(row.last_update, "N/A");
        assert_eq!(row.status, DeviceStatus::Online);
    }

    #[test]
    fn test_apply_maps_response() {
        let mut view = MonitoringView::new();
        view.apply(Some(data()), now(), cdmx());

        assert!(!view.loading);
        assert_eq!(view.current_consumption, 123.5);
        assert_eq!(view.efficiency, 87.5);
        assert_eq!(view.realtime[0].time, "11:55");

        assert_eq!(view.devices[0].status, DeviceStatus::Online);
        assert_eq!(view.devices[0].consumption, 12.3);
        assert_eq!(view.devices[1].status.to_string(), "Offline");
        assert_eq!(view.devices[1].consumption, 0.0);
        assert_eq!(view.devices[1].last_update, "10:00");

        // No per-type data from the API: 25/40/35 split of the total
        let split: Vec<f64> = view.consumption_by_type.iter().map(|d| d.value).collect();
        assert_eq!(split, vec![31.0, 49.0, 43.0]);
        assert!(view.consumption_placeholder().is_none());
    }

    #[test]
    fn test_empty_lists_keep_previous_series() {
        let mut view = MonitoringView::new();
        view.apply(Some(data()), now(), cdmx());

        let mut empty = data();
        empty.series.clear();
        empty.energy_by_device.clear();
        empty.devices.clear();
        view.apply(Some(empty), now(), cdmx());

        assert_eq!(view.realtime.len(), 1);
        assert_eq!(view.realtime[0].voltage, 127.1);
        assert_eq!(view.energy_by_device[0].name, "Chiller");
        assert_eq!(view.device_placeholder(), Some("No devices available"));
    }

    #[test]
    fn test_placeholders_before_data() {
        let view = MonitoringView::new();
        assert_eq!(view.device_placeholder(), Some(NO_DEVICES));
        assert_eq!(view.energy_placeholder(), Some(NO_DEVICE_DATA));
        assert_eq!(view.consumption_placeholder(), Some(NO_CONSUMPTION_DATA));
        assert_eq!(view.realtime.len(), 1);
    }

    #[test]
    fn test_failures() {
        let mut view = MonitoringView::new();
        assert_eq!(view.set_centros(None), None);
        assert_eq!(view.error.as_deref(), Some(CENTROS_LOAD_FAILED));

        view.begin_fetch();
        assert!(view.error.is_none());
        view.apply(None, now(), cdmx());
        assert_eq!(view.error.as_deref(), Some(MONITORING_LOAD_FAILED));
    }

    #[test]
    fn test_selection() {
        let mut view = MonitoringView::new();
        let centros = vec![
            Centro {
                id: 4,
                name: "Sur".to_string(),
                address: String::new(),
                description: String::new(),
            },
            Centro {
                id: 9,
                name: "Norte".to_string(),
                address: String::new(),
                description: String::new(),
            },
        ];
        assert_eq!(view.set_centros(Some(centros)), Some(4));
        assert!(!view.select(4));
        assert!(view.select(9));
        assert_eq!(view.set_centros(Some(vec![])), None);
    }
}
