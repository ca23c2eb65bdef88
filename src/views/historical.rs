//! Historical view
//!
//! Filters are kept exactly as the form holds them (strings). Any change to
//! a filter value marks the view for a re-fetch; setting a field to the
//! value it already has does not.

use chrono::{Duration, NaiveDate};

use crate::api::endpoints::HistoricalQuery;
use crate::charts::HistoricalPoint;
use crate::models::{Area, Centro, DailyAverage, HistoricalData, HistoricalRecord, Sensor};

pub const NO_DATA_RECEIVED: &str = "No data received from the server.";
pub const FILTER_OPTIONS_FAILED: &str = "Error loading filter options.";
pub const NO_ROWS: &str = "No data available for the selected filters";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form fields of the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    StartDate,
    EndDate,
    CentroId,
    AreaId,
    SensorId,
}

/// Filter values as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalFilters {
    pub start_date: String,
    pub end_date: String,
    pub centro_id: String,
    pub area_id: String,
    pub sensor_id: String,
}

impl HistoricalFilters {
    /// Last seven days, no entity filters
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            start_date: (today - Duration::days(7)).format(DATE_FORMAT).to_string(),
            end_date: today.format(DATE_FORMAT).to_string(),
            centro_id: String::new(),
            area_id: String::new(),
            sensor_id: String::new(),
        }
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::CentroId => &self.centro_id,
            FilterField::AreaId => &self.area_id,
            FilterField::SensorId => &self.sensor_id,
        }
    }

    fn slot(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::CentroId => &mut self.centro_id,
            FilterField::AreaId => &mut self.area_id,
            FilterField::SensorId => &mut self.sensor_id,
        }
    }

    /// Replace a field; true when the value changed
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.slot(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Query for the API: dates when non-empty, ids when they parse to a
    /// non-zero integer
    pub fn to_query(&self) -> HistoricalQuery {
        fn date(v: &str) -> Option<String> {
            (!v.is_empty()).then(|| v.to_string())
        }
        fn id(v: &str) -> Option<i64> {
            v.trim().parse::<i64>().ok().filter(|id| *id != 0)
        }

        HistoricalQuery {
            start_date: date(&self.start_date),
            end_date: date(&self.end_date),
            centro_id: id(&self.centro_id),
            area_id: id(&self.area_id),
            sensor_id: id(&self.sensor_id),
        }
    }
}

/// Latest selectable start date (yesterday) and end date (today)
pub fn date_bounds(today: NaiveDate) -> (String, String) {
    (
        (today - Duration::days(1)).format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

/// Chart points from the per-day series. An empty series becomes a single
/// zero point on `today` so the chart always has something to draw.
pub fn chart_points(daily: &[DailyAverage], today: NaiveDate) -> Vec<HistoricalPoint> {
    if daily.is_empty() {
        return vec![HistoricalPoint {
            date: today.format(DATE_FORMAT).to_string(),
            voltage: 0.0,
            consumption: 0.0,
        }];
    }

    daily
        .iter()
        .map(|d| HistoricalPoint {
            date: d.date.split('T').next().unwrap_or_default().to_string(),
            voltage: parse_or_zero(d.avg_voltage.as_deref().unwrap_or_default()),
            consumption: parse_or_zero(d.avg_current.as_deref().unwrap_or_default()),
        })
        .collect()
}

fn parse_or_zero(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// One formatted row of the detail table
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HistoricalRow {
    pub date: String,
    pub centro: String,
    pub area: String,
    pub sensor: String,
    pub voltage: String,
    pub current: String,
    pub consumption: String,
}

impl HistoricalRow {
    pub const HEADERS: [&'static str; 7] = [
        "Fecha", "Centro", "Área", "Sensor", "Voltaje", "Corriente", "Consumo",
    ];

    pub fn from_record(record: &HistoricalRecord) -> Self {
        fn text(v: &Option<String>) -> String {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
                .to_string()
        }
        fn value(v: &Option<String>, unit: &str) -> String {
            format!("{:.1}{}", parse_or_zero(v.as_deref().unwrap_or("0")), unit)
        }

        Self {
            date: record
                .date
                .as_deref()
                .map(format_table_date)
                .unwrap_or_else(|| "N/A".to_string()),
            centro: text(&record.centro_name),
            area: text(&record.area_name),
            sensor: text(&record.sensor_uid),
            voltage: value(&record.avg_voltage, "V"),
            current: value(&record.avg_current, "A"),
            consumption: value(&record.avg_consumption, "kW"),
        }
    }

    pub fn cells(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.centro.as_str(),
            self.area.as_str(),
            self.sensor.as_str(),
            self.voltage.as_str(),
            self.current.as_str(),
            self.consumption.as_str(),
        ]
    }
}

/// `2024-05-01T00:00:00.000Z` → `01/05/2024`; unreadable dates pass through
fn format_table_date(raw: &str) -> String {
    let day = raw.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Everything the historical page renders
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalView {
    pub filters: HistoricalFilters,
    pub centros: Vec<Centro>,
    pub areas: Vec<Area>,
    pub sensors: Vec<Sensor>,
    pub records: Vec<HistoricalRecord>,
    pub daily: Vec<DailyAverage>,
    pub loading: bool,
    pub error: Option<String>,
    /// A filter changed since the last fetch started
    pub stale: bool,
}

impl HistoricalView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            filters: HistoricalFilters::defaults(today),
            centros: Vec::new(),
            areas: Vec::new(),
            sensors: Vec::new(),
            records: Vec::new(),
            daily: Vec::new(),
            loading: true,
            error: None,
            stale: true,
        }
    }

    /// Update a filter. Returns true when the view needs a re-fetch.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        if self.filters.set(field, value) {
            self.stale = true;
        }
        self.stale
    }

    /// Filter drop-down options; any missing list is a failure
    pub fn set_filter_options(
        &mut self,
        centros: Option<Vec<Centro>>,
        areas: Option<Vec<Area>>,
        sensors: Option<Vec<Sensor>>,
    ) {
        match (centros, areas, sensors) {
            (Some(c), Some(a), Some(s)) => {
                self.centros = c;
                self.areas = a;
                self.sensors = s;
            }
            _ => self.error = Some(FILTER_OPTIONS_FAILED.to_string()),
        }
    }

    /// Mark a fetch as started and hand back its query
    pub fn begin_fetch(&mut self) -> HistoricalQuery {
        self.loading = true;
        self.error = None;
        self.stale = false;
        self.filters.to_query()
    }

    pub fn apply(&mut self, data: Option<HistoricalData>) {
        self.loading = false;
        match data {
            Some(data) => {
                self.records = data.records;
                self.daily = data.daily;
            }
            None => self.error = Some(NO_DATA_RECEIVED.to_string()),
        }
    }

    pub fn chart_points(&self, today: NaiveDate) -> Vec<HistoricalPoint> {
        chart_points(&self.daily, today)
    }

    pub fn rows(&self) -> Vec<HistoricalRow> {
        self.records.iter().map(HistoricalRow::from_record).collect()
    }

    pub fn table_placeholder(&self) -> Option<&'static str> {
        (!self.loading && self.records.is_empty()).then_some(NO_ROWS)
    }
}

#[cfg(feature = "native")]
mod driver {
    use super::*;
    use crate::api::ApiClient;

    impl HistoricalView {
        /// Load centros, areas and sensors concurrently
        pub async fn load_filter_options(&mut self, client: &ApiClient) {
            let (centros, areas, sensors) =
                tokio::join!(client.get_centros(), client.get_areas(), client.get_sensors());
            self.set_filter_options(centros, areas, sensors);
        }

        /// Fetch with the current filters
        pub async fn fetch(&mut self, client: &ApiClient) {
            let query = self.begin_fetch();
            let data = client.get_historical(&query).await;
            self.apply(data);
            tracing::debug!(rows = self.records.len(), days = self.daily.len(), "Historical view refreshed");
        }

        /// Fetch only when a filter changed since the last fetch
        pub async fn fetch_if_stale(&mut self, client: &ApiClient) -> bool {
            if !self.stale {
                return false;
            }
            self.fetch(client).await;
            true
        }
    }
}

/// Write table rows as CSV with the table's headers
#[cfg(feature = "native")]
pub fn write_csv<W: std::io::Write>(rows: &[HistoricalRow], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HistoricalRow::HEADERS)?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
    }

    #[test]
    fn test_default_filters_and_bounds() {
        let filters = HistoricalFilters::defaults(today());
        assert_eq!(filters.start_date, "2024-05-01");
        assert_eq!(filters.end_date, "2024-05-08");
        assert!(filters.centro_id.is_empty());
        assert_eq!(
            date_bounds(today()),
            ("2024-05-07".to_string(), "2024-05-08".to_string())
        );
    }

    #[test]
    fn test_query_translation_omits_empty_ids() {
        let mut filters = HistoricalFilters::defaults(today());
        filters.set(FilterField::AreaId, "3");
        filters.set(FilterField::SensorId, "abc");

        let query = filters.to_query();
        assert_eq!(query.centro_id, None);
        assert_eq!(query.area_id, Some(3));
        assert_eq!(query.sensor_id, None);
        assert_eq!(
            query.path(),
            "/mediciones/historico?startDate=2024-05-01&endDate=2024-05-08&areaId=3"
        );

        filters.set(FilterField::AreaId, "0");
        assert_eq!(filters.to_query().area_id, None);
    }

    #[test]
    fn test_only_real_changes_mark_stale() {
        let mut view = HistoricalView::new(today());
        view.begin_fetch();
        assert!(!view.stale);

        assert!(!view.set_filter(FilterField::StartDate, "2024-05-01"));
        assert!(view.set_filter(FilterField::CentroId, "2"));
        assert_eq!(view.filters.get(FilterField::CentroId), "2");

        let query = view.begin_fetch();
        assert_eq!(query.centro_id, Some(2));
        assert!(!view.stale);
    }

    #[test]
    fn test_zero_points_becomes_single_zero_point() {
        let points = chart_points(&[], today());
        assert_eq!(
            points,
            vec![HistoricalPoint {
                date: "2024-05-08".to_string(),
                voltage: 0.0,
                consumption: 0.0,
            }]
        );
    }

    #[test]
    fn test_chart_points_parse_strings() {
        let daily = vec![
            DailyAverage {
                date: "2024-05-01T00:00:00.000Z".to_string(),
                avg_voltage: Some("127.5".to_string()),
                avg_current: Some("x".to_string()),
            },
            DailyAverage {
                date: "2024-05-02".to_string(),
                avg_voltage: None,
                avg_current: Some("2.5".to_string()),
            },
        ];
        let points = chart_points(&daily, today());
        assert_eq!(points[0].date, "2024-05-01");
        assert_eq!(points[0].voltage, 127.5);
        assert_eq!(points[0].consumption, 0.0);
        // Null average from the API
        assert_eq!(points[1].voltage, 0.0);
        assert_eq!(points[1].consumption, 2.5);
    }

    #[test]
    fn test_rows_format_values() {
        let record = HistoricalRecord {
            date: Some("2024-05-01T00:00:00.000Z".to_string()),
            centro_name: Some("Norte".to_string()),
            sensor_uid: Some("S-003".to_string()),
            avg_voltage: Some("127.45".to_string()),
            avg_current: Some("3.2".to_string()),
            ..Default::default()
        };
        let row = HistoricalRow::from_record(&record);
        assert_eq!(row.date, "01/05/2024");
        assert_eq!(row.area, "N/A");
        assert_eq!(row.voltage, "127.5V");
        assert_eq!(row.current, "3.2A");
        assert_eq!(row.consumption, "0.0kW");

        let empty = HistoricalRow::from_record(&HistoricalRecord::default());
        assert_eq!(empty.date, "N/A");
    }

    #[test]
    fn test_null_response_and_placeholder() {
        let mut view = HistoricalView::new(today());
        view.begin_fetch();
        view.apply(None);
        assert_eq!(view.error.as_deref(), Some(NO_DATA_RECEIVED));
        assert_eq!(view.table_placeholder(), Some(NO_ROWS));

        view.set_filter_options(Some(vec![]), None, Some(vec![]));
        assert_eq!(view.error.as_deref(), Some(FILTER_OPTIONS_FAILED));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_csv_export() {
        let rows = vec![HistoricalRow::from_record(&HistoricalRecord {
            centro_name: Some("Norte, Planta 1".to_string()),
            ..Default::default()
        })];
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Fecha,Centro,"));
        assert!(text.contains("\"Norte, Planta 1\""));
    }
}
