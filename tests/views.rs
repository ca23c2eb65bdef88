//! Monitoring and historical views driven against the mock API

mod support;

use std::time::Duration;

use chrono::{FixedOffset, NaiveDate};
use energy_monitor::views::historical::NO_ROWS;
use energy_monitor::views::monitoring::MONITORING_LOAD_FAILED;
use energy_monitor::views::{spawn_monitoring, DeviceStatus, FilterField};
use energy_monitor::{HistoricalView, MonitoringView};
use support::{fresh_token, session_with, Calls, MockApi};

fn mexico_city() -> FixedOffset {
    FixedOffset::west_opt(6 * 3600).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
}

#[tokio::test]
async fn test_monitoring_refresh_maps_response() {
    let mock = MockApi::start().await;
    let client = mock.client(session_with(fresh_token()));

    let mut view = MonitoringView::new();
    assert_eq!(view.load_centros(&client).await, Some(1));
    view.refresh(&client, mexico_city()).await;

    assert!(!view.loading);
    assert!(view.error.is_none());
    assert_eq!(view.current_consumption, 12.3);
    assert_eq!(view.realtime.len(), 2);
    assert_eq!(view.realtime[1].time, "10:05:00");

    assert_eq!(view.devices.len(), 2);
    assert_eq!(view.devices[0].status, DeviceStatus::Online);
    assert_eq!(view.devices[0].consumption, 4.3);
    assert_eq!(view.devices[0].last_update, "Just now");
    assert_eq!(view.devices[1].status, DeviceStatus::Offline);
    assert_eq!(view.devices[1].consumption, 0.0);
    assert_eq!(view.devices[1].last_update, "N/A");

    // No per-type breakdown in the response: derived from the total
    assert_eq!(view.consumption_by_type.len(), 3);
    assert!(view.consumption_placeholder().is_none());

    let query = mock.calls.query().unwrap();
    assert!(query.starts_with("desde="));
    assert!(query.ends_with("&timezoneOffset=-360&timezone=America/Mexico_City"));
}

#[tokio::test]
async fn test_monitoring_failure_keeps_previous_data() {
    let mock = MockApi::start().await;
    let client = mock.client(session_with(fresh_token()));

    let mut view = MonitoringView::new();
    view.load_centros(&client).await;
    view.refresh(&client, mexico_city()).await;
    let before = view.realtime.clone();

    view.select(404);
    view.refresh(&client, mexico_city()).await;

    assert_eq!(view.error.as_deref(), Some(MONITORING_LOAD_FAILED));
    assert_eq!(view.realtime, before);
    assert!(!view.loading);
}

#[tokio::test]
async fn test_poller_fetches_immediately_and_repeats() {
    let mock = MockApi::start().await;
    let client = mock.client(session_with(fresh_token()));

    let mut view = MonitoringView::new();
    view.load_centros(&client).await;

    let (poller, mut rx) =
        spawn_monitoring(client, view, mexico_city(), Duration::from_millis(50));

    rx.changed().await.unwrap();
    assert!(!rx.borrow_and_update().loading);
    rx.changed().await.unwrap();
    assert!(Calls::count(&mock.calls.monitoring) >= 2);

    poller.stop();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(poller.is_finished());
    let calls = Calls::count(&mock.calls.monitoring);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(Calls::count(&mock.calls.monitoring), calls);
}

#[tokio::test]
async fn test_historical_fetch_and_filter_change() {
    let mock = MockApi::start().await;
    let client = mock.client(session_with(fresh_token()));

    let mut view = HistoricalView::new(today());
    view.load_filter_options(&client).await;
    assert_eq!(view.centros.len(), 2);
    assert_eq!(view.areas.len(), 2);
    assert_eq!(view.sensors[0].label(), "ESP32-A");

    assert!(view.fetch_if_stale(&client).await);
    assert_eq!(
        mock.calls.query().as_deref(),
        Some("startDate=2024-05-01&endDate=2024-05-08")
    );
    assert!(view.table_placeholder().is_none());

    let rows = view.rows();
    assert_eq!(rows[0].date, "01/05/2024");
    assert_eq!(rows[0].voltage, "127.0V");
    assert_eq!(rows[0].consumption, "0.3kW");

    // Unchanged filters: no request
    assert!(!view.fetch_if_stale(&client).await);
    assert_eq!(Calls::count(&mock.calls.historical), 1);

    // Same value again is not a change
    view.set_filter(FilterField::EndDate, "2024-05-08");
    assert!(!view.fetch_if_stale(&client).await);

    view.set_filter(FilterField::CentroId, "2");
    assert!(view.fetch_if_stale(&client).await);
    assert_eq!(
        mock.calls.query().as_deref(),
        Some("startDate=2024-05-01&endDate=2024-05-08&centroId=2")
    );

    // Clearing the centro drops the parameter
    view.set_filter(FilterField::CentroId, "");
    view.fetch(&client).await;
    assert!(!mock.calls.query().unwrap().contains("centroId"));
    assert_eq!(Calls::count(&mock.calls.historical), 3);
}

#[tokio::test]
async fn test_historical_empty_after_failure() {
    // Nothing listens on port 1
    let client = energy_monitor::ApiClient::new(
        energy_monitor::ApiClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 1,
            ..Default::default()
        },
        session_with(fresh_token()),
    )
    .unwrap();

    let mut view = HistoricalView::new(today());
    view.fetch(&client).await;

    assert!(view.error.is_some());
    assert!(view.rows().is_empty());
    assert_eq!(view.table_placeholder(), Some(NO_ROWS));
}
