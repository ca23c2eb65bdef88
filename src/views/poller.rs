//! Periodic refresh
//!
//! The monitoring page re-fetches on a fixed interval while it is shown.
//! A [`Poller`] owns the background task and aborts it when dropped, the
//! native equivalent of clearing the page's interval on unmount.

use std::time::Duration;

use chrono::FixedOffset;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::monitoring::MonitoringView;
use crate::api::ApiClient;

/// Handle to a polling task; dropping it stops the polling
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Refresh `view` now and then every `period`, publishing each result.
///
/// Polling ends when the poller is dropped or every receiver is gone.
pub fn spawn_monitoring(
    client: ApiClient,
    mut view: MonitoringView,
    tz: FixedOffset,
    period: Duration,
) -> (Poller, watch::Receiver<MonitoringView>) {
    let (tx, rx) = watch::channel(view.clone());

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            // First tick completes immediately
            interval.tick().await;
            view.refresh(&client, tz).await;

            if tx.send(view.clone()).is_err() {
                tracing::debug!("Monitoring receivers gone, stopping poller");
                break;
            }
        }
    });

    (Poller { handle }, rx)
}
