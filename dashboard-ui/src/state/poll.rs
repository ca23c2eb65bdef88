//! Restartable polling timer

use gloo_timers::callback::Interval;

/// Repeating timer; restarting cancels the running interval first
#[derive(Default)]
pub struct PollTimer {
    interval: Option<Interval>,
}

impl PollTimer {
    pub fn restart(&mut self, millis: u32, tick: impl FnMut() + 'static) {
        self.stop();
        self.interval = Some(Interval::new(millis, tick));
    }

    pub fn stop(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}
