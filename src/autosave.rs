use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Debounced save deadline, polled from the event loop.
#[derive(Debug, Clone)]
pub struct AutoSave {
    delay: Duration,
    due: Option<Instant>,
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending save and starts a new quiet period at `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns true exactly once when the quiet period has elapsed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::AutoSave;

    #[test]
    fn fires_once_after_quiet_period() {
        let mut task = AutoSave::new(Duration::from_millis(1000));
        let start = Instant::now();
        task.schedule(start);

        assert!(!task.fire_if_due(start + Duration::from_millis(999)));
        assert!(task.fire_if_due(start + Duration::from_millis(1000)));
        assert!(!task.fire_if_due(start + Duration::from_millis(5000)));
        assert!(!task.is_pending());
    }

    #[test]
    fn rescheduling_restarts_the_window() {
        let mut task = AutoSave::default();
        let start = Instant::now();
        task.schedule(start);
        task.schedule(start + Duration::from_millis(800));

        assert!(!task.fire_if_due(start + Duration::from_millis(1200)));
        assert!(task.fire_if_due(start + Duration::from_millis(1800)));
    }

    #[test]
    fn cancel_drops_pending_save() {
        let mut task = AutoSave::default();
        let start = Instant::now();
        task.schedule(start);
        task.cancel();
        assert!(!task.fire_if_due(start + Duration::from_secs(10)));
    }
}
