use chrono::{DateTime, Duration, FixedOffset, Local, Utc};
use std::sync::{Arc, Mutex};

/// Source of "now" in the user's local offset. Hour-of-day logic reads the
/// local hour, stored instants are converted to UTC by callers.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }

    pub fn set(&self, at: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let start: DateTime<FixedOffset> = "2025-03-01T08:00:00-03:00".parse().unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), start + Duration::hours(2));
        assert_eq!(
            clock.now_utc(),
            "2025-03-01T13:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn clones_share_time() {
        let start: DateTime<FixedOffset> = "2025-03-01T08:00:00+00:00".parse().unwrap();
        let a = ManualClock::new(start);
        let b = a.clone();
        a.advance(Duration::minutes(30));
        assert_eq!(b.now(), start + Duration::minutes(30));
    }
}
