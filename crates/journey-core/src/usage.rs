use crate::config::UsageConfig;
use crate::error::Result;
use crate::paths;
use crate::store::RecordStore;
use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_TIME: &str = "09:00";

/// Recent activity timestamps and the hour the user most often shows up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePattern {
    #[serde(default)]
    pub timestamps: Vec<DateTime<FixedOffset>>,
    #[serde(default)]
    pub common_hour: Option<u32>,
}

impl UsagePattern {
    pub fn load<S: RecordStore>(store: &S) -> Result<Self> {
        Ok(store.get(paths::USAGE_PATTERN_KEY)?.unwrap_or_default())
    }

    pub fn save<S: RecordStore>(&self, store: &S) -> Result<()> {
        store.put(paths::USAGE_PATTERN_KEY, self)
    }

    pub fn record_activity(&mut self, now: DateTime<FixedOffset>) {
        self.record_activity_with(now, &UsageConfig::default());
    }

    pub fn record_activity_with(&mut self, now: DateTime<FixedOffset>, cfg: &UsageConfig) {
        self.timestamps.push(now);
        if self.timestamps.len() > cfg.window {
            let excess = self.timestamps.len() - cfg.window;
            self.timestamps.drain(..excess);
        }
        self.common_hour = common_hour(&self.timestamps, cfg.min_samples);
        tracing::debug!(
            samples = self.timestamps.len(),
            common_hour = ?self.common_hour,
            "recorded activity"
        );
    }

    /// `HH:00` for the most common hour, or `fallback` while there are too
    /// few samples.
    pub fn suggested_time(&self, fallback: &str) -> String {
        match self.common_hour {
            Some(h) => format!("{h:02}:00"),
            None => fallback.to_string(),
        }
    }
}

/// Most frequent local hour. On a tie, the hour that first appears in
/// `timestamps` wins. Returns `None` below `min_samples`.
pub fn common_hour(timestamps: &[DateTime<FixedOffset>], min_samples: usize) -> Option<u32> {
    if timestamps.len() < min_samples {
        return None;
    }

    // (hour, count) in first-seen order.
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for ts in timestamps {
        let hour = ts.hour();
        match counts.iter_mut().find(|(h, _)| *h == hour) {
            Some((_, n)) => *n += 1,
            None => counts.push((hour, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for (hour, count) in counts {
        if best.map(|(_, max)| count > max).unwrap_or(true) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, _)| hour)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
