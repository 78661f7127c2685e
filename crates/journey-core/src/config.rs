use crate::error::{JourneyError, Result};
use crate::paths;
use crate::reminder::parse_time;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// NotificationsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u32,
    #[serde(default = "default_time")]
    pub default_time: String,
}

fn default_check_interval() -> u32 {
    60
}

fn default_time() -> String {
    crate::usage::DEFAULT_REMINDER_TIME.to_string()
}

impl NotificationsConfig {
    /// Preferred time for new reminder preferences and for usage
    /// suggestions without enough samples. An invalid value falls back to
    /// the built-in default.
    pub fn reminder_time(&self) -> &str {
        if parse_time(&self.default_time).is_ok() {
            &self.default_time
        } else {
            crate::usage::DEFAULT_REMINDER_TIME
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval(),
            default_time: default_time(),
        }
    }
}

// ---------------------------------------------------------------------------
// UsageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConfig {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

fn default_window() -> usize {
    30
}

fn default_min_samples() -> usize {
    3
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_samples: default_min_samples(),
        }
    }
}

// ---------------------------------------------------------------------------
// TimerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus")]
    pub focus_minutes: u32,
    #[serde(default = "default_break")]
    pub break_minutes: u32,
}

fn default_focus() -> u32 {
    25
}

fn default_break() -> u32 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus(),
            break_minutes: default_break(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub usage: UsageConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            notifications: NotificationsConfig::default(),
            usage: UsageConfig::default(),
            timer: TimerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(JourneyError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.notifications.check_interval_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "notifications.check_interval_minutes must be greater than 0"
                    .to_string(),
            });
        } else if self.notifications.check_interval_minutes > 24 * 60 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "notifications.check_interval_minutes={} (over a day) can skip daily reminders",
                    self.notifications.check_interval_minutes
                ),
            });
        }

        if parse_time(&self.notifications.default_time).is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "notifications.default_time '{}' is not HH:MM",
                    self.notifications.default_time
                ),
            });
        }

        if self.usage.window < self.usage.min_samples {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "usage.window ({}) is smaller than usage.min_samples ({}); no hour will ever be suggested",
                    self.usage.window, self.usage.min_samples
                ),
            });
        }

        if self.timer.focus_minutes == 0 || self.timer.break_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "timer durations of 0 fall back to 25/5 minutes".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
