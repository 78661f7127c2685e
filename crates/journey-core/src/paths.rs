use crate::error::{JourneyError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const JOURNEY_DIR: &str = ".journey";
pub const STORE_DIR: &str = ".journey/store";
pub const CONFIG_FILE: &str = ".journey/config.yaml";

pub const RECORD_EXT: &str = "json";

// ---------------------------------------------------------------------------
// Store keys
// ---------------------------------------------------------------------------

pub const NOTIFICATION_PREFERENCES_KEY: &str = "notification-preferences";
pub const NOTIFICATION_PERMISSION_KEY: &str = "notification-permission";
pub const USAGE_PATTERN_KEY: &str = "usage-pattern";
pub const UNLOCKED_ACHIEVEMENTS_KEY: &str = "unlocked-achievements";
pub const POMODORO_SETTINGS_KEY: &str = "pomodoro-settings";
pub const FINAL_REFLECTION_KEY: &str = "final-reflection";

pub fn day_key(day: u8) -> String {
    format!("day-{day}")
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn store_dir(root: &Path) -> PathBuf {
    root.join(STORE_DIR)
}

pub fn record_path(root: &Path, key: &str) -> PathBuf {
    store_dir(root).join(format!("{key}.{RECORD_EXT}"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Fallback root when nothing was passed and no `.journey/` was found upward.
pub fn home_root() -> Result<PathBuf> {
    home::home_dir().ok_or(JourneyError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Key validation
// ---------------------------------------------------------------------------

static KEY_RE: OnceLock<Regex> = OnceLock::new();

fn key_re() -> &'static Regex {
    KEY_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*$").unwrap_or_else(|e| panic!("bad key regex: {e}"))
    })
}

pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > 64 || !key_re().is_match(key) {
        return Err(JourneyError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_keys() {
        for key in [
            "day-1",
            "day-7",
            NOTIFICATION_PREFERENCES_KEY,
            NOTIFICATION_PERMISSION_KEY,
            USAGE_PATTERN_KEY,
            UNLOCKED_ACHIEVEMENTS_KEY,
            POMODORO_SETTINGS_KEY,
            FINAL_REFLECTION_KEY,
        ] {
            validate_key(key).unwrap_or_else(|_| panic!("expected valid: {key}"));
        }
    }

    #[test]
    fn invalid_keys() {
        for key in ["", "-day", "Day-1", "day 1", "../etc", "day_1", "a/b"] {
            assert!(validate_key(key).is_err(), "expected invalid: {key}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/me");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/me/.journey/config.yaml")
        );
        assert_eq!(
            record_path(root, &day_key(3)),
            PathBuf::from("/tmp/me/.journey/store/day-3.json")
        );
    }
}
