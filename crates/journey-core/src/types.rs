use crate::error::JourneyError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TOTAL_DAYS: u8 = 7;

// ---------------------------------------------------------------------------
// DayNumber
// ---------------------------------------------------------------------------

/// A day of the journey, always within `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayNumber(u8);

impl DayNumber {
    pub const FIRST: DayNumber = DayNumber(1);
    pub const LAST: DayNumber = DayNumber(TOTAL_DAYS);

    pub fn new(day: u8) -> Result<Self, JourneyError> {
        if (1..=TOTAL_DAYS).contains(&day) {
            Ok(DayNumber(day))
        } else {
            Err(JourneyError::InvalidDay(day))
        }
    }

    pub fn all() -> impl Iterator<Item = DayNumber> {
        (1..=TOTAL_DAYS).map(DayNumber)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn previous(self) -> Option<DayNumber> {
        (self.0 > 1).then(|| DayNumber(self.0 - 1))
    }

    pub fn next(self) -> Option<DayNumber> {
        (self.0 < TOTAL_DAYS).then(|| DayNumber(self.0 + 1))
    }
}

impl TryFrom<u8> for DayNumber {
    type Error = JourneyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DayNumber::new(value)
    }
}

impl From<DayNumber> for u8 {
    fn from(day: DayNumber) -> u8 {
        day.0
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DayNumber {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s.trim().parse().map_err(|_| JourneyError::InvalidDay(0))?;
        DayNumber::new(n)
    }
}

// ---------------------------------------------------------------------------
// DayStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::NotStarted => "not_started",
            DayStatus::InProgress => "in_progress",
            DayStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    Daily,
    EveryOtherDay,
    Weekly,
}

impl Frequency {
    pub fn all() -> &'static [Frequency] {
        &[Frequency::Daily, Frequency::EveryOtherDay, Frequency::Weekly]
    }

    /// Minimum hours between two reminders. Each threshold sits four hours
    /// under the calendar interval so an irregular check-in still fires.
    pub fn min_hours_between(self) -> i64 {
        match self {
            Frequency::Daily => 20,
            Frequency::EveryOtherDay => 44,
            Frequency::Weekly => 164,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::EveryOtherDay => "every-other-day",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "every-other-day" | "every_other_day" => Ok(Frequency::EveryOtherDay),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(JourneyError::InvalidFrequency(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
    Unsupported,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Default => "default",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Permission::Default),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            "unsupported" => Ok(Permission::Unsupported),
            _ => Err(JourneyError::PermissionDenied(format!(
                "unknown permission state '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_number_bounds() {
        assert!(DayNumber::new(0).is_err());
        assert!(DayNumber::new(8).is_err());
        assert_eq!(DayNumber::new(1).unwrap(), DayNumber::FIRST);
        assert_eq!(DayNumber::new(7).unwrap(), DayNumber::LAST);
        assert_eq!(DayNumber::all().count(), 7);
    }

    #[test]
    fn day_number_neighbours() {
        assert_eq!(DayNumber::FIRST.previous(), None);
        assert_eq!(DayNumber::LAST.next(), None);
        let three = DayNumber::new(3).unwrap();
        assert_eq!(three.previous().map(DayNumber::get), Some(2));
        assert_eq!(three.next().map(DayNumber::get), Some(4));
    }

    #[test]
    fn day_number_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<DayNumber>("9").is_err());
        let d: DayNumber = serde_json::from_str("4").unwrap();
        assert_eq!(d.get(), 4);
    }

    #[test]
    fn frequency_roundtrip() {
        for f in Frequency::all() {
            let parsed: Frequency = f.as_str().parse().unwrap();
            assert_eq!(parsed, *f);
        }
        assert_eq!(
            serde_json::to_string(&Frequency::EveryOtherDay).unwrap(),
            "\"every-other-day\""
        );
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn thresholds_are_shorter_than_calendar() {
        assert_eq!(Frequency::Daily.min_hours_between(), 20);
        assert_eq!(Frequency::EveryOtherDay.min_hours_between(), 44);
        assert_eq!(Frequency::Weekly.min_hours_between(), 164);
    }
}
