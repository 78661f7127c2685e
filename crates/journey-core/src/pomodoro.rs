use crate::config::TimerConfig;
use crate::error::{JourneyError, Result};
use crate::paths;
use crate::store::RecordStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub focus: u32,
    #[serde(rename = "break")]
    pub break_: u32,
}

pub static PRESETS: [Preset; 3] = [
    Preset {
        label: "15 min",
        focus: 15,
        break_: 3,
    },
    Preset {
        label: "20 min",
        focus: 20,
        break_: 5,
    },
    Preset {
        label: "25 min",
        focus: 25,
        break_: 5,
    },
];

pub const BREAK_OPTIONS: [u32; 3] = [3, 5, 10];

pub fn find_preset(label: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.label == label)
}

// ---------------------------------------------------------------------------
// PomodoroSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    #[serde(default)]
    pub focus_duration: u32,
    #[serde(default)]
    pub break_duration: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_duration: DEFAULT_FOCUS_MINUTES,
            break_duration: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl From<&TimerConfig> for PomodoroSettings {
    fn from(cfg: &TimerConfig) -> Self {
        Self {
            focus_duration: cfg.focus_minutes,
            break_duration: cfg.break_minutes,
        }
        .normalized()
    }
}

impl PomodoroSettings {
    /// Stored settings, or `fallback` when none were saved yet. Zero
    /// durations fall back to 25/5.
    pub fn load<S: RecordStore>(store: &S, fallback: PomodoroSettings) -> Result<Self> {
        let settings: Option<PomodoroSettings> = store.get(paths::POMODORO_SETTINGS_KEY)?;
        Ok(settings.unwrap_or(fallback).normalized())
    }

    pub fn save<S: RecordStore>(&self, store: &S) -> Result<()> {
        store.put(paths::POMODORO_SETTINGS_KEY, self)
    }

    pub fn normalized(self) -> Self {
        Self {
            focus_duration: nonzero_or(self.focus_duration, DEFAULT_FOCUS_MINUTES),
            break_duration: nonzero_or(self.break_duration, DEFAULT_BREAK_MINUTES),
        }
    }

    pub fn set(&mut self, focus: Option<u32>, break_: Option<u32>) -> Result<()> {
        if focus == Some(0) || break_ == Some(0) {
            return Err(JourneyError::Validation(
                "durations must be at least 1 minute".to_string(),
            ));
        }
        if let Some(f) = focus {
            self.focus_duration = f;
        }
        if let Some(b) = break_ {
            self.break_duration = b;
        }
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        self.focus_duration = preset.focus;
        self.break_duration = preset.break_;
    }
}

fn nonzero_or(v: u32, default: u32) -> u32 {
    if v == 0 {
        default
    } else {
        v
    }
}

/// Nudge toward longer sessions as the journey progresses.
pub fn suggestion(completed: usize, focus_minutes: u32) -> Option<&'static str> {
    if completed == 0 {
        Some("Está começando? Tente 15 minutos para criar o hábito.")
    } else if completed >= 3 && focus_minutes < 25 {
        Some("Já concluiu 3 dias! Que tal aumentar para 25 minutos?")
    } else if completed >= 5 && focus_minutes < 45 {
        Some("Ótimo progresso! Considere sessões de 45 minutos.")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// FocusSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    Break,
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
            Phase::Done => "done",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseChange {
    /// Focus time ran out and the break began.
    BreakStarted,
    /// The break ran out; the session is over.
    Completed,
}

/// One focus block followed by one break, timed against instants handed
/// in by the caller.
#[derive(Debug, Clone)]
pub struct FocusSession {
    settings: PomodoroSettings,
    phase: Phase,
    phase_started: DateTime<Utc>,
}

impl FocusSession {
    pub fn start(settings: PomodoroSettings, now: DateTime<Utc>) -> Self {
        Self {
            settings: settings.normalized(),
            phase: Phase::Focus,
            phase_started: now,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn phase_length(&self) -> Duration {
        let minutes = match self.phase {
            Phase::Focus => self.settings.focus_duration,
            Phase::Break => self.settings.break_duration,
            Phase::Done => 0,
        };
        Duration::minutes(i64::from(minutes))
    }

    fn phase_end(&self) -> DateTime<Utc> {
        self.phase_started + self.phase_length()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.phase_end() - now).max(Duration::zero())
    }

    /// Share of the current phase already elapsed, 0 to 100.
    pub fn percent(&self, now: DateTime<Utc>) -> u8 {
        let total = self.phase_length().num_seconds();
        if total == 0 {
            return 100;
        }
        let elapsed = total - self.remaining(now).num_seconds();
        (elapsed * 100 / total).clamp(0, 100) as u8
    }

    /// Advance past a phase whose time ran out. At most one change per
    /// call; the next phase starts when the previous one was due to end.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<PhaseChange> {
        if self.phase == Phase::Done || now < self.phase_end() {
            return None;
        }
        let ended = self.phase_end();
        let change = match self.phase {
            Phase::Focus => {
                self.phase = Phase::Break;
                PhaseChange::BreakStarted
            }
            _ => {
                self.phase = Phase::Done;
                PhaseChange::Completed
            }
        };
        self.phase_started = ended;
        tracing::debug!(phase = %self.phase, "timer phase changed");
        Some(change)
    }

    /// Back to the start of the focus phase.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.phase = Phase::Focus;
        self.phase_started = now;
    }
}

/// `MM:SS`, rounding partial seconds up so the display reaches 00:00 only
/// when time is out.
pub fn format_remaining(d: Duration) -> String {
    let millis = d.num_milliseconds().max(0);
    let secs = (millis + 999) / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::store::MemoryStore;

    #[test]
    fn missing_settings_use_fallback() {
        let store = MemoryStore::new();
        let s = PomodoroSettings::load(&store, PomodoroSettings::default()).unwrap();
        assert_eq!(s.focus_duration, 25);
        assert_eq!(s.break_duration, 5);
    }

    #[test]
    fn zero_values_fall_back_on_load() {
        let store = MemoryStore::new();
        store
            .put_raw(paths::POMODORO_SETTINGS_KEY, r#"{"focusDuration":0,"breakDuration":10}"#)
            .unwrap();
        let s = PomodoroSettings::load(&store, PomodoroSettings::default()).unwrap();
        assert_eq!((s.focus_duration, s.break_duration), (25, 10));
    }

    #[test]
    fn presets_and_custom_values_persist() {
        let store = MemoryStore::new();
        let mut s = PomodoroSettings::default();
        s.apply_preset(find_preset("15 min").unwrap());
        s.save(&store).unwrap();
        let loaded = PomodoroSettings::load(&store, PomodoroSettings::default()).unwrap();
        assert_eq!((loaded.focus_duration, loaded.break_duration), (15, 3));

        let mut s = loaded;
        assert!(s.set(Some(0), None).is_err());
        s.set(Some(40), Some(10)).unwrap();
        assert_eq!((s.focus_duration, s.break_duration), (40, 10));
    }

    #[test]
    fn suggestions_by_progress() {
        assert!(suggestion(0, 25).unwrap().contains("15 minutos"));
        assert_eq!(suggestion(1, 15), None);
        assert!(suggestion(3, 20).unwrap().contains("25 minutos"));
        assert_eq!(suggestion(3, 25), None);
        assert!(suggestion(5, 25).unwrap().contains("45 minutos"));
        assert_eq!(suggestion(7, 45), None);
    }

    fn session(clock: &ManualClock) -> FocusSession {
        let settings = PomodoroSettings {
            focus_duration: 15,
            break_duration: 3,
        };
        FocusSession::start(settings, clock.now_utc())
    }

    fn clock() -> ManualClock {
        ManualClock::new("2025-03-01T08:00:00-03:00".parse().unwrap())
    }

    #[test]
    fn focus_then_break_then_done() {
        let c = clock();
        let mut s = session(&c);
        assert_eq!(s.phase(), Phase::Focus);
        assert_eq!(s.remaining(c.now_utc()), Duration::minutes(15));

        c.advance(Duration::minutes(14));
        assert_eq!(s.tick(c.now_utc()), None);
        assert_eq!(format_remaining(s.remaining(c.now_utc())), "01:00");

        c.advance(Duration::minutes(1));
        assert_eq!(s.tick(c.now_utc()), Some(PhaseChange::BreakStarted));
        assert_eq!(s.phase(), Phase::Break);
        assert_eq!(s.remaining(c.now_utc()), Duration::minutes(3));

        c.advance(Duration::minutes(3));
        assert_eq!(s.tick(c.now_utc()), Some(PhaseChange::Completed));
        assert!(s.is_done());
        assert_eq!(s.tick(c.now_utc() + Duration::hours(1)), None);
    }

    #[test]
    fn late_tick_does_not_stretch_the_break() {
        let c = clock();
        let mut s = session(&c);
        c.advance(Duration::minutes(16));
        assert_eq!(s.tick(c.now_utc()), Some(PhaseChange::BreakStarted));
        // Break started when focus ended, a minute ago.
        assert_eq!(s.remaining(c.now_utc()), Duration::minutes(2));
        assert_eq!(s.percent(c.now_utc()), 33);
    }

    #[test]
    fn one_change_per_tick() {
        let c = clock();
        let mut s = session(&c);
        c.advance(Duration::hours(1));
        assert_eq!(s.tick(c.now_utc()), Some(PhaseChange::BreakStarted));
        assert_eq!(s.tick(c.now_utc()), Some(PhaseChange::Completed));
    }

    #[test]
    fn reset_restarts_focus() {
        let c = clock();
        let mut s = session(&c);
        c.advance(Duration::minutes(20));
        s.tick(c.now_utc());
        s.reset(c.now_utc());
        assert_eq!(s.phase(), Phase::Focus);
        assert_eq!(s.percent(c.now_utc()), 0);
    }

    #[test]
    fn zero_settings_fall_back() {
        let c = clock();
        let s = FocusSession::start(
            PomodoroSettings {
                focus_duration: 0,
                break_duration: 0,
            },
            c.now_utc(),
        );
        assert_eq!(s.phase_length(), Duration::minutes(25));
    }

    #[test]
    fn remaining_rounds_up() {
        assert_eq!(format_remaining(Duration::milliseconds(59_001)), "01:00");
        assert_eq!(format_remaining(Duration::seconds(125)), "02:05");
        assert_eq!(format_remaining(Duration::zero()), "00:00");
    }
}
