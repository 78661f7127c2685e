//! Day-level operations over a store and a clock.
//!
//! Every operation reads what it needs, applies one transition to an
//! in-memory record and writes it back whole. A failed transition writes
//! nothing.

use crate::achievement::{self, AchievementEvaluation};
use crate::clock::Clock;
use crate::collaborator::CollaboratorPayload;
use crate::config::Config;
use crate::day::{DayRecord, ToggleOutcome};
use crate::error::{JourneyError, Result};
use crate::reminder::NotificationPreferences;
use crate::store::RecordStore;
use crate::types::{DayNumber, TOTAL_DAYS};
use crate::unlock::Progress;
use crate::usage::UsagePattern;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Celebration {
    pub title: &'static str,
    pub description: &'static str,
}

/// Message shown after a day is completed, keyed by how many days are done.
pub fn celebration(completed: usize) -> Celebration {
    let (title, description) = match completed {
        n if n == usize::from(TOTAL_DAYS) => (
            "🏆 Jornada Completa! 🏆",
            "Você completou todos os 7 dias! Mestre do Foco desbloqueado!",
        ),
        5 => ("⭐ 5 Dias Completos! ⭐", "Você está quase lá! Continue assim!"),
        3 => (
            "⚡ Momentum Conquistado! ⚡",
            "3 dias seguidos! Você ganhou o emblema 'Ganhando Momentum'!",
        ),
        1 => (
            "🌟 Primeiro Passo! 🌟",
            "Parabéns! Você conquistou o emblema 'Primeiro Passo'!",
        ),
        _ => ("✅ Dia concluído! 🎉", "Parabéns pela sua dedicação!"),
    };
    Celebration { title, description }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub day: DayNumber,
    /// False when the day had already been completed earlier.
    pub newly_completed: bool,
    pub completed_count: usize,
    pub celebration: Option<Celebration>,
    pub achievements: AchievementEvaluation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "next", content = "day", rename_all = "snake_case")]
pub enum NextStep {
    Day(DayNumber),
    Reflection,
}

// ---------------------------------------------------------------------------
// Journey
// ---------------------------------------------------------------------------

pub struct Journey<S, C> {
    store: S,
    clock: C,
    config: Config,
}

impl<S: RecordStore, C: Clock> Journey<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, Config::default())
    }

    pub fn with_config(store: S, clock: C, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress(&self) -> Result<Progress> {
        Progress::load(&self.store)
    }

    /// The record for an accessible day, as stored or freshly defaulted.
    fn accessible_record(&self, day: DayNumber) -> Result<DayRecord> {
        let progress = self.progress()?;
        if !progress.is_accessible(day) {
            return Err(JourneyError::DayLocked(day.get()));
        }
        Ok(progress
            .record(day)
            .cloned()
            .unwrap_or_else(|| DayRecord::new(day)))
    }

    fn write(&self, record: &mut DayRecord) -> Result<()> {
        record.save(&self.store, self.clock.now_utc())
    }

    /// Visit a day: locked days are refused, a first visit persists an
    /// empty record. Every visit counts as activity.
    pub fn open_day(&self, day: DayNumber) -> Result<DayRecord> {
        let exists = DayRecord::load(&self.store, day)?.is_some();
        let mut record = self.accessible_record(day)?;
        if !exists {
            self.write(&mut record)?;
            tracing::debug!(%day, "created day record");
        }
        self.record_activity()?;
        Ok(record)
    }

    pub fn toggle_item(&self, day: DayNumber, index: usize) -> Result<ToggleOutcome> {
        let mut record = self.accessible_record(day)?;
        let outcome = record.toggle_item(index)?;
        if outcome == ToggleOutcome::Toggled {
            self.write(&mut record)?;
            tracing::debug!(%day, index, "checklist item ticked");
        }
        Ok(outcome)
    }

    pub fn complete_collaborator(
        &self,
        day: DayNumber,
        payload: CollaboratorPayload,
    ) -> Result<usize> {
        let mut record = self.accessible_record(day)?;
        let kind = payload.kind();
        let index = record.complete_collaborator(payload)?;
        self.write(&mut record)?;
        tracing::debug!(%day, index, collaborator = %kind, "collaborator completed");
        Ok(index)
    }

    pub fn set_notes(&self, day: DayNumber, notes: &str) -> Result<()> {
        let mut record = self.accessible_record(day)?;
        record.set_notes(notes)?;
        self.write(&mut record)
    }

    pub fn mark_resource_pending(&self, day: DayNumber, name: &str) -> Result<()> {
        let mut record = self.accessible_record(day)?;
        record.mark_resource_pending(name)?;
        self.write(&mut record)
    }

    /// Finish a day, then re-evaluate achievements. Completing an already
    /// completed day succeeds without writing the record again.
    pub fn complete_day(&self, day: DayNumber) -> Result<CompletionOutcome> {
        let mut record = self.accessible_record(day)?;
        let newly_completed = record.complete()?;
        if newly_completed {
            self.write(&mut record)?;
            tracing::info!(%day, "day completed");
        }

        let completed_count = self.progress()?.completed_count();
        let achievements = achievement::evaluate_and_record(&self.store, completed_count)?;
        Ok(CompletionOutcome {
            day,
            newly_completed,
            completed_count,
            celebration: newly_completed.then(|| celebration(completed_count)),
            achievements,
        })
    }

    pub fn advance(&self, day: DayNumber) -> Result<NextStep> {
        let record = DayRecord::load(&self.store, day)?.ok_or_else(|| {
            JourneyError::MissingPriorState("complete the tasks before advancing".to_string())
        })?;
        if !record.completed {
            return Err(JourneyError::MissingPriorState(
                "mark the day as complete before advancing".to_string(),
            ));
        }
        Ok(match day.next() {
            Some(next) => NextStep::Day(next),
            None => NextStep::Reflection,
        })
    }

    pub fn evaluate_achievements(&self) -> Result<AchievementEvaluation> {
        let completed = self.progress()?.completed_count();
        achievement::evaluate_and_record(&self.store, completed)
    }

    /// Record an interaction at the current local time.
    pub fn record_activity(&self) -> Result<UsagePattern> {
        let mut pattern = UsagePattern::load(&self.store)?;
        pattern.record_activity_with(self.clock.now(), &self.config.usage);
        pattern.save(&self.store)?;
        Ok(pattern)
    }

    pub fn notification_preferences(&self) -> Result<NotificationPreferences> {
        NotificationPreferences::load(&self.store, self.config.notifications.reminder_time())
    }

    /// Reminder time suggested by usage, or the configured default.
    pub fn suggested_time(&self) -> Result<String> {
        let pattern = UsagePattern::load(&self.store)?;
        Ok(pattern.suggested_time(self.config.notifications.reminder_time()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::collaborator::{CollaboratorKind, ProblemDefinition, TargetAudience};
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn journey() -> Journey<MemoryStore, ManualClock> {
        let clock = ManualClock::new("2025-03-01T08:00:00-03:00".parse().unwrap());
        Journey::new(MemoryStore::new(), clock)
    }

    fn d(n: u8) -> DayNumber {
        DayNumber::new(n).unwrap()
    }

    fn finish_day_one(j: &Journey<MemoryStore, ManualClock>) -> CompletionOutcome {
        j.complete_collaborator(
            d(1),
            CollaboratorPayload::FocusHour {
                plan: "08h às 09h".into(),
            },
        )
        .unwrap();
        j.complete_collaborator(
            d(1),
            CollaboratorPayload::ProblemDefinition(ProblemDefinition {
                problem: "procrastinação".into(),
                why: "prazos".into(),
                change: "entregar".into(),
            }),
        )
        .unwrap();
        j.complete_collaborator(
            d(1),
            CollaboratorPayload::TargetAudience(TargetAudience {
                audience: "estudantes".into(),
                impact: "foco".into(),
            }),
        )
        .unwrap();
        j.set_notes(d(1), "começando").unwrap();
        j.complete_day(d(1)).unwrap()
    }

    #[test]
    fn day_one_is_open_and_day_two_locked() {
        let j = journey();
        let r = j.open_day(d(1)).unwrap();
        assert!(!r.completed);
        assert!(j.store().get_raw("day-1").unwrap().is_some());
        assert!(matches!(j.open_day(d(2)), Err(JourneyError::DayLocked(2))));
        assert!(j.store().get_raw("day-2").unwrap().is_none());
    }

    #[test]
    fn dialog_item_waits_for_collaborator() {
        let j = journey();
        let outcome = j.toggle_item(d(1), 0).unwrap();
        assert_eq!(
            outcome,
            ToggleOutcome::AwaitingCollaborator(CollaboratorKind::FocusHour)
        );
        assert!(j.store().get_raw("day-1").unwrap().is_none());
    }

    #[test]
    fn completion_needs_checklist_and_notes() {
        let j = journey();
        j.set_notes(d(1), "rascunho").unwrap();
        let err = j.complete_day(d(1)).unwrap_err();
        assert!(matches!(err, JourneyError::Validation(_)));
        let stored = DayRecord::load(j.store(), d(1)).unwrap().unwrap();
        assert!(!stored.completed);
    }

    #[test]
    fn completing_day_one_unlocks_day_two_and_first_badge() {
        let j = journey();
        let outcome = finish_day_one(&j);
        assert!(outcome.newly_completed);
        assert_eq!(outcome.completed_count, 1);
        assert_eq!(outcome.celebration.unwrap().title, "🌟 Primeiro Passo! 🌟");
        assert_eq!(outcome.achievements.newly_unlocked.unwrap().id, "primeiro-passo");
        assert!(j.open_day(d(2)).is_ok());
        assert_eq!(j.advance(d(1)).unwrap(), NextStep::Day(d(2)));
    }

    #[test]
    fn completing_twice_is_idempotent() {
        let j = journey();
        finish_day_one(&j);
        let before = j.store().get_raw("day-1").unwrap();
        j.clock().advance(Duration::hours(1));
        let again = j.complete_day(d(1)).unwrap();
        assert!(!again.newly_completed);
        assert!(again.celebration.is_none());
        assert!(again.achievements.newly_unlocked.is_none());
        assert_eq!(j.store().get_raw("day-1").unwrap(), before);
    }

    #[test]
    fn completed_day_rejects_edits() {
        let j = journey();
        finish_day_one(&j);
        assert!(matches!(
            j.set_notes(d(1), "mudança"),
            Err(JourneyError::DayCompleted(1))
        ));
        assert!(matches!(
            j.toggle_item(d(1), 0),
            Err(JourneyError::DayCompleted(1))
        ));
    }

    #[test]
    fn advance_reports_missing_state() {
        let j = journey();
        let err = j.advance(d(1)).unwrap_err();
        assert!(err.to_string().contains("complete the tasks"));
        j.set_notes(d(1), "x").unwrap();
        let err = j.advance(d(1)).unwrap_err();
        assert!(err.to_string().contains("mark the day as complete"));
    }

    #[test]
    fn last_day_advances_to_reflection() {
        let j = journey();
        for n in 1..=7 {
            let mut r = DayRecord::new(d(n));
            r.completed = true;
            r.save(j.store(), j.clock().now_utc()).unwrap();
        }
        assert_eq!(j.advance(d(7)).unwrap(), NextStep::Reflection);
    }

    #[test]
    fn celebration_messages_by_count() {
        assert!(celebration(7).title.contains("Jornada Completa"));
        assert!(celebration(5).title.contains("5 Dias"));
        assert!(celebration(3).title.contains("Momentum"));
        assert!(celebration(1).title.contains("Primeiro Passo"));
        assert!(celebration(2).title.contains("Dia concluído"));
        assert!(celebration(6).title.contains("Dia concluído"));
    }

    #[test]
    fn record_activity_uses_local_hour() {
        let j = journey();
        for _ in 0..3 {
            j.record_activity().unwrap();
            j.clock().advance(Duration::days(1));
        }
        let pattern = UsagePattern::load(j.store()).unwrap();
        assert_eq!(pattern.common_hour, Some(8));
        assert_eq!(j.suggested_time().unwrap(), "08:00");
    }

    #[test]
    fn opening_days_feeds_usage_pattern() {
        let j = journey();
        for _ in 0..3 {
            j.open_day(d(1)).unwrap();
            j.clock().advance(Duration::days(1));
        }
        let pattern = UsagePattern::load(j.store()).unwrap();
        assert_eq!(pattern.timestamps.len(), 3);
        assert_eq!(pattern.common_hour, Some(8));
    }

    #[test]
    fn locked_day_is_not_counted_as_activity() {
        let j = journey();
        assert!(j.open_day(d(2)).is_err());
        assert!(UsagePattern::load(j.store()).unwrap().timestamps.is_empty());
    }

    #[test]
    fn configured_default_time_is_used() {
        let mut config = Config::default();
        config.notifications.default_time = "07:30".to_string();
        let clock = ManualClock::new("2025-03-01T08:00:00-03:00".parse().unwrap());
        let j = Journey::with_config(MemoryStore::new(), clock, config);
        assert_eq!(j.suggested_time().unwrap(), "07:30");
        assert_eq!(j.notification_preferences().unwrap().preferred_time, "07:30");
    }
}
