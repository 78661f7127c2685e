use crate::collaborator::{self, CollaboratorKind, CollaboratorPayload, DayAnswers, ItemBinding};
use crate::content;
use crate::error::{JourneyError, Result};
use crate::paths;
use crate::store::RecordStore;
use crate::types::{DayNumber, DayStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ToggleOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "collaborator", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// Collaborator-free item, bit flipped.
    Toggled,
    /// Nothing flipped yet; the bit changes when the collaborator completes.
    AwaitingCollaborator(CollaboratorKind),
    /// Checked items are never unticked.
    AlreadyChecked,
}

// ---------------------------------------------------------------------------
// DayRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub day: DayNumber,
    pub checklist: Vec<bool>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub answers: DayAnswers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl DayRecord {
    pub fn new(day: DayNumber) -> Self {
        Self {
            day,
            checklist: vec![false; content::checklist_len(day)],
            notes: String::new(),
            completed: false,
            answers: DayAnswers::default(),
            timestamp: None,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load<S: RecordStore>(store: &S, day: DayNumber) -> Result<Option<Self>> {
        let key = paths::day_key(day.get());
        let Some(mut record) = store.get::<DayRecord>(&key)? else {
            return Ok(None);
        };
        if record.day != day {
            return Err(JourneyError::DayMismatch {
                key,
                found: record.day.get(),
            });
        }
        // Older records may carry a short or missing checklist.
        record.checklist.resize(content::checklist_len(day), false);
        Ok(Some(record))
    }

    pub fn load_all<S: RecordStore>(store: &S) -> Result<Vec<Option<Self>>> {
        DayNumber::all().map(|d| Self::load(store, d)).collect()
    }

    pub fn save<S: RecordStore>(&mut self, store: &S, now: DateTime<Utc>) -> Result<()> {
        self.timestamp = Some(now);
        store.put(&paths::day_key(self.day.get()), self)
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn status(&self) -> DayStatus {
        if self.completed {
            DayStatus::Completed
        } else if self.checklist.iter().any(|c| *c) || self.has_notes() {
            DayStatus::InProgress
        } else {
            DayStatus::NotStarted
        }
    }

    pub fn all_checked(&self) -> bool {
        self.checklist.iter().all(|c| *c)
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.checklist.iter().filter(|c| **c).count()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.completed {
            return Err(JourneyError::DayCompleted(self.day.get()));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------------

    pub fn toggle_item(&mut self, index: usize) -> Result<ToggleOutcome> {
        self.ensure_open()?;
        let binding = collaborator::binding(self.day, index).ok_or(
            JourneyError::InvalidChecklistIndex {
                day: self.day.get(),
                index,
            },
        )?;
        if self.checklist[index] {
            return Ok(ToggleOutcome::AlreadyChecked);
        }
        match binding {
            ItemBinding::Direct => {
                self.checklist[index] = true;
                Ok(ToggleOutcome::Toggled)
            }
            ItemBinding::Dialog(kind) => Ok(ToggleOutcome::AwaitingCollaborator(kind)),
            ItemBinding::Publish => Ok(ToggleOutcome::AwaitingCollaborator(
                CollaboratorKind::PublishLink,
            )),
        }
    }

    /// Store a collaborator's payload and tick the item it is bound to.
    /// Returns the checklist index that was ticked.
    pub fn complete_collaborator(&mut self, payload: CollaboratorPayload) -> Result<usize> {
        self.ensure_open()?;
        let kind = payload.kind();
        let index = collaborator::item_for(self.day, kind).ok_or_else(|| {
            JourneyError::CollaboratorMismatch {
                day: self.day.get(),
                kind: kind.to_string(),
            }
        })?;
        self.answers.apply(payload);
        self.checklist[index] = true;
        Ok(index)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.notes = notes.into();
        Ok(())
    }

    pub fn mark_resource_pending(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        self.answers.mark_resource_pending(name)
    }

    /// Mark the day as done. Returns `false` when it already was.
    pub fn complete(&mut self) -> Result<bool> {
        if self.completed {
            return Ok(false);
        }
        if !self.all_checked() {
            return Err(JourneyError::Validation(format!(
                "complete every checklist item before finishing day {} ({}/{} done)",
                self.day,
                self.checked_count(),
                self.checklist.len()
            )));
        }
        if !self.has_notes() {
            return Err(JourneyError::Validation(format!(
                "add your notes before finishing day {}",
                self.day
            )));
        }
        self.completed = true;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
