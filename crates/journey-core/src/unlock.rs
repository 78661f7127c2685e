use crate::day::DayRecord;
use crate::error::Result;
use crate::store::RecordStore;
use crate::types::{DayNumber, DayStatus, TOTAL_DAYS};
use serde::Serialize;

/// Read-only snapshot of all seven day records, used for every cross-day
/// derivation. Rebuilt on each read; there is no cache to invalidate.
#[derive(Debug, Clone)]
pub struct Progress {
    records: Vec<Option<DayRecord>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
    pub day: u8,
    pub theme: &'static str,
    pub status: DayStatus,
    pub accessible: bool,
    pub checked: usize,
    pub total: usize,
}

impl Progress {
    pub fn load<S: RecordStore>(store: &S) -> Result<Self> {
        Ok(Self {
            records: DayRecord::load_all(store)?,
        })
    }

    pub fn from_records(records: impl IntoIterator<Item = DayRecord>) -> Self {
        let mut slots: Vec<Option<DayRecord>> = vec![None; usize::from(TOTAL_DAYS)];
        for r in records {
            let i = r.day.index();
            slots[i] = Some(r);
        }
        Self { records: slots }
    }

    pub fn record(&self, day: DayNumber) -> Option<&DayRecord> {
        self.records[day.index()].as_ref()
    }

    pub fn is_completed(&self, day: DayNumber) -> bool {
        self.record(day).map(|r| r.completed).unwrap_or(false)
    }

    /// Day 1 is always open; any other day opens once the day before it is
    /// completed.
    pub fn is_accessible(&self, day: DayNumber) -> bool {
        match day.previous() {
            None => true,
            Some(prev) => self.is_completed(prev),
        }
    }

    pub fn status(&self, day: DayNumber) -> DayStatus {
        self.record(day)
            .map(DayRecord::status)
            .unwrap_or(DayStatus::NotStarted)
    }

    pub fn completed_days(&self) -> Vec<DayNumber> {
        DayNumber::all().filter(|d| self.is_completed(*d)).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_days().len()
    }

    pub fn last_completed(&self) -> Option<DayNumber> {
        self.completed_days().into_iter().max()
    }

    pub fn percent_complete(&self) -> u8 {
        let pct = self.completed_count() * 100 / usize::from(TOTAL_DAYS);
        u8::try_from(pct).unwrap_or(100)
    }

    pub fn overview(&self) -> Vec<DayOverview> {
        DayNumber::all()
            .map(|d| {
                let (checked, total) = self
                    .record(d)
                    .map(|r| (r.checked_count(), r.checklist.len()))
                    .unwrap_or((0, crate::content::checklist_len(d)));
                DayOverview {
                    day: d.get(),
                    theme: crate::content::day_content(d).theme,
                    status: self.status(d),
                    accessible: self.is_accessible(d),
                    checked,
                    total,
                }
            })
            .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.iter().flatten()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(n: u8) -> DayRecord {
        let mut r = DayRecord::new(DayNumber::new(n).unwrap());
        r.completed = true;
        r
    }

    #[test]
    fn day_one_always_accessible() {
        let p = Progress::from_records([]);
        assert!(p.is_accessible(DayNumber::FIRST));
        for d in DayNumber::all().skip(1) {
            assert!(!p.is_accessible(d));
        }
    }

    #[test]
    fn accessible_iff_previous_completed() {
        // Gaps are allowed in stored state: 1, 2 and 5 completed.
        let p = Progress::from_records([completed(1), completed(2), completed(5)]);
        for d in DayNumber::all().skip(1) {
            let prev = d.previous().unwrap();
            assert_eq!(p.is_accessible(d), p.is_completed(prev), "day {d}");
        }
        assert!(p.is_accessible(DayNumber::new(6).unwrap()));
        assert!(!p.is_accessible(DayNumber::new(4).unwrap()));
    }

    #[test]
    fn in_progress_record_does_not_unlock() {
        let mut r = DayRecord::new(DayNumber::FIRST);
        r.checklist = vec![true, true, true];
        r.notes = "x".into();
        let p = Progress::from_records([r]);
        assert!(!p.is_accessible(DayNumber::new(2).unwrap()));
        assert_eq!(p.status(DayNumber::FIRST), DayStatus::InProgress);
    }

    #[test]
    fn counts_and_last_day() {
        let p = Progress::from_records([completed(1), completed(3)]);
        assert_eq!(p.completed_count(), 2);
        assert_eq!(p.last_completed().map(DayNumber::get), Some(3));
        assert_eq!(p.percent_complete(), 28);
        let all = Progress::from_records((1..=7).map(completed));
        assert_eq!(all.percent_complete(), 100);
    }

    #[test]
    fn overview_lists_every_day() {
        let p = Progress::from_records([completed(1)]);
        let o = p.overview();
        assert_eq!(o.len(), 7);
        assert_eq!(o[0].status, DayStatus::Completed);
        assert!(o[1].accessible);
        assert!(!o[2].accessible);
        assert_eq!(o[6].total, 2);
    }
}
