//! Entry validation. Pure checks, no writes; the store calls this before any
//! insert and the state machine calls it again at submission time, so an
//! entry whose mission closed after creation is caught before approval.

use crate::core::access::{LinkRef, ReferenceDirectory};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::models::entry::{EntryDraft, HourType, TimeEntry};
use crate::models::sheet::TimeSheet;

pub struct EntryValidator<'a> {
    refs: &'a dyn ReferenceDirectory,
    daily_ceiling_hours: f64,
}

impl<'a> EntryValidator<'a> {
    pub fn new(refs: &'a dyn ReferenceDirectory, daily_ceiling_hours: f64) -> Self {
        Self {
            refs,
            daily_ceiling_hours,
        }
    }

    /// Full rule set for a new entry, in order: date window, hours range and
    /// daily ceiling, linkage shape, reference liveness, duplicate key.
    /// First failure wins.
    pub fn validate(
        &self,
        draft: &EntryDraft,
        sheet: &TimeSheet,
        existing: &[TimeEntry],
    ) -> WorkflowResult<()> {
        if draft.entry_date < sheet.week_start || draft.entry_date > sheet.week_end {
            return Err(WorkflowError::OutOfRangeDate(draft.entry_date));
        }

        if !(draft.hours > 0.0 && draft.hours <= 24.0) {
            return Err(WorkflowError::InvalidHours(draft.hours));
        }
        let day_total: f64 = existing
            .iter()
            .filter(|e| e.entry_date == draft.entry_date)
            .map(|e| e.hours)
            .sum();
        if day_total + draft.hours > self.daily_ceiling_hours {
            return Err(WorkflowError::InvalidHours(day_total + draft.hours));
        }

        check_linkage(
            draft.hour_type,
            draft.mission_id,
            draft.task_id,
            draft.internal_activity_id,
        )?;
        self.check_references(draft.mission_id, draft.task_id, draft.internal_activity_id)?;

        if existing.iter().any(|e| e.dedup_key() == draft.dedup_key()) {
            return Err(WorkflowError::DuplicateEntry);
        }

        Ok(())
    }

    /// Submission-time re-check of a stored entry: linkage shape and
    /// reference liveness only. Range and uniqueness were enforced on insert
    /// and cannot degrade afterwards; references can.
    pub fn revalidate(&self, entry: &TimeEntry) -> WorkflowResult<()> {
        check_linkage(
            entry.hour_type,
            entry.mission_id,
            entry.task_id,
            entry.internal_activity_id,
        )?;
        self.check_references(entry.mission_id, entry.task_id, entry.internal_activity_id)
    }

    fn check_references(
        &self,
        mission_id: Option<i64>,
        task_id: Option<i64>,
        internal_activity_id: Option<i64>,
    ) -> WorkflowResult<()> {
        let links = [
            mission_id.map(LinkRef::Mission),
            task_id.map(LinkRef::Task),
            internal_activity_id.map(LinkRef::Activity),
        ];
        for link in links.into_iter().flatten() {
            if !self.refs.exists(link) {
                return Err(WorkflowError::DanglingReference(format!(
                    "{} does not exist",
                    link
                )));
            }
            if !self.refs.is_active(link) {
                return Err(WorkflowError::DanglingReference(format!(
                    "{} is not active",
                    link
                )));
            }
        }
        Ok(())
    }
}

/// Mutually exclusive linkage: billable hours carry mission + task and no
/// internal activity; non-billable hours the inverse. Never coerced.
fn check_linkage(
    hour_type: HourType,
    mission_id: Option<i64>,
    task_id: Option<i64>,
    internal_activity_id: Option<i64>,
) -> WorkflowResult<()> {
    match hour_type {
        HourType::Billable => {
            if mission_id.is_none() || task_id.is_none() {
                return Err(WorkflowError::InconsistentLinkage(
                    "billable entries require a mission and a task".into(),
                ));
            }
            if internal_activity_id.is_some() {
                return Err(WorkflowError::InconsistentLinkage(
                    "billable entries cannot reference an internal activity".into(),
                ));
            }
        }
        HourType::NonBillable => {
            if internal_activity_id.is_none() {
                return Err(WorkflowError::InconsistentLinkage(
                    "non-billable entries require an internal activity".into(),
                ));
            }
            if mission_id.is_some() || task_id.is_some() {
                return Err(WorkflowError::InconsistentLinkage(
                    "non-billable entries cannot reference a mission or task".into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct AllActive;
    impl ReferenceDirectory for AllActive {
        fn exists(&self, _: LinkRef) -> bool {
            true
        }
        fn is_active(&self, _: LinkRef) -> bool {
            true
        }
    }

    struct ClosedMission;
    impl ReferenceDirectory for ClosedMission {
        fn exists(&self, _: LinkRef) -> bool {
            true
        }
        fn is_active(&self, r: LinkRef) -> bool {
            !matches!(r, LinkRef::Mission(_))
        }
    }

    fn sheet() -> TimeSheet {
        let week_start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        TimeSheet {
            id: 1,
            collaborator_id: 7,
            week_start,
            week_end: crate::utils::date::week_end(week_start),
            status: crate::models::sheet::SheetStatus::Draft,
            rejection_note: None,
            approver_id: None,
            decided_at: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn date_outside_week_rejected() {
        let v = EntryValidator::new(&AllActive, 24.0);
        let draft = EntryDraft::billable(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), 8.0, 1, 2);
        assert!(matches!(
            v.validate(&draft, &sheet(), &[]),
            Err(WorkflowError::OutOfRangeDate(_))
        ));
    }

    #[test]
    fn hours_bounds() {
        let v = EntryValidator::new(&AllActive, 24.0);
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        for bad in [0.0, -1.0, 25.0] {
            let draft = EntryDraft::billable(day, bad, 1, 2);
            assert!(matches!(
                v.validate(&draft, &sheet(), &[]),
                Err(WorkflowError::InvalidHours(_))
            ));
        }

        let ok = EntryDraft::billable(day, 24.0, 1, 2);
        assert!(v.validate(&ok, &sheet(), &[]).is_ok());
    }

    #[test]
    fn daily_ceiling_counts_existing_entries() {
        let v = EntryValidator::new(&AllActive, 10.0);
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let existing = vec![TimeEntry {
            id: 1,
            sheet_id: 1,
            entry_date: day,
            hours: 6.0,
            hour_type: HourType::Billable,
            mission_id: Some(1),
            task_id: Some(2),
            internal_activity_id: None,
            created_at: String::new(),
        }];

        let over = EntryDraft::non_billable(day, 5.0, 9);
        assert!(matches!(
            v.validate(&over, &sheet(), &existing),
            Err(WorkflowError::InvalidHours(_))
        ));

        let fits = EntryDraft::non_billable(day, 4.0, 9);
        assert!(v.validate(&fits, &sheet(), &existing).is_ok());
    }

    #[test]
    fn linkage_must_match_hour_type() {
        let v = EntryValidator::new(&AllActive, 24.0);
        let day = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        // billable without a task
        let mut draft = EntryDraft::billable(day, 4.0, 1, 2);
        draft.task_id = None;
        assert!(matches!(
            v.validate(&draft, &sheet(), &[]),
            Err(WorkflowError::InconsistentLinkage(_))
        ));

        // billable with an activity attached
        let mut draft = EntryDraft::billable(day, 4.0, 1, 2);
        draft.internal_activity_id = Some(9);
        assert!(matches!(
            v.validate(&draft, &sheet(), &[]),
            Err(WorkflowError::InconsistentLinkage(_))
        ));

        // non-billable with a mission attached
        let mut draft = EntryDraft::non_billable(day, 4.0, 9);
        draft.mission_id = Some(1);
        assert!(matches!(
            v.validate(&draft, &sheet(), &[]),
            Err(WorkflowError::InconsistentLinkage(_))
        ));
    }

    #[test]
    fn inactive_reference_rejected() {
        let v = EntryValidator::new(&ClosedMission, 24.0);
        let day = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let draft = EntryDraft::billable(day, 4.0, 1, 2);
        assert!(matches!(
            v.validate(&draft, &sheet(), &[]),
            Err(WorkflowError::DanglingReference(_))
        ));
    }

    #[test]
    fn duplicate_key_rejected() {
        let v = EntryValidator::new(&AllActive, 24.0);
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let existing = vec![TimeEntry {
            id: 1,
            sheet_id: 1,
            entry_date: day,
            hours: 2.0,
            hour_type: HourType::Billable,
            mission_id: Some(1),
            task_id: Some(2),
            internal_activity_id: None,
            created_at: String::new(),
        }];
        let dup = EntryDraft::billable(day, 3.0, 1, 2);
        assert!(matches!(
            v.validate(&dup, &sheet(), &existing),
            Err(WorkflowError::DuplicateEntry)
        ));
    }
}
