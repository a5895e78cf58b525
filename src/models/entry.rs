use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum HourType {
    Billable,
    NonBillable,
}

impl HourType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HourType::Billable => "billable",
            HourType::NonBillable => "non_billable",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "billable" => Some(HourType::Billable),
            "non_billable" => Some(HourType::NonBillable),
            _ => None,
        }
    }

    pub fn is_billable(&self) -> bool {
        matches!(self, HourType::Billable)
    }
}

/// Insert shape for a new entry; the store assigns id/sheet linkage.
/// Billable drafts carry mission + task, non-billable ones an internal
/// activity. Anything else is rejected by the validator, never coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub entry_date: NaiveDate,
    pub hours: f64,
    pub hour_type: HourType,
    pub mission_id: Option<i64>,
    pub task_id: Option<i64>,
    pub internal_activity_id: Option<i64>,
}

impl EntryDraft {
    pub fn billable(date: NaiveDate, hours: f64, mission_id: i64, task_id: i64) -> Self {
        Self {
            entry_date: date,
            hours,
            hour_type: HourType::Billable,
            mission_id: Some(mission_id),
            task_id: Some(task_id),
            internal_activity_id: None,
        }
    }

    pub fn non_billable(date: NaiveDate, hours: f64, internal_activity_id: i64) -> Self {
        Self {
            entry_date: date,
            hours,
            hour_type: HourType::NonBillable,
            mission_id: None,
            task_id: None,
            internal_activity_id: Some(internal_activity_id),
        }
    }

    /// Uniqueness key: (date, type, mission, task, activity). Hours are not
    /// part of the key.
    pub fn dedup_key(&self) -> (NaiveDate, HourType, Option<i64>, Option<i64>, Option<i64>) {
        (
            self.entry_date,
            self.hour_type,
            self.mission_id,
            self.task_id,
            self.internal_activity_id,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeEntry {
    pub id: i64,
    pub sheet_id: i64,
    pub entry_date: NaiveDate, // ⇔ time_entries.entry_date (TEXT "YYYY-MM-DD")
    pub hours: f64,            // ⇔ time_entries.hours (REAL, > 0, <= 24)
    pub hour_type: HourType,
    pub mission_id: Option<i64>,
    pub task_id: Option<i64>,
    pub internal_activity_id: Option<i64>,
    pub created_at: String, // TEXT, RFC 3339
}

impl TimeEntry {
    pub fn dedup_key(&self) -> (NaiveDate, HourType, Option<i64>, Option<i64>, Option<i64>) {
        (
            self.entry_date,
            self.hour_type,
            self.mission_id,
            self.task_id,
            self.internal_activity_id,
        )
    }
}
