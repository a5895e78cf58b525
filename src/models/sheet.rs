use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SheetStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl SheetStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SheetStatus::Draft => "draft",
            SheetStatus::Submitted => "submitted",
            SheetStatus::Approved => "approved",
            SheetStatus::Rejected => "rejected",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(SheetStatus::Draft),
            "submitted" => Some(SheetStatus::Submitted),
            "approved" => Some(SheetStatus::Approved),
            "rejected" => Some(SheetStatus::Rejected),
            _ => None,
        }
    }

    /// Entries may be mutated only while the sheet is in an editable status.
    pub fn is_editable(&self) -> bool {
        matches!(self, SheetStatus::Draft | SheetStatus::Rejected)
    }

    /// Approved is the only terminal status; a rejected sheet can be resubmitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SheetStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSheet {
    pub id: i64,
    pub collaborator_id: i64,
    pub week_start: NaiveDate, // ⇔ time_sheets.week_start (TEXT "YYYY-MM-DD", always a Monday)
    pub week_end: NaiveDate,   // ⇔ time_sheets.week_end (week_start + 6 days)
    pub status: SheetStatus,
    pub rejection_note: Option<String>, // required while status = rejected
    pub approver_id: Option<i64>,       // set on approve/reject
    pub decided_at: Option<String>,     // TEXT, RFC 3339
    pub created_at: String,             // TEXT, RFC 3339
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for s in [
            SheetStatus::Draft,
            SheetStatus::Submitted,
            SheetStatus::Approved,
            SheetStatus::Rejected,
        ] {
            assert_eq!(SheetStatus::from_db_str(s.to_db_str()), Some(s));
        }
        assert_eq!(SheetStatus::from_db_str("closed"), None);
    }

    #[test]
    fn editability_follows_status() {
        assert!(SheetStatus::Draft.is_editable());
        assert!(SheetStatus::Rejected.is_editable());
        assert!(!SheetStatus::Submitted.is_editable());
        assert!(!SheetStatus::Approved.is_editable());
        assert!(SheetStatus::Approved.is_terminal());
        assert!(!SheetStatus::Rejected.is_terminal());
    }
}
