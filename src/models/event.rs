//! Approval events: the append-only audit trail of workflow actions.
//! The sheet's denormalized status must always be reproducible by replaying
//! its event log in order.

use super::sheet::SheetStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ApprovalAction {
    Submit,
    Approve,
    Reject,
    /// Kept in the audit vocabulary for imported rows; the machine itself
    /// records a plain Submit when a rejected sheet comes back.
    Resubmit,
}

impl ApprovalAction {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ApprovalAction::Submit => "submit",
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Resubmit => "resubmit",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "submit" => Some(ApprovalAction::Submit),
            "approve" => Some(ApprovalAction::Approve),
            "reject" => Some(ApprovalAction::Reject),
            "resubmit" => Some(ApprovalAction::Resubmit),
            _ => None,
        }
    }

    /// Status a sheet lands in after this action.
    pub fn resulting_status(&self) -> SheetStatus {
        match self {
            ApprovalAction::Submit | ApprovalAction::Resubmit => SheetStatus::Submitted,
            ApprovalAction::Approve => SheetStatus::Approved,
            ApprovalAction::Reject => SheetStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalEvent {
    pub id: i64,
    pub sheet_id: i64,
    pub actor_id: i64,
    pub action: ApprovalAction,
    pub comment: String,    // '' when the action carried none
    pub created_at: String, // TEXT, RFC 3339
}

/// Project the current status out of an ordered event log. An empty log means
/// the sheet has never left draft.
pub fn replay_status(events: &[ApprovalEvent]) -> SheetStatus {
    events
        .last()
        .map(|ev| ev.action.resulting_status())
        .unwrap_or(SheetStatus::Draft)
}
