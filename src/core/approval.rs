//! The approval state machine: DRAFT → SUBMITTED → (APPROVED | REJECTED),
//! with rejected sheets returning to the editable cycle on resubmission.
//! Every transition runs in one IMMEDIATE transaction: lock the sheet row,
//! re-check its status, apply the guards, write the sheet and the event,
//! commit. A transition refused for its source state writes nothing.

use crate::config::WorkflowConfig;
use crate::core::access::{CapabilityGate, ReferenceDirectory};
use crate::core::router;
use crate::core::validator::EntryValidator;
use crate::db::events::{append_event, last_event};
use crate::db::store::{map_entry_row, map_sheet_row};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::models::event::ApprovalAction;
use crate::models::sheet::{SheetStatus, TimeSheet};
use crate::utils::date::now_rfc3339;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};

pub struct ApprovalWorkflow<'a> {
    refs: &'a dyn ReferenceDirectory,
    gate: &'a dyn CapabilityGate,
    config: WorkflowConfig,
}

impl<'a> ApprovalWorkflow<'a> {
    pub fn new(
        refs: &'a dyn ReferenceDirectory,
        gate: &'a dyn CapabilityGate,
        config: WorkflowConfig,
    ) -> Self {
        Self { refs, gate, config }
    }

    /// Owner submits an editable sheet with at least one entry. Entries are
    /// re-validated against the reference directory so a mission that closed
    /// after entry creation blocks the submission, not the approval.
    pub fn submit(
        &self,
        conn: &mut Connection,
        sheet_id: i64,
        actor_id: i64,
    ) -> WorkflowResult<TimeSheet> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sheet = load_sheet_tx(&tx, sheet_id)?;

        if !sheet.status.is_editable() {
            return Err(self.invalid_transition(&tx, &sheet, actor_id, ApprovalAction::Submit));
        }
        if actor_id != sheet.collaborator_id {
            return Err(WorkflowError::NotOwner(actor_id));
        }

        let entries = {
            let mut stmt = tx.prepare(
                "SELECT * FROM time_entries WHERE sheet_id = ?1 ORDER BY entry_date ASC, id ASC",
            )?;
            let rows = stmt.query_map([sheet_id], map_entry_row)?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            out
        };
        if entries.is_empty() {
            return Err(WorkflowError::EmptySheet);
        }

        let validator = EntryValidator::new(self.refs, self.config.daily_ceiling_hours);
        for entry in &entries {
            validator.revalidate(entry)?;
        }

        tx.execute(
            "UPDATE time_sheets
             SET status = 'submitted', rejection_note = NULL,
                 approver_id = NULL, decided_at = NULL
             WHERE id = ?1",
            [sheet_id],
        )?;
        append_event(&tx, sheet_id, actor_id, ApprovalAction::Submit, "")?;
        tx.commit()?;

        if router::supervisors_of(conn, sheet.collaborator_id)?.is_empty() {
            info!(
                "sheet {} submitted by {} with no assigned supervisor",
                sheet_id, actor_id
            );
        } else {
            info!("sheet {} submitted by {}", sheet_id, actor_id);
        }
        load_sheet_after_commit(conn, sheet_id)
    }

    /// Assigned supervisor with the approve capability closes the sheet.
    /// Terminal: entries stay locked for good.
    pub fn approve(
        &self,
        conn: &mut Connection,
        sheet_id: i64,
        actor_id: i64,
        comment: Option<&str>,
    ) -> WorkflowResult<TimeSheet> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sheet = load_sheet_tx(&tx, sheet_id)?;

        if sheet.status != SheetStatus::Submitted {
            return Err(self.invalid_transition(&tx, &sheet, actor_id, ApprovalAction::Approve));
        }
        self.check_reviewer(&tx, actor_id, sheet.collaborator_id)?;

        tx.execute(
            "UPDATE time_sheets
             SET status = 'approved', approver_id = ?1, decided_at = ?2
             WHERE id = ?3",
            params![actor_id, now_rfc3339(), sheet_id],
        )?;
        append_event(
            &tx,
            sheet_id,
            actor_id,
            ApprovalAction::Approve,
            comment.unwrap_or(""),
        )?;
        tx.commit()?;

        info!("sheet {} approved by {}", sheet_id, actor_id);
        load_sheet_after_commit(conn, sheet_id)
    }

    /// Same guards as approve, plus a mandatory note. The sheet returns to an
    /// editable state and can be resubmitted.
    pub fn reject(
        &self,
        conn: &mut Connection,
        sheet_id: i64,
        actor_id: i64,
        note: &str,
    ) -> WorkflowResult<TimeSheet> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sheet = load_sheet_tx(&tx, sheet_id)?;

        if sheet.status != SheetStatus::Submitted {
            return Err(self.invalid_transition(&tx, &sheet, actor_id, ApprovalAction::Reject));
        }
        self.check_reviewer(&tx, actor_id, sheet.collaborator_id)?;
        if note.trim().is_empty() {
            return Err(WorkflowError::MissingRejectionReason);
        }

        tx.execute(
            "UPDATE time_sheets
             SET status = 'rejected', rejection_note = ?1,
                 approver_id = ?2, decided_at = ?3
             WHERE id = ?4",
            params![note, actor_id, now_rfc3339(), sheet_id],
        )?;
        append_event(&tx, sheet_id, actor_id, ApprovalAction::Reject, note)?;
        tx.commit()?;

        info!("sheet {} rejected by {}", sheet_id, actor_id);
        load_sheet_after_commit(conn, sheet_id)
    }

    /// Routing edge first, then the capability. Both failures look the same
    /// to the caller: the actor is not an authorized reviewer of this sheet.
    fn check_reviewer(
        &self,
        tx: &Transaction,
        actor_id: i64,
        sheet_owner_id: i64,
    ) -> WorkflowResult<()> {
        if !router::can_route(tx, actor_id, sheet_owner_id)? {
            return Err(WorkflowError::NotAuthorizedSupervisor(actor_id));
        }
        if !self
            .gate
            .has_capability(actor_id, &self.config.approve_capability)
        {
            return Err(WorkflowError::NotAuthorizedSupervisor(actor_id));
        }
        Ok(())
    }

    /// Build the InvalidTransition error, looking back at the event log to
    /// tell a genuine misuse from a retry whose prior attempt already
    /// committed. Either way nothing is written twice.
    fn invalid_transition(
        &self,
        tx: &Transaction,
        sheet: &TimeSheet,
        actor_id: i64,
        action: ApprovalAction,
    ) -> WorkflowError {
        if let Ok(Some(last)) = last_event(tx, sheet.id) {
            if last.actor_id == actor_id && last.action.resulting_status() == sheet.status {
                debug!(
                    "sheet {}: {} by {} retries an already-committed action",
                    sheet.id,
                    action.to_db_str(),
                    actor_id
                );
            }
        }
        WorkflowError::InvalidTransition {
            from: sheet.status.to_db_str().into(),
            action: action.to_db_str().into(),
        }
    }
}

fn load_sheet_tx(tx: &Transaction, sheet_id: i64) -> WorkflowResult<TimeSheet> {
    tx.query_row(
        "SELECT * FROM time_sheets WHERE id = ?1",
        [sheet_id],
        map_sheet_row,
    )
    .optional()?
    .ok_or(WorkflowError::SheetNotFound(sheet_id))
}

fn load_sheet_after_commit(conn: &Connection, sheet_id: i64) -> WorkflowResult<TimeSheet> {
    crate::db::store::load_sheet(conn, sheet_id)
}
