//! Append-only approval-event log. Rows are inserted and read, never updated
//! or deleted; this module intentionally has no UPDATE/DELETE statements.

use crate::errors::WorkflowResult;
use crate::models::event::{ApprovalAction, ApprovalEvent};
use crate::utils::date::now_rfc3339;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_event_row(row: &Row) -> rusqlite::Result<ApprovalEvent> {
    let action_str: String = row.get("action")?;
    let action = ApprovalAction::from_db_str(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid approval action: {}", action_str).into(),
        )
    })?;

    Ok(ApprovalEvent {
        id: row.get("id")?,
        sheet_id: row.get("sheet_id")?,
        actor_id: row.get("actor_id")?,
        action,
        comment: row.get("comment")?,
        created_at: row.get("created_at")?,
    })
}

pub fn append_event(
    conn: &Connection,
    sheet_id: i64,
    actor_id: i64,
    action: ApprovalAction,
    comment: &str,
) -> WorkflowResult<()> {
    conn.execute(
        "INSERT INTO approval_events (sheet_id, actor_id, action, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            sheet_id,
            actor_id,
            action.to_db_str(),
            comment,
            now_rfc3339()
        ],
    )?;
    Ok(())
}

/// Full trail for one sheet in insertion order.
pub fn events_for_sheet(conn: &Connection, sheet_id: i64) -> WorkflowResult<Vec<ApprovalEvent>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM approval_events
         WHERE sheet_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([sheet_id], map_event_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn last_event(conn: &Connection, sheet_id: i64) -> WorkflowResult<Option<ApprovalEvent>> {
    let ev = conn
        .query_row(
            "SELECT * FROM approval_events
             WHERE sheet_id = ?1
             ORDER BY id DESC LIMIT 1",
            [sheet_id],
            map_event_row,
        )
        .optional()?;
    Ok(ev)
}
