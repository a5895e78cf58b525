//! Supervisor routing: single-hop lookups over the collaborator→supervisor
//! assignment table. This subsystem only reads the table; edges are managed
//! by the HR side of the house.

use crate::db::store::map_sheet_row;
use crate::errors::WorkflowResult;
use crate::models::sheet::TimeSheet;
use rusqlite::{Connection, params};
use std::collections::HashSet;

/// All supervisors currently assigned to a collaborator. May be empty.
pub fn supervisors_of(conn: &Connection, collaborator_id: i64) -> WorkflowResult<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT supervisor_id FROM supervisor_assignments
         WHERE collaborator_id = ?1",
    )?;
    let rows = stmt.query_map([collaborator_id], |row| row.get::<_, i64>(0))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

/// Single-hop routing test: true iff a direct edge exists from the sheet
/// owner to this supervisor right now. No delegation, no transitivity.
pub fn can_route(conn: &Connection, supervisor_id: i64, sheet_owner_id: i64) -> WorkflowResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM supervisor_assignments
         WHERE collaborator_id = ?1 AND supervisor_id = ?2
         LIMIT 1",
    )?;
    Ok(stmt.exists(params![sheet_owner_id, supervisor_id])?)
}

/// Submitted sheets whose owner has no supervisor at all. A legitimate state
/// (the sheet simply has no eligible approver yet); calling layers surface it
/// as an operational alert.
pub fn submitted_without_supervisor(conn: &Connection) -> WorkflowResult<Vec<TimeSheet>> {
    let mut stmt = conn.prepare(
        "SELECT s.* FROM time_sheets s
         WHERE s.status = 'submitted'
           AND NOT EXISTS (
               SELECT 1 FROM supervisor_assignments a
               WHERE a.collaborator_id = s.collaborator_id
           )
         ORDER BY s.week_start ASC, s.id ASC",
    )?;
    let rows = stmt.query_map([], map_sheet_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
