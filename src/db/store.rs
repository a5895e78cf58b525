//! TimeSheetStore: persisted representation of a sheet and its entries.
//! Every mutation runs inside a single IMMEDIATE transaction scoped to one
//! sheet, so at most one writer touches a sheet at a time; a second writer
//! blocks on the lock and then re-reads the committed status.

use crate::core::validator::EntryValidator;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::models::entry::{EntryDraft, HourType, TimeEntry};
use crate::models::sheet::{SheetStatus, TimeSheet};
use crate::utils::date::{is_monday, now_rfc3339, week_end};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

pub fn map_sheet_row(row: &Row) -> rusqlite::Result<TimeSheet> {
    let status_str: String = row.get("status")?;
    let status = SheetStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid sheet status: {}", status_str).into(),
        )
    })?;

    Ok(TimeSheet {
        id: row.get("id")?,
        collaborator_id: row.get("collaborator_id")?,
        week_start: parse_db_date(row, "week_start")?,
        week_end: parse_db_date(row, "week_end")?,
        status,
        rejection_note: row.get("rejection_note")?,
        approver_id: row.get("approver_id")?,
        decided_at: row.get("decided_at")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_entry_row(row: &Row) -> rusqlite::Result<TimeEntry> {
    let type_str: String = row.get("hour_type")?;
    let hour_type = HourType::from_db_str(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid hour type: {}", type_str).into(),
        )
    })?;

    Ok(TimeEntry {
        id: row.get("id")?,
        sheet_id: row.get("sheet_id")?,
        entry_date: parse_db_date(row, "entry_date")?,
        hours: row.get("hours")?,
        hour_type,
        mission_id: row.get("mission_id")?,
        task_id: row.get("task_id")?,
        internal_activity_id: row.get("internal_activity_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_db_date(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid date: {}", s).into(),
        )
    })
}

/// Idempotent per (collaborator, week): the first call creates the draft
/// sheet, later calls return the same row. Fails unless the week opens on a
/// Monday.
pub fn get_or_create(
    conn: &mut Connection,
    collaborator_id: i64,
    week_start: NaiveDate,
) -> WorkflowResult<TimeSheet> {
    if !is_monday(week_start) {
        return Err(WorkflowError::InvalidWeekStart(week_start));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let start_str = week_start.format("%Y-%m-%d").to_string();

    // UNIQUE(collaborator_id, week_start) makes the insert a no-op when the
    // sheet already exists, regardless of interleaved callers.
    tx.execute(
        "INSERT OR IGNORE INTO time_sheets
             (collaborator_id, week_start, week_end, status, created_at)
         VALUES (?1, ?2, ?3, 'draft', ?4)",
        params![
            collaborator_id,
            start_str,
            week_end(week_start).format("%Y-%m-%d").to_string(),
            now_rfc3339(),
        ],
    )?;

    let sheet = tx.query_row(
        "SELECT * FROM time_sheets WHERE collaborator_id = ?1 AND week_start = ?2",
        params![collaborator_id, start_str],
        map_sheet_row,
    )?;
    tx.commit()?;

    Ok(sheet)
}

pub fn load_sheet(conn: &Connection, sheet_id: i64) -> WorkflowResult<TimeSheet> {
    conn.query_row(
        "SELECT * FROM time_sheets WHERE id = ?1",
        [sheet_id],
        map_sheet_row,
    )
    .optional()?
    .ok_or(WorkflowError::SheetNotFound(sheet_id))
}

pub fn load_entries(conn: &Connection, sheet_id: i64) -> WorkflowResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM time_entries
         WHERE sheet_id = ?1
         ORDER BY entry_date ASC, id ASC",
    )?;
    let rows = stmt.query_map([sheet_id], map_entry_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Append an entry to an editable sheet. Locks the sheet row, re-checks the
/// status, runs the full validation rule set, then inserts.
pub fn add_entry(
    conn: &mut Connection,
    validator: &EntryValidator,
    sheet_id: i64,
    draft: &EntryDraft,
) -> WorkflowResult<TimeEntry> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let sheet = tx
        .query_row(
            "SELECT * FROM time_sheets WHERE id = ?1",
            [sheet_id],
            map_sheet_row,
        )
        .optional()?
        .ok_or(WorkflowError::SheetNotFound(sheet_id))?;

    if !sheet.status.is_editable() {
        return Err(WorkflowError::SheetLocked(sheet.status.to_db_str().into()));
    }

    let existing = {
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

    validator.validate(draft, &sheet, &existing)?;

    let created_at = now_rfc3339();
    tx.execute(
        "INSERT INTO time_entries
             (sheet_id, entry_date, hours, hour_type,
              mission_id, task_id, internal_activity_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            sheet_id,
            draft.entry_date.format("%Y-%m-%d").to_string(),
            draft.hours,
            draft.hour_type.to_db_str(),
            draft.mission_id,
            draft.task_id,
            draft.internal_activity_id,
            created_at,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    debug!("entry {} added to sheet {}", id, sheet_id);

    Ok(TimeEntry {
        id,
        sheet_id,
        entry_date: draft.entry_date,
        hours: draft.hours,
        hour_type: draft.hour_type,
        mission_id: draft.mission_id,
        task_id: draft.task_id,
        internal_activity_id: draft.internal_activity_id,
        created_at,
    })
}

/// Same locking rule as add_entry; deleting from a submitted or approved
/// sheet is refused.
pub fn remove_entry(conn: &mut Connection, sheet_id: i64, entry_id: i64) -> WorkflowResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let sheet = tx
        .query_row(
            "SELECT * FROM time_sheets WHERE id = ?1",
            [sheet_id],
            map_sheet_row,
        )
        .optional()?
        .ok_or(WorkflowError::SheetNotFound(sheet_id))?;

    if !sheet.status.is_editable() {
        return Err(WorkflowError::SheetLocked(sheet.status.to_db_str().into()));
    }

    let deleted = tx.execute(
        "DELETE FROM time_entries WHERE id = ?1 AND sheet_id = ?2",
        params![entry_id, sheet_id],
    )?;
    if deleted == 0 {
        return Err(WorkflowError::EntryNotFound(entry_id));
    }
    tx.commit()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyTotals {
    pub billable: f64,
    pub non_billable: f64,
    pub total: f64,
}

impl WeeklyTotals {
    pub fn get(&self, hour_type: HourType) -> f64 {
        match hour_type {
            HourType::Billable => self.billable,
            HourType::NonBillable => self.non_billable,
        }
    }
}

/// Pure aggregation over one sheet's entries.
pub fn weekly_totals(conn: &Connection, sheet_id: i64) -> WorkflowResult<WeeklyTotals> {
    // existence check first so an unknown sheet is not an empty total
    load_sheet(conn, sheet_id)?;

    let mut stmt = conn.prepare(
        "SELECT hour_type, SUM(hours) FROM time_entries
         WHERE sheet_id = ?1
         GROUP BY hour_type",
    )?;
    let rows = stmt.query_map([sheet_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    let mut totals = WeeklyTotals {
        billable: 0.0,
        non_billable: 0.0,
        total: 0.0,
    };
    for r in rows {
        let (type_str, sum) = r?;
        match HourType::from_db_str(&type_str) {
            Some(HourType::Billable) => totals.billable = sum,
            Some(HourType::NonBillable) => totals.non_billable = sum,
            None => {}
        }
    }
    totals.total = totals.billable + totals.non_billable;
    Ok(totals)
}

/// Sheets of one collaborator, newest week first, optionally bounded to a
/// closed week-start range.
pub fn list_for_collaborator(
    conn: &Connection,
    collaborator_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> WorkflowResult<Vec<TimeSheet>> {
    let from_str = from
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "0000-01-01".to_string());
    let to_str = to
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "9999-12-31".to_string());

    let mut stmt = conn.prepare(
        "SELECT * FROM time_sheets
         WHERE collaborator_id = ?1
           AND week_start >= ?2 AND week_start <= ?3
         ORDER BY week_start DESC",
    )?;
    let rows = stmt.query_map(params![collaborator_id, from_str, to_str], map_sheet_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
