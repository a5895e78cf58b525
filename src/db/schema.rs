//! First-run schema. Four relations: sheets, entries, approval events, and
//! the collaborator→supervisor assignment edges. Status/hour-type/action
//! strings are CHECK-constrained to the same vocabulary the Rust enums carry.

use rusqlite::{Connection, Result};

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS time_sheets (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            collaborator_id INTEGER NOT NULL,
            week_start      TEXT NOT NULL,
            week_end        TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'draft'
                            CHECK(status IN ('draft','submitted','approved','rejected')),
            rejection_note  TEXT,
            approver_id     INTEGER,
            decided_at      TEXT,
            created_at      TEXT NOT NULL,
            UNIQUE(collaborator_id, week_start)
        );

        CREATE INDEX IF NOT EXISTS idx_sheets_collab_week
            ON time_sheets(collaborator_id, week_start DESC);
        CREATE INDEX IF NOT EXISTS idx_sheets_status ON time_sheets(status);

        CREATE TABLE IF NOT EXISTS time_entries (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            sheet_id             INTEGER NOT NULL REFERENCES time_sheets(id) ON DELETE CASCADE,
            entry_date           TEXT NOT NULL,
            hours                REAL NOT NULL CHECK(hours > 0 AND hours <= 24),
            hour_type            TEXT NOT NULL CHECK(hour_type IN ('billable','non_billable')),
            mission_id           INTEGER,
            task_id              INTEGER,
            internal_activity_id INTEGER,
            created_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_sheet ON time_entries(sheet_id, entry_date);

        -- UNIQUE over nullable linkage columns: SQLite treats NULLs as
        -- distinct, so the key goes through IFNULL (0 is never a real id).
        CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_dedup
            ON time_entries(sheet_id, entry_date, hour_type,
                            IFNULL(mission_id, 0),
                            IFNULL(task_id, 0),
                            IFNULL(internal_activity_id, 0));

        CREATE TABLE IF NOT EXISTS approval_events (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            sheet_id   INTEGER NOT NULL REFERENCES time_sheets(id) ON DELETE CASCADE,
            actor_id   INTEGER NOT NULL,
            action     TEXT NOT NULL
                       CHECK(action IN ('submit','approve','reject','resubmit')),
            comment    TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_sheet ON approval_events(sheet_id, id);

        CREATE TABLE IF NOT EXISTS supervisor_assignments (
            collaborator_id INTEGER NOT NULL,
            supervisor_id   INTEGER NOT NULL,
            PRIMARY KEY (collaborator_id, supervisor_id),
            CHECK (collaborator_id <> supervisor_id)
        );

        CREATE INDEX IF NOT EXISTS idx_assignments_supervisor
            ON supervisor_assignments(supervisor_id);
        "#,
    )?;
    Ok(())
}
