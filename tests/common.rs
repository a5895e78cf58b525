#![allow(dead_code)]
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use timesheet_approval::db::{initialize::init_db, pool::DbPool};
use timesheet_approval::{CapabilityGate, LinkRef, ReferenceDirectory, WorkflowConfig};

/// Fresh in-memory database with the full schema applied.
pub fn setup_pool() -> DbPool {
    let pool = DbPool::open_in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init schema");
    pool
}

/// A Monday to hang test weeks on.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn day_of_week(offset: u64) -> NaiveDate {
    monday() + chrono::Days::new(offset)
}

/// Reference directory stub: everything exists; missions listed in
/// `inactive_missions` are closed.
pub struct StubDirectory {
    pub inactive_missions: Vec<i64>,
}

impl StubDirectory {
    pub fn all_active() -> Self {
        Self {
            inactive_missions: Vec::new(),
        }
    }
}

impl ReferenceDirectory for StubDirectory {
    fn exists(&self, _: LinkRef) -> bool {
        true
    }
    fn is_active(&self, r: LinkRef) -> bool {
        match r {
            LinkRef::Mission(id) => !self.inactive_missions.contains(&id),
            _ => true,
        }
    }
}

pub struct GrantAll;
impl CapabilityGate for GrantAll {
    fn has_capability(&self, _: i64, _: &str) -> bool {
        true
    }
}

pub struct DenyAll;
impl CapabilityGate for DenyAll {
    fn has_capability(&self, _: i64, _: &str) -> bool {
        false
    }
}

pub fn config() -> WorkflowConfig {
    WorkflowConfig::default()
}

/// The assignment table is read-only from the workflow's perspective, so
/// tests seed edges directly.
pub fn seed_assignment(conn: &Connection, collaborator_id: i64, supervisor_id: i64) {
    conn.execute(
        "INSERT OR IGNORE INTO supervisor_assignments (collaborator_id, supervisor_id)
         VALUES (?1, ?2)",
        params![collaborator_id, supervisor_id],
    )
    .expect("seed assignment");
}
