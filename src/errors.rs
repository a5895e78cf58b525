//! Unified workflow error type.
//! All modules (db, core, utils) return WorkflowError so the calling layer
//! sees one typed result surface and nothing escapes as a panic.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    // ---------------------------
    // Entry validation
    // ---------------------------
    #[error("Week must start on a Monday: {0}")]
    InvalidWeekStart(NaiveDate),

    #[error("Entry date {0} is outside the sheet week")]
    OutOfRangeDate(NaiveDate),

    #[error("Invalid hours value: {0}")]
    InvalidHours(f64),

    #[error("Inconsistent linkage: {0}")]
    InconsistentLinkage(String),

    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    #[error("Duplicate entry for the same date/type/linkage")]
    DuplicateEntry,

    // ---------------------------
    // Sheet / transition guards
    // ---------------------------
    #[error("Sheet is locked in status '{0}'")]
    SheetLocked(String),

    #[error("Actor {0} does not own this sheet")]
    NotOwner(i64),

    #[error("Cannot submit a sheet with no entries")]
    EmptySheet,

    #[error("Invalid transition: cannot {action} a sheet in status '{from}'")]
    InvalidTransition { from: String, action: String },

    #[error("A rejection requires a non-empty note")]
    MissingRejectionReason,

    #[error("Actor {0} is not an assigned supervisor of the sheet owner")]
    NotAuthorizedSupervisor(i64),

    // ---------------------------
    // Lookup
    // ---------------------------
    #[error("Time sheet {0} not found")]
    SheetNotFound(i64),

    #[error("Time entry {0} not found")]
    EntryNotFound(i64),

    // ---------------------------
    // Infrastructure
    // ---------------------------
    #[error("Store is busy; the operation was rolled back and may be retried")]
    Busy,

    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// SQLITE_BUSY / SQLITE_LOCKED become the retryable `Busy` kind; the
/// transaction has already been rolled back wholesale by that point.
impl From<rusqlite::Error> for WorkflowError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                WorkflowError::Busy
            }
            _ => WorkflowError::Db(e),
        }
    }
}
