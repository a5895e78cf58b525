//! timesheet-approval library root.
//! Weekly time-sheet lifecycle: entry validation, a SQLite-backed sheet store,
//! supervisor routing, and the submit/approve/reject state machine with an
//! append-only approval-event trail.

pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod utils;

pub use crate::config::WorkflowConfig;
pub use crate::core::access::{CapabilityGate, LinkRef, ReferenceDirectory};
pub use crate::core::approval::ApprovalWorkflow;
pub use crate::errors::{WorkflowError, WorkflowResult};
pub use crate::models::entry::{EntryDraft, HourType, TimeEntry};
pub use crate::models::event::{ApprovalAction, ApprovalEvent};
pub use crate::models::sheet::{SheetStatus, TimeSheet};
