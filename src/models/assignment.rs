use serde::Serialize;

/// One collaborator→supervisor edge. Many-to-many: a collaborator may have
/// zero, one, or several supervisors; routing never follows a second hop.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SupervisorAssignment {
    pub collaborator_id: i64,
    pub supervisor_id: i64,
}
