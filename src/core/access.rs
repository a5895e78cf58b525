//! External collaborator seams. The workflow core consumes exactly two
//! authorization/reference surfaces and implements neither: the
//! organizational directory (mission/task/activity lookups) and the
//! permission-capability check.

use std::fmt;

/// Identifier of the organizational record an entry links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRef {
    Mission(i64),
    Task(i64),
    Activity(i64),
}

impl fmt::Display for LinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRef::Mission(id) => write!(f, "mission {}", id),
            LinkRef::Task(id) => write!(f, "task {}", id),
            LinkRef::Activity(id) => write!(f, "internal activity {}", id),
        }
    }
}

/// Existence/active lookups against the organizational-reference system.
pub trait ReferenceDirectory {
    fn exists(&self, r: LinkRef) -> bool;
    fn is_active(&self, r: LinkRef) -> bool;
}

/// Single boolean capability check against the permission system.
pub trait CapabilityGate {
    fn has_capability(&self, actor_id: i64, capability: &str) -> bool;
}
