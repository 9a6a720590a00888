//! Typed record of what a cycle did.
//!
//! Events are produced by the orchestrator in the order the mutations
//! happened. They are derived output; entity state stays authoritative.

use crate::types::{Cycle, DepartmentId, EmployeeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RotationEvent {
    /// Training duration reached; employee left the department.
    Removed {
        employee:   EmployeeId,
        department: DepartmentId,
    },
    /// Training duration reached but a pre-removal rule held the employee.
    RemovalDeferred {
        employee:   EmployeeId,
        department: DepartmentId,
        rule:       String,
    },
    Assigned {
        employee:   EmployeeId,
        department: DepartmentId,
    },
    /// Permanent exclusion recorded for the first time.
    Excluded {
        employee:   EmployeeId,
        department: DepartmentId,
        rule:       String,
    },
    Finished {
        employee: EmployeeId,
    },
}

impl RotationEvent {
    pub fn employee(&self) -> EmployeeId {
        match self {
            Self::Removed { employee, .. }
            | Self::RemovalDeferred { employee, .. }
            | Self::Assigned { employee, .. }
            | Self::Excluded { employee, .. }
            | Self::Finished { employee } => *employee,
        }
    }

    /// Stable string name, matching the serde tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Removed { .. }         => "removed",
            Self::RemovalDeferred { .. } => "removal_deferred",
            Self::Assigned { .. }        => "assigned",
            Self::Excluded { .. }        => "excluded",
            Self::Finished { .. }        => "finished",
        }
    }
}

/// Everything one cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle:  Cycle,
    pub now:    DateTime<Utc>,
    pub events: Vec<RotationEvent>,
}

impl CycleReport {
    pub fn count(&self, type_name: &str) -> usize {
        self.events.iter().filter(|e| e.type_name() == type_name).count()
    }
}
