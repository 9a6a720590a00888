use crate::types::{DepartmentId, EmployeeId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Department {department} is full ({capacity} seat(s))")]
    DepartmentFull { department: DepartmentId, capacity: usize },

    #[error("Employee {employee} is not on the roster of department {department}")]
    NotMember { employee: EmployeeId, department: DepartmentId },

    #[error("Employee {employee} is not assigned to any department")]
    NotAssigned { employee: EmployeeId },

    #[error("Employee {employee} is still in training at department {department}")]
    StillAssigned { employee: EmployeeId, department: DepartmentId },

    #[error("Employee {employee} has finished training; status is terminal")]
    TerminalStatus { employee: EmployeeId },

    #[error("Rule '{name}' is not in the rule catalog")]
    UnknownRule { name: String },

    #[error("Invalid parameters for rule '{name}': {reason}")]
    InvalidRuleParams { name: String, reason: String },

    #[error("Department '{name}' does not exist")]
    UnknownDepartment { name: String },

    #[error("Department '{name}' is declared more than once")]
    DuplicateDepartment { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
