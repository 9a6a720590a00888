//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rotation cycle number. Cycle 0 is the seeded initial state.
pub type Cycle = u64;

/// The canonical run identifier.
pub type RunId = String;

/// Days in one simulated month. Months are fixed 30-day blocks.
pub const DAYS_PER_MONTH: i64 = 30;

/// Stable index of an employee inside the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub usize);

/// Stable index of a training department inside the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepartmentId(pub usize);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{:04}", self.0)
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d-{:02}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F", alias = "female", alias = "Female")]
    Female,
    #[serde(rename = "M", alias = "male", alias = "Male")]
    Male,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male   => "M",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Ok(Self::Female),
            "m" | "male"   => Ok(Self::Male),
            other => Err(format!("unrecognised gender '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_codes_and_words() {
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(" male ".parse::<Gender>(), Ok(Gender::Male));
        assert!("x".parse::<Gender>().is_err());
    }
}
