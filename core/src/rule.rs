//! Rule trait and rule configuration.
//!
//! RULE: Every policy implements RotationRule.
//! Rules are pure predicates over one (employee, department) pair.
//! They never mutate state; the orchestrator acts on their answer.

use crate::{
    department::TrainingDepartment,
    employee::Employee,
    error::{SimError, SimResult},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Permanent block, recorded in the employee's excluded set.
    Exclusion,
    /// Temporary skip for the current cycle only.
    Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePosition {
    /// Consulted before removing an employee from a department.
    Pre,
    /// Consulted while matching employees to open seats.
    Post,
    /// Consulted at both points.
    All,
}

impl RulePosition {
    pub fn matches(&self, requested: RulePosition) -> bool {
        *self == RulePosition::All || requested == RulePosition::All || *self == requested
    }
}

/// The contract every rotation rule must fulfill.
pub trait RotationRule: Send + std::fmt::Debug {
    /// Catalog name this rule was registered under.
    fn name(&self) -> &'static str;

    fn category(&self) -> RuleCategory;

    fn position(&self) -> RulePosition;

    /// True when the rule blocks this pair.
    fn fires(&self, employee: &Employee, department: &TrainingDepartment) -> bool;
}

/// One configured rule: a bare name, a `[name, params]` pair, or a
/// `{"name", "params"}` object.
///
/// ```json
/// [
///   "no-repeat-department",
///   ["max-departures-per-cycle", {"limit": 1}],
///   {"name": "gender-exclusion", "params": {"gender": "F"}}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Name(String),
    Pair(String, Map<String, Value>),
    WithParams {
        name: String,
        #[serde(default)]
        params: Map<String, Value>,
    },
}

impl RuleSpec {
    pub fn named(name: &str) -> Self {
        Self::Name(name.to_string())
    }

    /// `params` must be a JSON object.
    pub fn with_params(name: &str, params: Value) -> SimResult<Self> {
        match params {
            Value::Object(params) => Ok(Self::WithParams { name: name.to_string(), params }),
            other => Err(SimError::InvalidRuleParams {
                name: name.to_string(),
                reason: format!("parameters must be an object, got {other}"),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Pair(name, _) | Self::WithParams { name, .. } => name,
        }
    }

    pub fn params(&self) -> RuleParams<'_> {
        match self {
            Self::Name(name) => RuleParams { rule: name, map: None },
            Self::Pair(name, params) | Self::WithParams { name, params } => {
                RuleParams { rule: name, map: Some(params) }
            }
        }
    }
}

/// Typed access to a rule's keyword parameters.
pub struct RuleParams<'a> {
    rule: &'a str,
    map:  Option<&'a Map<String, Value>>,
}

impl<'a> RuleParams<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    pub fn invalid(&self, reason: impl Into<String>) -> SimError {
        SimError::InvalidRuleParams {
            name: self.rule.to_string(),
            reason: reason.into(),
        }
    }

    pub fn required_usize(&self, key: &str) -> SimResult<usize> {
        self.optional_usize(key)?
            .ok_or_else(|| self.invalid(format!("missing required parameter '{key}'")))
    }

    pub fn optional_usize(&self, key: &str) -> SimResult<Option<usize>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(|| self.invalid(format!("'{key}' must be a non-negative integer, got {v}"))),
        }
    }

    pub fn optional_str(&self, key: &str) -> SimResult<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid(format!("'{key}' must be a string, got {v}"))),
        }
    }

    /// Reject keys the rule does not understand.
    pub fn only(&self, allowed: &[&str]) -> SimResult<()> {
        if let Some(map) = self.map {
            if let Some(key) = map.keys().find(|k| !allowed.contains(&k.as_str())) {
                return Err(self.invalid(format!("unknown parameter '{key}'")));
            }
        }
        Ok(())
    }
}
