//! Rule registry and evaluation.
//!
//! Names resolve through the static CATALOG table when the engine is
//! built. An unknown name is a configuration error raised before any
//! cycle runs. Evaluation is first-match-wins in registration order.

use crate::{
    admission_limit_rule::AdmissionLimitRule,
    department::TrainingDepartment,
    departure_limit_rule::DepartureLimitRule,
    employee::Employee,
    error::{SimError, SimResult},
    gender_exclusion_rule::GenderExclusionRule,
    no_repeat_rule::NoRepeatRule,
    rule::{RotationRule, RuleCategory, RuleParams, RulePosition, RuleSpec},
};

type RuleFactory = fn(&RuleParams<'_>) -> SimResult<Box<dyn RotationRule>>;

/// Every rule name the engine understands. Append new rules here.
const CATALOG: &[(&str, RuleFactory)] = &[
    (GenderExclusionRule::NAME, GenderExclusionRule::from_params),
    (DepartureLimitRule::NAME,  DepartureLimitRule::from_params),
    (NoRepeatRule::NAME,        NoRepeatRule::from_params),
    (AdmissionLimitRule::NAME,  AdmissionLimitRule::from_params),
];

pub fn catalog_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

#[derive(Debug, Default)]
pub struct RuleEngine {
    rules: Vec<Box<dyn RotationRule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Resolve and register every spec in order. Stops at the first bad one.
    pub fn from_specs(specs: &[RuleSpec]) -> SimResult<Self> {
        let mut engine = Self::new();
        for spec in specs {
            engine.register(spec)?;
        }
        Ok(engine)
    }

    pub fn register(&mut self, spec: &RuleSpec) -> SimResult<()> {
        let factory = CATALOG
            .iter()
            .find(|(name, _)| *name == spec.name())
            .map(|(_, factory)| *factory)
            .ok_or_else(|| SimError::UnknownRule { name: spec.name().to_string() })?;
        let rule = factory(&spec.params())?;
        log::debug!(
            "rules: registered '{}' ({:?}/{:?})",
            rule.name(),
            rule.category(),
            rule.position()
        );
        self.rules.push(rule);
        Ok(())
    }

    /// Register an already-built rule. Used for rules outside the catalog.
    pub fn push(&mut self, rule: Box<dyn RotationRule>) {
        self.rules.push(rule);
    }

    /// True if any matching rule fires for this pair.
    pub fn check(
        &self,
        employee: &Employee,
        department: &TrainingDepartment,
        category: RuleCategory,
        position: RulePosition,
    ) -> bool {
        self.first_firing(employee, department, category, position).is_some()
    }

    /// Name of the first matching rule that fires, in registration order.
    pub fn first_firing(
        &self,
        employee: &Employee,
        department: &TrainingDepartment,
        category: RuleCategory,
        position: RulePosition,
    ) -> Option<&'static str> {
        self.rules
            .iter()
            .filter(|r| r.category() == category && r.position().matches(position))
            .find(|r| r.fires(employee, department))
            .map(|r| r.name())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
