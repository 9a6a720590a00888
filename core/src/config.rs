use crate::{
    error::{SimError, SimResult},
    rule::RuleSpec,
    rule_engine::RuleEngine,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

fn default_cycles() -> u32 { 15 }
fn default_cycle_length() -> f64 { 1.0 }
fn default_rules() -> Vec<RuleSpec> { vec![RuleSpec::named("no-repeat-department")] }

/// Simulation parameters consumed before the first cycle.
///
/// ```json
/// {
///   "cycles": 36,
///   "cycle_length_months": 1.0,
///   "initial_delay_months": 1.0,
///   "rules": [
///     "no-repeat-department",
///     ["max-admissions-per-cycle", {"limit": 2}],
///     {"name": "gender-exclusion", "params": {"gender": "F", "department": "Immobilisations"}},
///     {"name": "max-departures-per-cycle", "params": {"limit": 2}}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    /// Months the clock advances before each cycle. May be fractional.
    #[serde(default = "default_cycle_length")]
    pub cycle_length_months: f64,
    /// One-time advance applied before the first cycle only.
    #[serde(default)]
    pub initial_delay_months: f64,
    /// Ordered rule list; order is evaluation priority.
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            cycle_length_months: default_cycle_length(),
            initial_delay_months: 0.0,
            rules: default_rules(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {path}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the clock stall or run backwards,
    /// and resolve every rule name so typos surface before any cycle.
    pub fn validate(&self) -> SimResult<()> {
        if !self.cycle_length_months.is_finite() || self.cycle_length_months <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "cycle_length_months must be a positive number, got {}",
                self.cycle_length_months
            )));
        }
        if !self.initial_delay_months.is_finite() || self.initial_delay_months < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "initial_delay_months must be zero or positive, got {}",
                self.initial_delay_months
            )));
        }
        RuleEngine::from_specs(&self.rules)?;
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            cycles: 12,
            ..Self::default()
        }
    }

    pub fn with_rules(mut self, rules: Vec<RuleSpec>) -> Self {
        self.rules = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let config: SimConfig = serde_json::from_value(json!({"cycles": 3})).unwrap();
        assert_eq!(config.cycles, 3);
        assert_eq!(config.cycle_length_months, 1.0);
        assert_eq!(config.initial_delay_months, 0.0);
        assert_eq!(config.rules, vec![RuleSpec::named("no-repeat-department")]);
    }

    #[test]
    fn rules_accept_name_params_pairs() {
        let config: SimConfig = serde_json::from_value(json!({
            "rules": ["no-repeat-department", ["max-departures-per-cycle", {"limit": 1}]]
        }))
        .unwrap();
        assert_eq!(config.rules[1].name(), "max-departures-per-cycle");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_cycle_length() {
        let config = SimConfig { cycle_length_months: 0.0, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_unknown_rules() {
        let config = SimConfig::default().with_rules(vec![RuleSpec::named("nope")]);
        assert!(matches!(config.validate(), Err(SimError::UnknownRule { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
