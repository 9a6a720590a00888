//! Gender exclusion: permanently bars one gender from one department.

use crate::{
    department::TrainingDepartment,
    employee::Employee,
    error::SimResult,
    rule::{RotationRule, RuleCategory, RuleParams, RulePosition},
    types::Gender,
};

pub const DEFAULT_GENDER: Gender = Gender::Female;
pub const DEFAULT_DEPARTMENT: &str = "Immobilisations";

#[derive(Debug, Clone)]
pub struct GenderExclusionRule {
    pub gender:     Gender,
    pub department: String,
}

impl GenderExclusionRule {
    pub const NAME: &'static str = "gender-exclusion";

    pub fn from_params(params: &RuleParams<'_>) -> SimResult<Box<dyn RotationRule>> {
        params.only(&["gender", "department"])?;
        let gender = match params.optional_str("gender")? {
            Some(code) => code.parse::<Gender>().map_err(|e| params.invalid(e))?,
            None => DEFAULT_GENDER,
        };
        let department = params
            .optional_str("department")?
            .unwrap_or(DEFAULT_DEPARTMENT)
            .to_string();
        Ok(Box::new(Self { gender, department }))
    }
}

impl RotationRule for GenderExclusionRule {
    fn name(&self) -> &'static str { Self::NAME }
    fn category(&self) -> RuleCategory { RuleCategory::Exclusion }
    fn position(&self) -> RulePosition { RulePosition::Post }

    fn fires(&self, employee: &Employee, department: &TrainingDepartment) -> bool {
        employee.gender == self.gender && department.name == self.department
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rule::RuleSpec,
        types::{DepartmentId, EmployeeId},
    };
    use serde_json::json;

    #[test]
    fn fires_only_for_matching_gender_and_department() {
        let spec = RuleSpec::with_params(
            GenderExclusionRule::NAME,
            json!({"gender": "F", "department": "Imm"}),
        )
        .unwrap();
        let rule = GenderExclusionRule::from_params(&spec.params()).unwrap();
        let imm = TrainingDepartment::new(DepartmentId(0), "Imm", 6, 2);
        let finance = TrainingDepartment::new(DepartmentId(1), "Finance", 12, 4);
        let siham = Employee::new(EmployeeId(0), "Siham", "Beghoura", Gender::Female);
        let hamid = Employee::new(EmployeeId(1), "Hamid", "Beghoura", Gender::Male);

        assert!(rule.fires(&siham, &imm));
        assert!(!rule.fires(&siham, &finance));
        assert!(!rule.fires(&hamid, &imm));
    }

    #[test]
    fn defaults_target_immobilisations() {
        let rule = GenderExclusionRule::from_params(&RuleSpec::named("gender-exclusion").params()).unwrap();
        let imm = TrainingDepartment::new(DepartmentId(0), DEFAULT_DEPARTMENT, 6, 2);
        let siham = Employee::new(EmployeeId(0), "Siham", "Beghoura", Gender::Female);
        assert!(rule.fires(&siham, &imm));
    }

    #[test]
    fn rejects_unknown_gender() {
        let spec = RuleSpec::with_params(GenderExclusionRule::NAME, json!({"gender": "Z"})).unwrap();
        assert!(GenderExclusionRule::from_params(&spec.params()).is_err());
    }
}
