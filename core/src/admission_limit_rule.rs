//! Admission cap: stops filling a department once it has taken in
//! `limit` people this cycle.

use crate::{
    department::TrainingDepartment,
    employee::Employee,
    error::SimResult,
    rule::{RotationRule, RuleCategory, RuleParams, RulePosition},
};

#[derive(Debug, Clone)]
pub struct AdmissionLimitRule {
    pub limit: usize,
}

impl AdmissionLimitRule {
    pub const NAME: &'static str = "max-admissions-per-cycle";

    pub fn from_params(params: &RuleParams<'_>) -> SimResult<Box<dyn RotationRule>> {
        params.only(&["limit"])?;
        let limit = params.required_usize("limit")?;
        Ok(Box::new(Self { limit }))
    }
}

impl RotationRule for AdmissionLimitRule {
    fn name(&self) -> &'static str { Self::NAME }
    fn category(&self) -> RuleCategory { RuleCategory::Operation }
    fn position(&self) -> RulePosition { RulePosition::Post }

    fn fires(&self, _employee: &Employee, department: &TrainingDepartment) -> bool {
        let limit = self.limit.min(department.max_capacity);
        department.movement().admissions as usize >= limit
    }
}
