//! Departure cap: holds employees in place once a department has
//! released `limit` people this cycle.

use crate::{
    department::TrainingDepartment,
    employee::Employee,
    error::SimResult,
    rule::{RotationRule, RuleCategory, RuleParams, RulePosition},
};

#[derive(Debug, Clone)]
pub struct DepartureLimitRule {
    pub limit: usize,
}

impl DepartureLimitRule {
    pub const NAME: &'static str = "max-departures-per-cycle";

    pub fn from_params(params: &RuleParams<'_>) -> SimResult<Box<dyn RotationRule>> {
        params.only(&["limit"])?;
        let limit = params.required_usize("limit")?;
        Ok(Box::new(Self { limit }))
    }
}

impl RotationRule for DepartureLimitRule {
    fn name(&self) -> &'static str { Self::NAME }
    fn category(&self) -> RuleCategory { RuleCategory::Operation }
    fn position(&self) -> RulePosition { RulePosition::Pre }

    fn fires(&self, _employee: &Employee, department: &TrainingDepartment) -> bool {
        let limit = self.limit.min(department.max_capacity);
        department.movement().departures as usize >= limit
    }
}
