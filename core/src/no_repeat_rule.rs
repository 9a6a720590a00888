//! No repeat: an employee never trains twice in the same department.

use crate::{
    department::TrainingDepartment,
    employee::Employee,
    error::SimResult,
    rule::{RotationRule, RuleCategory, RuleParams, RulePosition},
};

#[derive(Debug, Clone, Default)]
pub struct NoRepeatRule;

impl NoRepeatRule {
    pub const NAME: &'static str = "no-repeat-department";

    pub fn from_params(params: &RuleParams<'_>) -> SimResult<Box<dyn RotationRule>> {
        params.only(&[])?;
        Ok(Box::new(Self))
    }
}

impl RotationRule for NoRepeatRule {
    fn name(&self) -> &'static str { Self::NAME }
    fn category(&self) -> RuleCategory { RuleCategory::Operation }
    fn position(&self) -> RulePosition { RulePosition::Post }

    fn fires(&self, employee: &Employee, department: &TrainingDepartment) -> bool {
        employee.visited(department.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::SimClock,
        types::{DepartmentId, EmployeeId, Gender},
    };

    #[test]
    fn fires_for_previously_visited_department() {
        let clock = SimClock::new();
        let mut achat = TrainingDepartment::new(DepartmentId(0), "Achat Etranger", 6, 3);
        let imports = TrainingDepartment::new(DepartmentId(1), "Imports", 6, 1);
        let mut e = Employee::new(EmployeeId(0), "Chouaib", "Beghoura", Gender::Male);

        achat.assign(&mut e, &clock, None).unwrap();
        assert!(!NoRepeatRule.fires(&e, &achat));

        achat.remove(&mut e, &clock).unwrap();
        assert!(NoRepeatRule.fires(&e, &achat));
        assert!(!NoRepeatRule.fires(&e, &imports));
    }
}
