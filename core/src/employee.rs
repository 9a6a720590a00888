//! Employee entity and its status state machine.
//!
//! Status, department reference, start date and history move together
//! through `transition()`. Only department operations call it, so the
//! roster and the employee side can never disagree.

use crate::{
    clock::SimClock,
    department::TrainingDepartment,
    error::{SimError, SimResult},
    types::{DepartmentId, EmployeeId, Gender},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Assigned,
    WaitingReassignment,
    Finished,
}

impl EmployeeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Assigned            => "Assigned",
            Self::WaitingReassignment => "Waiting Reassignment",
            Self::Finished            => "Training Completed",
        }
    }
}

/// One completed stay in a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub department: DepartmentId,
    pub entered_at: DateTime<Utc>,
    pub left_at:    DateTime<Utc>,
}

/// The only ways an employee's placement can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusChange {
    /// Start training in a department. Any current stay is closed first.
    Enter(DepartmentId),
    /// Leave the current department and wait for a new seat.
    Release,
    /// Every department has been visited or excluded.
    Finish,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id:         EmployeeId,
    pub first_name: String,
    pub last_name:  String,
    pub gender:     Gender,
    start_date:         Option<DateTime<Utc>>,
    current_department: Option<DepartmentId>,
    history:            Vec<AssignmentRecord>,
    excluded:           BTreeSet<DepartmentId>,
    status:             EmployeeStatus,
    /// Set when status or department changed during the current cycle.
    changed:            bool,
}

impl Employee {
    pub fn new(id: EmployeeId, first_name: &str, last_name: &str, gender: Gender) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            gender,
            start_date: None,
            current_department: None,
            history: Vec::new(),
            excluded: BTreeSet::new(),
            status: EmployeeStatus::WaitingReassignment,
            changed: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn status(&self) -> EmployeeStatus { self.status }
    pub fn current_department(&self) -> Option<DepartmentId> { self.current_department }
    pub fn start_date(&self) -> Option<DateTime<Utc>> { self.start_date }
    pub fn history(&self) -> &[AssignmentRecord] { &self.history }
    pub fn excluded(&self) -> &BTreeSet<DepartmentId> { &self.excluded }
    pub fn changed(&self) -> bool { self.changed }

    pub fn has_department(&self) -> bool {
        self.status == EmployeeStatus::Assigned
    }

    pub fn is_finished(&self) -> bool {
        self.status == EmployeeStatus::Finished
    }

    pub fn visited(&self, department: DepartmentId) -> bool {
        self.history.iter().any(|r| r.department == department)
    }

    pub fn is_excluded_from(&self, department: DepartmentId) -> bool {
        self.excluded.contains(&department)
    }

    /// Department of the most recent completed stay.
    pub fn last_department(&self) -> Option<DepartmentId> {
        self.history.last().map(|r| r.department)
    }

    /// Number of distinct departments either visited or excluded.
    pub fn settled_department_count(&self) -> usize {
        self.history
            .iter()
            .map(|r| r.department)
            .chain(self.excluded.iter().copied())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Days since the current start date; 0 without one.
    pub fn elapsed_days(&self, clock: &SimClock) -> i64 {
        self.start_date
            .map(|start| clock.elapsed_days_since(start))
            .unwrap_or(0)
    }

    /// Whether the stay in `department` has lasted its nominal duration.
    pub fn has_completed_training(
        &self,
        department: &TrainingDepartment,
        clock: &SimClock,
    ) -> SimResult<bool> {
        let current = self
            .current_department
            .ok_or(SimError::NotAssigned { employee: self.id })?;
        debug_assert_eq!(current, department.id, "duration checked against wrong department");
        Ok(self.elapsed_days(clock) >= department.duration_days())
    }

    /// Apply a status change at instant `at`.
    pub(crate) fn transition(&mut self, change: StatusChange, at: DateTime<Utc>) -> SimResult<()> {
        if self.status == EmployeeStatus::Finished {
            return Err(SimError::TerminalStatus { employee: self.id });
        }
        match change {
            StatusChange::Enter(department) => {
                self.close_current_stay(at);
                self.current_department = Some(department);
                self.start_date = Some(at);
                self.status = EmployeeStatus::Assigned;
            }
            StatusChange::Release => {
                if !self.close_current_stay(at) {
                    return Err(SimError::NotAssigned { employee: self.id });
                }
                self.status = EmployeeStatus::WaitingReassignment;
            }
            StatusChange::Finish => {
                if let Some(department) = self.current_department {
                    return Err(SimError::StillAssigned { employee: self.id, department });
                }
                self.status = EmployeeStatus::Finished;
            }
        }
        self.changed = true;
        Ok(())
    }

    /// Record a permanent exclusion. Returns false if already excluded.
    pub(crate) fn exclude(&mut self, department: DepartmentId) -> bool {
        self.excluded.insert(department)
    }

    pub(crate) fn clear_changed(&mut self) {
        self.changed = false;
    }

    fn close_current_stay(&mut self, at: DateTime<Utc>) -> bool {
        let Some(department) = self.current_department.take() else {
            return false;
        };
        self.history.push(AssignmentRecord {
            department,
            entered_at: self.start_date.take().unwrap_or(at),
            left_at: at,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, 1, 0, 0, 0).unwrap()
    }

    fn employee() -> Employee {
        Employee::new(EmployeeId(0), "Chouaib", "Beghoura", Gender::Male)
    }

    #[test]
    fn new_employee_is_waiting_without_department() {
        let e = employee();
        assert_eq!(e.status(), EmployeeStatus::WaitingReassignment);
        assert!(!e.has_department());
        assert_eq!(e.current_department(), None);
    }

    #[test]
    fn reassignment_closes_outgoing_stay_first() {
        let mut e = employee();
        e.transition(StatusChange::Enter(DepartmentId(0)), at(1)).unwrap();
        assert!(e.history().is_empty());

        e.transition(StatusChange::Enter(DepartmentId(1)), at(3)).unwrap();
        assert_eq!(e.current_department(), Some(DepartmentId(1)));
        assert_eq!(
            e.history(),
            &[AssignmentRecord { department: DepartmentId(0), entered_at: at(1), left_at: at(3) }]
        );
    }

    #[test]
    fn release_requires_a_department() {
        let mut e = employee();
        assert!(matches!(
            e.transition(StatusChange::Release, at(1)),
            Err(SimError::NotAssigned { .. })
        ));
    }

    #[test]
    fn finished_is_terminal() {
        let mut e = employee();
        e.transition(StatusChange::Finish, at(1)).unwrap();
        assert!(e.is_finished());
        assert!(matches!(
            e.transition(StatusChange::Enter(DepartmentId(0)), at(2)),
            Err(SimError::TerminalStatus { .. })
        ));
        assert!(e.is_finished());
    }

    #[test]
    fn exclusion_is_idempotent() {
        let mut e = employee();
        assert!(e.exclude(DepartmentId(2)));
        assert!(!e.exclude(DepartmentId(2)));
        assert_eq!(e.excluded().len(), 1);
    }

    #[test]
    fn elapsed_days_is_zero_without_start_date() {
        let clock = SimClock::starting_at(at(6));
        assert_eq!(employee().elapsed_days(&clock), 0);
    }
}
