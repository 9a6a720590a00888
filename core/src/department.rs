//! Training department: roster management and per-cycle movement counters.

use crate::{
    clock::SimClock,
    employee::{Employee, StatusChange},
    error::{SimError, SimResult},
    types::{DepartmentId, EmployeeId, DAYS_PER_MONTH},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Admissions ("+") and departures ("−") recorded during one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementCounter {
    pub admissions: u32,
    pub departures: u32,
}

impl MovementCounter {
    pub fn has_movement(&self) -> bool {
        self.admissions > 0 || self.departures > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDepartment {
    pub id:              DepartmentId,
    pub name:            String,
    pub duration_months: u32,
    pub max_capacity:    usize,
    roster:           Vec<EmployeeId>,
    movement:         MovementCounter,
    /// Employees who left here and are not yet placed elsewhere.
    recently_vacated: BTreeSet<EmployeeId>,
}

impl TrainingDepartment {
    pub fn new(id: DepartmentId, name: &str, duration_months: u32, max_capacity: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            duration_months,
            max_capacity,
            roster: Vec::new(),
            movement: MovementCounter::default(),
            recently_vacated: BTreeSet::new(),
        }
    }

    pub fn roster(&self) -> &[EmployeeId] { &self.roster }
    pub fn movement(&self) -> MovementCounter { self.movement }
    pub fn recently_vacated(&self) -> &BTreeSet<EmployeeId> { &self.recently_vacated }

    pub fn occupancy(&self) -> usize {
        self.roster.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.roster.len() < self.max_capacity
    }

    pub fn duration_days(&self) -> i64 {
        i64::from(self.duration_months) * DAYS_PER_MONTH
    }

    pub fn is_member(&self, employee: EmployeeId) -> bool {
        self.roster.contains(&employee)
    }

    /// Seat `employee` here. The start date is `now` unless overridden,
    /// which is how seeded input keeps its original start dates.
    pub fn assign(
        &mut self,
        employee: &mut Employee,
        clock: &SimClock,
        start_override: Option<DateTime<Utc>>,
    ) -> SimResult<()> {
        if !self.has_capacity() {
            return Err(SimError::DepartmentFull {
                department: self.id,
                capacity: self.max_capacity,
            });
        }
        let start = start_override.unwrap_or_else(|| clock.now());
        employee.transition(StatusChange::Enter(self.id), start)?;
        self.roster.push(employee.id);
        self.movement.admissions += 1;
        log::debug!("{}: + {} ({}/{})", self.name, employee.full_name(), self.occupancy(), self.max_capacity);
        Ok(())
    }

    pub fn remove(&mut self, employee: &mut Employee, clock: &SimClock) -> SimResult<()> {
        let Some(pos) = self.roster.iter().position(|id| *id == employee.id) else {
            return Err(SimError::NotMember {
                employee: employee.id,
                department: self.id,
            });
        };
        employee.transition(StatusChange::Release, clock.now())?;
        self.roster.remove(pos);
        self.movement.departures += 1;
        log::debug!("{}: - {} ({}/{})", self.name, employee.full_name(), self.occupancy(), self.max_capacity);
        Ok(())
    }

    /// Permanently bar `employee` from this department.
    /// Returns false when the exclusion was already recorded.
    pub fn exclude(&self, employee: &mut Employee) -> bool {
        employee.exclude(self.id)
    }

    pub fn reset_cycle_counters(&mut self) {
        self.movement = MovementCounter::default();
    }

    pub(crate) fn mark_vacated(&mut self, employee: EmployeeId) {
        self.recently_vacated.insert(employee);
    }

    pub(crate) fn forget_vacated(&mut self, employee: EmployeeId) {
        self.recently_vacated.remove(&employee);
    }
}
