//! The two owned collections (employees and departments) and seeding
//! them from decoded input rows.
//!
//! Entities refer to each other by id only. The orchestrator borrows one
//! employee and one department at a time through `pair_mut()`.

use crate::{
    clock::SimClock,
    department::TrainingDepartment,
    employee::{Employee, EmployeeStatus},
    error::{SimError, SimResult},
    types::{DepartmentId, EmployeeId, Gender},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded department row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub name:            String,
    pub duration_months: u32,
    pub max_capacity:    usize,
}

/// One decoded employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub first_name: String,
    pub last_name:  String,
    pub gender:     Gender,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub initial_department: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub waiting:  usize,
    pub assigned: usize,
    pub finished: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    employees:   Vec<Employee>,
    departments: Vec<TrainingDepartment>,
}

impl Population {
    /// Build departments in input order. Names must be unique.
    pub fn with_departments(records: &[DepartmentRecord]) -> SimResult<Self> {
        let mut departments: Vec<TrainingDepartment> = Vec::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if departments.iter().any(|d| d.name == r.name) {
                return Err(SimError::DuplicateDepartment { name: r.name.clone() });
            }
            departments.push(TrainingDepartment::new(
                DepartmentId(i),
                &r.name,
                r.duration_months,
                r.max_capacity,
            ));
        }
        Ok(Self {
            employees: Vec::new(),
            departments,
        })
    }

    /// Departments plus employees, seated where the input says and
    /// a seat is free.
    pub fn seed(
        departments: &[DepartmentRecord],
        employees: &[EmployeeRecord],
        clock: &SimClock,
    ) -> SimResult<Self> {
        let mut population = Self::with_departments(departments)?;
        for record in employees {
            population.add_employee(record, clock)?;
        }
        let summary = population.summary();
        log::info!(
            "population: {} departments, {} employees ({} assigned, {} waiting)",
            population.departments.len(),
            population.employees.len(),
            summary.assigned,
            summary.waiting
        );
        Ok(population)
    }

    /// Append one employee. Seated with their original start date when the
    /// named department has room, otherwise left waiting.
    pub fn add_employee(&mut self, record: &EmployeeRecord, clock: &SimClock) -> SimResult<EmployeeId> {
        let id = EmployeeId(self.employees.len());
        let mut employee = Employee::new(id, &record.first_name, &record.last_name, record.gender);

        let target = match record.initial_department.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                self.department_by_name(name)
                    .map(|d| d.id)
                    .ok_or_else(|| SimError::UnknownDepartment { name: name.to_string() })?,
            ),
        };

        if let Some(dept_id) = target {
            let department = &mut self.departments[dept_id.0];
            if department.has_capacity() {
                department.assign(&mut employee, clock, record.start_date)?;
            } else {
                log::warn!(
                    "population: {} listed in full department {}; waiting for a seat",
                    employee.full_name(),
                    department.name
                );
            }
        }
        self.employees.push(employee);
        Ok(id)
    }

    pub fn employees(&self) -> &[Employee] { &self.employees }
    pub fn departments(&self) -> &[TrainingDepartment] { &self.departments }

    pub fn employee(&self, id: EmployeeId) -> &Employee {
        &self.employees[id.0]
    }

    pub fn department(&self, id: DepartmentId) -> &TrainingDepartment {
        &self.departments[id.0]
    }

    pub fn department_by_name(&self, name: &str) -> Option<&TrainingDepartment> {
        self.departments.iter().find(|d| d.name == name)
    }

    pub fn employee_by_name(&self, full_name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.full_name() == full_name)
    }

    pub fn employee_ids(&self) -> impl Iterator<Item = EmployeeId> {
        (0..self.employees.len()).map(EmployeeId)
    }

    pub fn department_ids(&self) -> impl Iterator<Item = DepartmentId> {
        (0..self.departments.len()).map(DepartmentId)
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    /// Mutable access to one employee and one department at once.
    pub fn pair_mut(
        &mut self,
        employee: EmployeeId,
        department: DepartmentId,
    ) -> (&mut Employee, &mut TrainingDepartment) {
        (&mut self.employees[employee.0], &mut self.departments[department.0])
    }

    pub(crate) fn employee_mut(&mut self, id: EmployeeId) -> &mut Employee {
        &mut self.employees[id.0]
    }

    pub(crate) fn departments_mut(&mut self) -> &mut [TrainingDepartment] {
        &mut self.departments
    }

    pub(crate) fn employees_mut(&mut self) -> &mut [Employee] {
        &mut self.employees
    }

    pub fn summary(&self) -> StatusSummary {
        self.employees
            .iter()
            .fold(StatusSummary::default(), |mut s, e| {
                match e.status() {
                    EmployeeStatus::Assigned            => s.assigned += 1,
                    EmployeeStatus::WaitingReassignment => s.waiting += 1,
                    EmployeeStatus::Finished            => s.finished += 1,
                }
                s
            })
    }
}
