//! One rotation cycle.
//!
//! PASS ORDER (fixed, never reordered):
//!   1. Reset        : movement counters and change markers cleared.
//!   2. Removal      : employees past their duration leave, unless a
//!                    pre-removal rule holds them.
//!   3. Assignment   : each employee, in list order, is matched against
//!                    the department list swept ASSIGNMENT_SWEEPS times.
//!   4. Finalization : Finished transitions, recently-vacated sets.
//!
//! Input list order is the priority order for contested seats on both
//! axes. The caller advances the clock before invoking a cycle.
//!
//! DepartmentFull, NotMember and NotAssigned mean a precondition check was
//! skipped here. They propagate to the caller and are never retried.

use crate::{
    clock::SimClock,
    employee::{EmployeeStatus, StatusChange},
    error::SimResult,
    event::RotationEvent,
    population::Population,
    rule::{RuleCategory, RulePosition},
    rule_engine::RuleEngine,
    types::{DepartmentId, EmployeeId},
};

/// Number of times the department list is swept per employee during the
/// assignment pass.
///
/// Employees are the outer loop, so by the time the second sweep starts the
/// only state that changed is the current employee's own: a seat taken or an
/// exclusion recorded. Neither can open a department the first sweep
/// skipped, so the second sweep never changes the outcome. It is kept so the
/// pass matches the historical planning output step for step.
pub const ASSIGNMENT_SWEEPS: usize = 2;

pub fn run_cycle(
    population: &mut Population,
    rules: &RuleEngine,
    clock: &SimClock,
) -> SimResult<Vec<RotationEvent>> {
    let mut events = Vec::new();
    reset_pass(population);
    removal_pass(population, rules, clock, &mut events)?;
    assignment_pass(population, rules, clock, ASSIGNMENT_SWEEPS, &mut events)?;
    finalization_pass(population, clock, &mut events)?;
    Ok(events)
}

fn reset_pass(population: &mut Population) {
    for department in population.departments_mut() {
        department.reset_cycle_counters();
    }
    for employee in population.employees_mut() {
        employee.clear_changed();
    }
}

fn removal_pass(
    population: &mut Population,
    rules: &RuleEngine,
    clock: &SimClock,
    events: &mut Vec<RotationEvent>,
) -> SimResult<()> {
    let ids: Vec<EmployeeId> = population.employee_ids().collect();
    for employee_id in ids {
        if !population.employee(employee_id).has_department() {
            continue;
        }
        let Some(department_id) = population.employee(employee_id).current_department() else {
            continue;
        };
        let (employee, department) = population.pair_mut(employee_id, department_id);

        if let Some(rule) =
            rules.first_firing(employee, department, RuleCategory::Operation, RulePosition::Pre)
        {
            if employee.has_completed_training(department, clock)? {
                log::debug!("{}: holding {} ({rule})", department.name, employee.full_name());
                events.push(RotationEvent::RemovalDeferred {
                    employee: employee_id,
                    department: department_id,
                    rule: rule.to_string(),
                });
            }
            continue;
        }

        if employee.has_completed_training(department, clock)? {
            department.remove(employee, clock)?;
            events.push(RotationEvent::Removed {
                employee: employee_id,
                department: department_id,
            });
        }
    }
    Ok(())
}

fn assignment_pass(
    population: &mut Population,
    rules: &RuleEngine,
    clock: &SimClock,
    sweeps: usize,
    events: &mut Vec<RotationEvent>,
) -> SimResult<()> {
    let employee_ids: Vec<EmployeeId> = population.employee_ids().collect();
    let department_ids: Vec<DepartmentId> = population.department_ids().collect();

    for employee_id in employee_ids {
        if population.employee(employee_id).is_finished() {
            continue;
        }
        let sweep = department_ids.iter().cycle().take(department_ids.len() * sweeps);
        for &department_id in sweep {
            let (employee, department) = population.pair_mut(employee_id, department_id);
            if !department.has_capacity() {
                continue;
            }
            if let Some(rule) =
                rules.first_firing(employee, department, RuleCategory::Exclusion, RulePosition::Post)
            {
                if department.exclude(employee) {
                    log::debug!("{}: excluding {} ({rule})", department.name, employee.full_name());
                    events.push(RotationEvent::Excluded {
                        employee: employee_id,
                        department: department_id,
                        rule: rule.to_string(),
                    });
                }
                continue;
            }
            if employee.is_excluded_from(department_id) {
                continue;
            }
            if rules.check(employee, department, RuleCategory::Operation, RulePosition::Post) {
                continue;
            }
            if !employee.has_department() {
                department.assign(employee, clock, None)?;
                events.push(RotationEvent::Assigned {
                    employee: employee_id,
                    department: department_id,
                });
            }
        }
    }
    Ok(())
}

fn finalization_pass(
    population: &mut Population,
    clock: &SimClock,
    events: &mut Vec<RotationEvent>,
) -> SimResult<()> {
    let total = population.department_count();
    let ids: Vec<EmployeeId> = population.employee_ids().collect();

    for employee_id in ids {
        let employee = population.employee_mut(employee_id);
        if employee.status() == EmployeeStatus::WaitingReassignment
            && employee.settled_department_count() == total
        {
            employee.transition(StatusChange::Finish, clock.now())?;
            log::debug!("{} finished training", employee.full_name());
            events.push(RotationEvent::Finished { employee: employee_id });
        }

        let employee = population.employee(employee_id);
        let assigned = employee.has_department();
        let last = employee.last_department();
        for department in population.departments_mut() {
            if !assigned && last == Some(department.id) {
                department.mark_vacated(employee_id);
            } else {
                department.forget_vacated(employee_id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        population::{DepartmentRecord, EmployeeRecord},
        rule::RuleSpec,
        types::Gender,
    };
    use chrono::{TimeZone, Utc};

    fn clock() -> SimClock {
        SimClock::starting_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    fn dept(name: &str, duration_months: u32, capacity: usize) -> DepartmentRecord {
        DepartmentRecord { name: name.into(), duration_months, max_capacity: capacity }
    }

    fn emp(first: &str, department: Option<&str>, clock: &SimClock) -> EmployeeRecord {
        EmployeeRecord {
            first_name: first.into(),
            last_name: "BEGHOURA".into(),
            gender: Gender::Male,
            start_date: Some(clock.now()),
            initial_department: department.map(str::to_string),
        }
    }

    fn no_repeat() -> RuleEngine {
        RuleEngine::from_specs(&[RuleSpec::named("no-repeat-department")]).unwrap()
    }

    #[test]
    fn employee_not_due_stays_put() {
        let mut clock = clock();
        let mut p = Population::seed(
            &[dept("Achat Etranger", 6, 3), dept("Imports", 6, 1)],
            &[emp("CHOUAIB", Some("Achat Etranger"), &clock)],
            &clock,
        )
        .unwrap();
        clock.advance(1.0);

        let events = run_cycle(&mut p, &no_repeat(), &clock).unwrap();

        assert!(events.is_empty());
        assert_eq!(p.employee(EmployeeId(0)).current_department(), Some(DepartmentId(0)));
        assert!(!p.employee(EmployeeId(0)).changed());
    }

    #[test]
    fn due_employee_moves_to_next_open_department() {
        let mut clock = clock();
        let mut p = Population::seed(
            &[dept("Achat Etranger", 6, 3), dept("Imports", 6, 1)],
            &[emp("CHOUAIB", Some("Achat Etranger"), &clock)],
            &clock,
        )
        .unwrap();
        clock.advance(6.0);

        let events = run_cycle(&mut p, &no_repeat(), &clock).unwrap();

        assert_eq!(
            events,
            vec![
                RotationEvent::Removed { employee: EmployeeId(0), department: DepartmentId(0) },
                RotationEvent::Assigned { employee: EmployeeId(0), department: DepartmentId(1) },
            ]
        );
        assert!(p.employee(EmployeeId(0)).changed());
        assert!(p.department(DepartmentId(0)).movement().has_movement());
    }

    #[test]
    fn earlier_employee_wins_contested_seat() {
        let mut clock = clock();
        let mut p = Population::seed(
            &[dept("Achat Etranger", 6, 3), dept("Imports", 6, 1)],
            &[
                emp("CHOUAIB", Some("Achat Etranger"), &clock),
                emp("SIHAM", Some("Imports"), &clock),
                emp("HAMID", Some("Achat Etranger"), &clock),
            ],
            &clock,
        )
        .unwrap();
        clock.advance(7.0);

        run_cycle(&mut p, &no_repeat(), &clock).unwrap();

        assert_eq!(p.employee(EmployeeId(1)).current_department(), Some(DepartmentId(0)));
        assert_eq!(p.employee(EmployeeId(0)).current_department(), Some(DepartmentId(1)));
        assert_eq!(p.employee(EmployeeId(2)).current_department(), None);
        assert_eq!(p.employee(EmployeeId(2)).status(), EmployeeStatus::WaitingReassignment);
    }

    #[test]
    fn mixed_durations_only_release_due_employees() {
        let mut clock = clock();
        let mut p = Population::seed(
            &[dept("Achat Etranger", 6, 3), dept("Imports", 36, 1)],
            &[
                emp("CHOUAIB", Some("Achat Etranger"), &clock),
                emp("SIHAM", Some("Imports"), &clock),
                emp("HAMID", Some("Achat Etranger"), &clock),
            ],
            &clock,
        )
        .unwrap();
        clock.advance(12.0);

        run_cycle(&mut p, &no_repeat(), &clock).unwrap();

        assert_eq!(p.employee(EmployeeId(1)).current_department(), Some(DepartmentId(1)));
        assert_eq!(p.employee(EmployeeId(0)).current_department(), None);
        assert_eq!(p.employee(EmployeeId(2)).current_department(), None);
    }

    #[test]
    fn vacated_set_tracks_waiting_leavers() {
        let mut clock = clock();
        let mut p = Population::seed(
            &[dept("Imports", 1, 1), dept("Finance", 12, 1)],
            &[emp("A", Some("Imports"), &clock), emp("B", Some("Finance"), &clock)],
            &clock,
        )
        .unwrap();

        clock.advance(1.0);
        run_cycle(&mut p, &no_repeat(), &clock).unwrap();
        assert!(!p.employee(EmployeeId(0)).has_department());
        assert!(p.department(DepartmentId(0)).recently_vacated().contains(&EmployeeId(0)));

        clock.advance(12.0);
        run_cycle(&mut p, &no_repeat(), &clock).unwrap();
        assert_eq!(p.employee(EmployeeId(0)).current_department(), Some(DepartmentId(1)));
        assert_eq!(p.employee(EmployeeId(1)).current_department(), Some(DepartmentId(0)));
        assert!(p.department(DepartmentId(0)).recently_vacated().is_empty());
        assert!(p.department(DepartmentId(1)).recently_vacated().is_empty());
    }

    #[test]
    fn second_sweep_never_changes_the_outcome() {
        let mut clock = clock();
        let rules = RuleEngine::from_specs(&[
            RuleSpec::named("no-repeat-department"),
            RuleSpec::with_params("gender-exclusion", serde_json::json!({"department": "Imports"})).unwrap(),
            RuleSpec::with_params("max-admissions-per-cycle", serde_json::json!({"limit": 1})).unwrap(),
        ])
        .unwrap();
        let mut siham = emp("SIHAM", Some("Finance"), &clock);
        siham.gender = Gender::Female;
        let seeded = Population::seed(
            &[dept("Imports", 6, 1), dept("Finance", 1, 2), dept("Achat Etranger", 6, 2)],
            &[
                siham,
                emp("CHOUAIB", Some("Finance"), &clock),
                emp("HAMID", None, &clock),
                emp("KARIM", Some("Imports"), &clock),
            ],
            &clock,
        )
        .unwrap();
        clock.advance(1.0);

        let mut outcomes = Vec::new();
        for sweeps in [1, ASSIGNMENT_SWEEPS] {
            let mut p = seeded.clone();
            let mut events = Vec::new();
            reset_pass(&mut p);
            removal_pass(&mut p, &rules, &clock, &mut events).unwrap();
            assignment_pass(&mut p, &rules, &clock, sweeps, &mut events).unwrap();
            let state = serde_json::to_string(&p).unwrap();
            outcomes.push((events, state));
        }

        assert!(!outcomes[0].0.is_empty(), "the cycle should move people");
        assert_eq!(outcomes[0], outcomes[1], "extra sweep changed the assignment result");
    }
}
