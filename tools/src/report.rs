//! Plain-text rotation plan.
//!
//! One block per recorded state: departments that moved this cycle
//! (smallest capacity first), then every employee whose status changed,
//! then a status summary and a separator. A state with no department
//! movement contributes only its employee lines.
//!
//! People are listed surname first ("Nom Prénom"), as in the roster export.

use chrono::{DateTime, Utc};
use rotation_core::{
    employee::{Employee, EmployeeStatus},
    population::Population,
};

const LABEL_WIDTH: usize = 30;
const DEPARTMENT_WIDTH: usize = 16;
const SEPARATOR_UNIT: &str = "-----";

#[derive(Debug, Default)]
pub struct PlanReport {
    lines: Vec<String>,
}

impl PlanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the block for the current state. The initial state is
    /// recorded without employee lines.
    pub fn record(&mut self, population: &Population, now: DateTime<Utc>, include_employees: bool) {
        let departments = department_lines(population, now);
        let moved = !departments.is_empty();
        self.lines.extend(departments);
        if include_employees {
            self.lines.extend(employee_lines(population));
        }
        if moved {
            let s = population.summary();
            self.lines.push(String::new());
            self.lines.push(format!(
                "{:>LABEL_WIDTH$}: {} Waiting /  {} Assigned / {} Finished",
                "Employees summary", s.waiting, s.assigned, s.finished
            ));
            self.lines.push(String::new());
            self.lines.push(SEPARATOR_UNIT.repeat(20));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Final text: consecutive blank lines collapsed and a blank line
    /// inserted before each run of employee lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&str> = None;
        for line in &self.lines {
            let line = line.as_str();
            if let Some(p) = prev {
                if line.is_empty() && p.is_empty() {
                    continue;
                }
                if !p.is_empty() && !p.starts_with("  ") && line.starts_with("  ") {
                    out.push('\n');
                }
            }
            out.push_str(line);
            out.push('\n');
            prev = Some(line);
        }
        out
    }
}

fn department_lines(population: &Population, now: DateTime<Utc>) -> Vec<String> {
    let mut departments: Vec<_> = population.departments().iter().collect();
    departments.sort_by_key(|d| d.max_capacity);

    departments
        .into_iter()
        .filter(|d| d.movement().has_movement())
        .map(|d| {
            let mut names: Vec<String> = d
                .roster()
                .iter()
                .map(|id| plan_name(population.employee(*id)))
                .collect();
            names.sort();
            let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
            format!(
                "{} {:>DEPARTMENT_WIDTH$} ({}/{}): [{}] ({}-/{}+)",
                now.format("%Y-%m"),
                d.name,
                d.occupancy(),
                d.max_capacity,
                quoted.join(", "),
                d.movement().departures,
                d.movement().admissions
            )
        })
        .collect()
}

fn employee_lines(population: &Population) -> Vec<String> {
    population
        .employees()
        .iter()
        .filter(|e| e.changed())
        .map(|e| {
            let (indicator, target) = movement_target(population, e);
            format!(
                "{:>LABEL_WIDTH$}: {:.<LABEL_WIDTH$} {indicator} {target}",
                e.status().label(),
                plan_name(e)
            )
        })
        .collect()
}

fn plan_name(employee: &Employee) -> String {
    format!("{} {}", employee.last_name, employee.first_name)
}

fn movement_target(population: &Population, employee: &Employee) -> (&'static str, String) {
    let name_of = |id| population.department(id).name.clone();
    match employee.status() {
        EmployeeStatus::Assigned => ("->", employee.current_department().map(name_of).unwrap_or_default()),
        EmployeeStatus::WaitingReassignment => ("<-", employee.last_department().map(name_of).unwrap_or_default()),
        EmployeeStatus::Finished => ("**", "Finished".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rotation_core::{
        clock::SimClock,
        config::SimConfig,
        engine::SimEngine,
        population::{DepartmentRecord, EmployeeRecord},
        types::Gender,
    };

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn engine() -> SimEngine {
        let departments = vec![
            DepartmentRecord { name: "Finance".into(), duration_months: 1, max_capacity: 2 },
            DepartmentRecord { name: "Imports".into(), duration_months: 6, max_capacity: 1 },
        ];
        let employees = vec![EmployeeRecord {
            first_name: "CHOUAIB".into(),
            last_name: "BEGHOURA".into(),
            gender: Gender::Male,
            start_date: Some(anchor()),
            initial_department: Some("Finance".into()),
        }];
        SimEngine::build("report-test".into(), SimConfig::default_test(), &departments, &employees, SimClock::starting_at(anchor()))
            .unwrap()
    }

    #[test]
    fn initial_state_lists_seeded_departments_only() {
        let engine = engine();
        let mut plan = PlanReport::new();
        plan.record(&engine.population, engine.clock.now(), false);

        let text = plan.render();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "2025-01          Finance (1/2): ['BEGHOURA CHOUAIB'] (0-/1+)");
        assert!(!text.contains("Imports"), "unchanged department should be omitted");
        assert!(text.contains("Employees summary: 0 Waiting /  1 Assigned / 0 Finished"));
    }

    #[test]
    fn cycle_block_lists_moves_and_changed_employees() {
        let mut engine = engine();
        let mut plan = PlanReport::new();
        let now = engine.cycle().unwrap().now;
        plan.record(&engine.population, now, true);

        let text = plan.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2025-01          Imports (1/1): ['BEGHOURA CHOUAIB'] (0-/1+)");
        assert_eq!(lines[1], "2025-01          Finance (0/2): [] (1-/0+)");
        assert_eq!(lines[2], "", "blank line before employee lines");
        assert_eq!(
            lines[3],
            format!("{:>30}: {:.<30} -> Imports", "Assigned", "BEGHOURA CHOUAIB")
        );
        assert!(lines.contains(&"-".repeat(100).as_str()));
    }

    #[test]
    fn finished_employee_line() {
        let mut engine = engine();
        engine.run_cycles(6).unwrap();
        let mut plan = PlanReport::new();
        let now = engine.cycle().unwrap().now;
        plan.record(&engine.population, now, true);

        let text = plan.render();
        let expected = format!("{:>30}: {:.<30} ** Finished", "Training Completed", "BEGHOURA CHOUAIB");
        assert!(text.contains(&expected), "got:\n{text}");
    }

    #[test]
    fn rosters_sort_by_surname_first() {
        let departments = vec![DepartmentRecord { name: "Finance".into(), duration_months: 6, max_capacity: 2 }];
        let person = |first: &str, last: &str| EmployeeRecord {
            first_name: first.into(),
            last_name: last.into(),
            gender: Gender::Female,
            start_date: Some(anchor()),
            initial_department: Some("Finance".into()),
        };
        let employees = vec![person("AMINA", "ZERROUKI"), person("YASMINE", "BENALI")];
        let engine = SimEngine::build("report-test".into(), SimConfig::default_test(), &departments, &employees, SimClock::starting_at(anchor()))
            .unwrap();

        let mut plan = PlanReport::new();
        plan.record(&engine.population, engine.clock.now(), false);

        let first = plan.render().lines().next().unwrap().to_string();
        assert!(first.ends_with("(2/2): ['BENALI YASMINE', 'ZERROUKI AMINA'] (0-/2+)"), "got: {first}");
    }

    #[test]
    fn consecutive_blank_lines_collapse() {
        let plan = PlanReport {
            lines: vec!["a".into(), String::new(), String::new(), "b".into()],
        };
        assert_eq!(plan.render(), "a\n\nb\n");
    }
}
