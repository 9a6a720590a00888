//! Deterministic synthetic rosters for demos and invariant tests.
//!
//! Mirrors the shape of real input: every department starts exactly full
//! (capacity equals the number of people listed in it), start dates are
//! spread across the current training period, and an optional pool of
//! employees starts without a seat.

use crate::{
    population::{DepartmentRecord, EmployeeRecord},
    rng::{RngStream, SimRng},
    types::{Gender, DAYS_PER_MONTH},
};
use chrono::{DateTime, Duration, Utc};

const DEPARTMENT_NAMES: &[&str] = &[
    "Achat Etranger", "Achats Local", "Finance", "Imports", "Immobilisations",
    "Comptabilite", "Tresorerie", "Controle de Gestion", "Audit Interne",
    "Fiscalite", "Paie", "Logistique",
];

const FIRST_NAMES_F: &[&str] = &[
    "Siham", "Amina", "Yasmine", "Nadia", "Karima", "Leila", "Sarah", "Ines",
    "Meriem", "Samira", "Lina", "Houda",
];

const FIRST_NAMES_M: &[&str] = &[
    "Chouaib", "Hamid", "Karim", "Yacine", "Mehdi", "Sofiane", "Nabil", "Amine",
    "Rachid", "Walid", "Farid", "Omar",
];

const LAST_NAMES: &[&str] = &[
    "Beghoura", "Benali", "Haddad", "Mansouri", "Belkacem", "Saadi", "Brahimi",
    "Zerrouki", "Bouzid", "Cherif", "Khelifi", "Hamidi", "Mebarki", "Touati",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticParams {
    /// At most DEPARTMENT_NAMES.len() departments are generated.
    pub department_count: usize,
    pub max_capacity:     u64,
    pub waiting_pool:     usize,
    pub female_share:     f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            department_count: 6,
            max_capacity:     4,
            waiting_pool:     2,
            female_share:     0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRoster {
    pub departments: Vec<DepartmentRecord>,
    pub employees:   Vec<EmployeeRecord>,
}

impl SyntheticRoster {
    /// Generate a roster. Same seed, params and `as_of` give the same roster.
    pub fn generate(seed: u64, params: SyntheticParams, as_of: DateTime<Utc>) -> Self {
        let mut dept_rng = RngStream::Departments.rng(seed);
        let mut emp_rng = RngStream::Employees.rng(seed);

        let count = params.department_count.min(DEPARTMENT_NAMES.len());
        let departments: Vec<DepartmentRecord> = DEPARTMENT_NAMES[..count]
            .iter()
            .map(|name| DepartmentRecord {
                name: (*name).to_string(),
                duration_months: if dept_rng.chance(0.3) { 12 } else { 6 },
                max_capacity: dept_rng.next_in_range(1, params.max_capacity.max(1)) as usize,
            })
            .collect();

        let mut employees = Vec::new();
        for dept in &departments {
            let period_days = i64::from(dept.duration_months) * DAYS_PER_MONTH;
            for _ in 0..dept.max_capacity {
                let days_in = emp_rng.next_u64_below(period_days as u64) as i64;
                let mut record = random_employee(&mut emp_rng, params.female_share);
                record.start_date = Some(as_of - Duration::days(days_in));
                record.initial_department = Some(dept.name.clone());
                employees.push(record);
            }
        }
        for _ in 0..params.waiting_pool {
            employees.push(random_employee(&mut emp_rng, params.female_share));
        }

        log::debug!(
            "synthetic: seed={seed} {} departments, {} employees",
            departments.len(),
            employees.len()
        );
        Self { departments, employees }
    }
}

fn random_employee(rng: &mut SimRng, female_share: f64) -> EmployeeRecord {
    let gender = if rng.chance(female_share) { Gender::Female } else { Gender::Male };
    let first = match gender {
        Gender::Female => rng.pick(FIRST_NAMES_F),
        Gender::Male   => rng.pick(FIRST_NAMES_M),
    };
    EmployeeRecord {
        first_name: (*first).to_string(),
        last_name: (*rng.pick(LAST_NAMES)).to_string(),
        gender,
        start_date: None,
        initial_department: None,
    }
}
