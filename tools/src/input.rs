//! CSV roster decoding.
//!
//! Expected header (one row per employee):
//!   Nom, Prénom, Sexe, Date Recrutement, Section, Durée Par section
//!
//! Departments are derived from the `Section` column in first-appearance
//! order. Capacity is the number of rows naming the section, duration the
//! largest `Durée Par section` among them. A blank `Section` means the
//! employee starts without a seat.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rotation_core::{
    population::{DepartmentRecord, EmployeeRecord},
    types::Gender,
};
use std::io::Read;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

const COL_LAST_NAME:  &str = "Nom";
const COL_FIRST_NAME: &str = "Prénom";
const COL_GENDER:     &str = "Sexe";
const COL_START_DATE: &str = "Date Recrutement";
const COL_SECTION:    &str = "Section";
const COL_DURATION:   &str = "Durée Par section";

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub departments: Vec<DepartmentRecord>,
    pub employees:   Vec<EmployeeRecord>,
}

/// Column positions resolved from the header row.
struct Columns {
    last_name:  usize,
    first_name: usize,
    gender:     usize,
    start_date: usize,
    section:    usize,
    duration:   usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| anyhow!("missing column '{name}'"))
        };
        Ok(Self {
            last_name:  find(COL_LAST_NAME)?,
            first_name: find(COL_FIRST_NAME)?,
            gender:     find(COL_GENDER)?,
            start_date: find(COL_START_DATE)?,
            section:    find(COL_SECTION)?,
            duration:   find(COL_DURATION)?,
        })
    }
}

pub fn load_roster(path: &str, date_format: &str) -> Result<Roster> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Cannot open {path}"))?;
    let roster = read_roster(reader, date_format).with_context(|| format!("Cannot decode {path}"))?;
    log::info!(
        "input: {path}: {} departments, {} employees",
        roster.departments.len(),
        roster.employees.len()
    );
    Ok(roster)
}

pub fn read_roster<R: Read>(mut reader: csv::Reader<R>, date_format: &str) -> Result<Roster> {
    let columns = Columns::locate(reader.headers()?)?;
    let mut roster = Roster::default();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_number = row_idx + 2; // 1-based, header skipped

        let section = get_string_field(&record, columns.section);
        if let Some(name) = &section {
            let duration = get_months_field(&record, columns.duration)
                .with_context(|| format!("row {row_number}: invalid '{COL_DURATION}'"))?;
            match roster.departments.iter_mut().find(|d| &d.name == name) {
                Some(dept) => {
                    dept.duration_months = dept.duration_months.max(duration);
                    dept.max_capacity += 1;
                }
                None => roster.departments.push(DepartmentRecord {
                    name: name.clone(),
                    duration_months: duration,
                    max_capacity: 1,
                }),
            }
        }

        let gender = get_string_field(&record, columns.gender)
            .with_context(|| format!("row {row_number}: missing '{COL_GENDER}'"))?
            .parse::<Gender>()
            .map_err(|e| anyhow!("row {row_number}: {e}"))?;
        let start_date = match get_string_field(&record, columns.start_date) {
            None => None,
            Some(raw) => Some(
                parse_date(&raw, date_format)
                    .with_context(|| format!("row {row_number}: cannot read date '{raw}' as {date_format}"))?,
            ),
        };

        roster.employees.push(EmployeeRecord {
            first_name: get_string_field(&record, columns.first_name).unwrap_or_default(),
            last_name: get_string_field(&record, columns.last_name).unwrap_or_default(),
            gender,
            start_date,
            initial_department: section,
        });
    }
    Ok(roster)
}

fn get_string_field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Leading integer of the field, e.g. "6" or "12 mois".
fn get_months_field(record: &csv::StringRecord, index: usize) -> Option<u32> {
    let raw = record.get(index)?.trim();
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok()
}

/// Accepts date-only or date-time formats; date-only values start at midnight UTC.
fn parse_date(raw: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Nom,Prénom,Sexe,Date Recrutement,Section,Durée Par section
BEGHOURA,CHOUAIB,M,01/15/2025,Achat Etranger,6
BENALI,SIHAM,F,02/01/2025,Imports,12
HADDAD,HAMID,M,03/10/2025,Achat Etranger,6
SAADI,AMINA,F,,,
";

    fn read(data: &str) -> Result<Roster> {
        let reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
        read_roster(reader, DEFAULT_DATE_FORMAT)
    }

    #[test]
    fn departments_grouped_in_first_appearance_order() {
        let roster = read(SAMPLE).unwrap();
        let names: Vec<_> = roster.departments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Achat Etranger", "Imports"]);
        assert_eq!(roster.departments[0].max_capacity, 2);
        assert_eq!(roster.departments[0].duration_months, 6);
        assert_eq!(roster.departments[1].duration_months, 12);
    }

    #[test]
    fn employee_fields_decoded() {
        let roster = read(SAMPLE).unwrap();
        assert_eq!(roster.employees.len(), 4);

        let siham = &roster.employees[1];
        assert_eq!(siham.first_name, "SIHAM");
        assert_eq!(siham.last_name, "BENALI");
        assert_eq!(siham.gender, Gender::Female);
        assert_eq!(siham.initial_department.as_deref(), Some("Imports"));
        assert_eq!(siham.start_date, Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()));

        let amina = &roster.employees[3];
        assert!(amina.initial_department.is_none(), "blank section means waiting");
        assert!(amina.start_date.is_none());
    }

    #[test]
    fn largest_duration_wins_within_a_section() {
        let data = "\
Nom,Prénom,Sexe,Date Recrutement,Section,Durée Par section
A,B,M,01/01/2025,Finance,6
C,D,F,01/01/2025,Finance,12 mois
";
        let roster = read(data).unwrap();
        assert_eq!(roster.departments[0].duration_months, 12);
        assert_eq!(roster.departments[0].max_capacity, 2);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read("Nom,Prénom,Section\nA,B,C\n").unwrap_err();
        assert!(err.to_string().contains("Sexe"), "got: {err}");
    }

    #[test]
    fn bad_date_names_the_row() {
        let data = "\
Nom,Prénom,Sexe,Date Recrutement,Section,Durée Par section
A,B,M,2025-01-01,Finance,6
";
        let err = read(data).unwrap_err();
        assert!(err.to_string().contains("row 2"), "got: {err}");
    }

    #[test]
    fn alternative_date_format() {
        let data = "\
Nom,Prénom,Sexe,Date Recrutement,Section,Durée Par section
A,B,M,15/01/2025,Finance,6
";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let roster = read_roster(reader, "%d/%m/%Y").unwrap();
        assert_eq!(
            roster.employees[0].start_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
        );
    }
}
