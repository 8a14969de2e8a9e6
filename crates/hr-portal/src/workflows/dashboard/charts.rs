//! Chart aggregates over the employee roster and job postings.
//!
//! Groups keep the order in which their first member appears.

use std::collections::BTreeMap;

use super::views::{
    DashboardTotals, EmployeeSkillBar, PositionHeadcount, PositionSkills, SalarySlice,
};
use crate::workflows::employees::Employee;
use crate::workflows::jobs::JobPosting;

const UNKNOWN: &str = "Unknown";
const UNNAMED: &str = "Unnamed";

fn or_label(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Index of `key` in an insertion-ordered group list, appending a fresh group when absent.
fn group_index<T>(groups: &mut Vec<(String, T)>, key: String, init: impl FnOnce() -> T) -> usize {
    match groups.iter().position(|(existing, _)| *existing == key) {
        Some(index) => index,
        None => {
            groups.push((key, init()));
            groups.len() - 1
        }
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn totals(employees: &[Employee], jobs: &[JobPosting]) -> DashboardTotals {
    DashboardTotals {
        employees: employees.len(),
        payroll: employees.iter().map(|employee| employee.salary_grade).sum(),
        jobs: jobs.len(),
        vacancies: jobs.iter().map(|job| u64::from(job.vacancies)).sum(),
        applications: jobs.iter().map(|job| job.applicants.len()).sum(),
    }
}

pub fn salary_by_gender(employees: &[Employee]) -> Vec<SalarySlice> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for employee in employees {
        let index = group_index(&mut groups, or_label(&employee.gender, UNKNOWN), || 0.0);
        groups[index].1 += employee.salary_grade;
    }
    groups
        .into_iter()
        .map(|(name, value)| SalarySlice { name, value })
        .collect()
}

pub fn headcount_by_position(employees: &[Employee]) -> Vec<PositionHeadcount> {
    let mut groups: Vec<(String, BTreeMap<String, u32>)> = Vec::new();
    for employee in employees {
        let index = group_index(
            &mut groups,
            or_label(&employee.position, UNKNOWN),
            BTreeMap::new,
        );
        *groups[index]
            .1
            .entry(or_label(&employee.gender, UNKNOWN))
            .or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|(position, by_gender)| PositionHeadcount {
            position,
            by_gender,
        })
        .collect()
}

/// Employees without a recorded percentage count as 0.
pub fn skills_by_position(employees: &[Employee]) -> Vec<PositionSkills> {
    let mut groups: Vec<(String, (f64, u32))> = Vec::new();
    for employee in employees {
        let index = group_index(
            &mut groups,
            or_label(&employee.position, UNKNOWN),
            || (0.0, 0),
        );
        let (total, count) = &mut groups[index].1;
        *total += employee.skills_percentage.unwrap_or_default();
        *count += 1;
    }
    groups
        .into_iter()
        .map(|(position, (total, count))| PositionSkills {
            position,
            skills_percentage: if count == 0 {
                0.0
            } else {
                one_decimal(total / f64::from(count))
            },
        })
        .collect()
}

pub fn skills_per_employee(employees: &[Employee]) -> Vec<EmployeeSkillBar> {
    let mut groups: Vec<(String, Vec<&Employee>)> = Vec::new();
    for employee in employees {
        let index = group_index(
            &mut groups,
            or_label(&employee.position, UNKNOWN),
            Vec::new,
        );
        groups[index].1.push(employee);
    }

    groups
        .into_iter()
        .flat_map(|(position, members)| {
            let group_label = format!("{position} ({})", members.len());
            members.into_iter().map(move |employee| EmployeeSkillBar {
                name: or_label(&employee.name, UNNAMED),
                position: position.clone(),
                skills_percentage: employee.skills_percentage.unwrap_or_default(),
                group_label: group_label.clone(),
            })
        })
        .collect()
}
