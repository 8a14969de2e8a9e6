use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub employees: usize,
    /// Sum of salary grades.
    pub payroll: f64,
    pub jobs: usize,
    pub vacancies: u64,
    pub applications: usize,
}

/// Pie slice: total salary per gender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHeadcount {
    pub position: String,
    pub by_gender: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSkills {
    pub position: String,
    /// Mean skills percentage, one decimal.
    pub skills_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSkillBar {
    pub name: String,
    pub position: String,
    pub skills_percentage: f64,
    /// `"<position> (<employees in position>)"`.
    pub group_label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub totals: DashboardTotals,
    pub salary_by_gender: Vec<SalarySlice>,
    pub headcount_by_position: Vec<PositionHeadcount>,
    pub skills_by_position: Vec<PositionSkills>,
    pub skills_per_employee: Vec<EmployeeSkillBar>,
    /// Section name to load failure; failed sections are empty.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<&'static str, String>,
}
