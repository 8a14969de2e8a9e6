use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::workflows::ids::EmployeeId;
use crate::workflows::skills::{deserialize_skills, normalize_skills};
use crate::workflows::validation::{require, require_email, ValidationError};

pub const ACTIVE_STATUS: &str = "Active";

fn active_status() -> String {
    ACTIVE_STATUS.to_string()
}

/// Roster entry under `employees/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default = "active_status")]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub salary_grade: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_hire_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub skills_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    #[serde(flatten)]
    pub employee: Employee,
}

/// HR-submitted employee form.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub salary_grade: f64,
    #[serde(default, deserialize_with = "deserialize_hire_date")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub skills_percentage: Option<f64>,
}

impl EmployeeDraft {
    pub fn into_employee(self) -> Result<Employee, ValidationError> {
        let name = require("name", &self.name)?;
        let email = require_email("email", &self.email)?;
        let department = require("department", &self.department)?;
        let position = require("position", &self.position)?;

        if !self.salary_grade.is_finite() || self.salary_grade < 0.0 {
            return Err(ValidationError::invalid(
                "salaryGrade",
                "must be a non-negative number",
            ));
        }
        if let Some(percentage) = self.skills_percentage {
            if !(0.0..=100.0).contains(&percentage) {
                return Err(ValidationError::invalid(
                    "skillsPercentage",
                    "must be between 0 and 100",
                ));
            }
        }

        let status = self
            .status
            .map(|status| status.trim().to_string())
            .filter(|status| !status.is_empty())
            .unwrap_or_else(active_status);

        Ok(Employee {
            name,
            email,
            contact: self.contact.trim().to_string(),
            gender: self.gender.trim().to_string(),
            department,
            position,
            status,
            salary_grade: self.salary_grade,
            hire_date: self.hire_date,
            skills: normalize_skills(&self.skills),
            skills_percentage: self.skills_percentage,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

/// Form fields arrive as numbers or numeric strings; blanks and garbage read as absent.
fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Number(value)) => Some(value),
        Some(Amount::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    })
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_amount(deserializer)?.unwrap_or_default())
}

fn deserialize_hire_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> EmployeeDraft {
        EmployeeDraft {
            name: "Maria Santos".to_string(),
            email: "maria@example.test".to_string(),
            department: "Finance".to_string(),
            position: "Accountant".to_string(),
            salary_grade: 32_000.0,
            ..EmployeeDraft::default()
        }
    }

    #[test]
    fn reads_string_salary_and_blank_hire_date() {
        let employee: Employee = serde_json::from_value(json!({
            "name": "Jo",
            "salaryGrade": "25000",
            "hireDate": "",
            "skillsPercentage": "80",
        }))
        .expect("decodes");

        assert_eq!(employee.salary_grade, 25_000.0);
        assert_eq!(employee.hire_date, None);
        assert_eq!(employee.skills_percentage, Some(80.0));
        assert_eq!(employee.status, "Active");
    }

    #[test]
    fn parses_iso_hire_dates() {
        let draft: EmployeeDraft = serde_json::from_value(json!({
            "name": "Jo",
            "hireDate": "2021-06-14",
        }))
        .expect("decodes");
        assert_eq!(draft.hire_date, NaiveDate::from_ymd_opt(2021, 6, 14));

        let invalid = serde_json::from_value::<EmployeeDraft>(json!({ "hireDate": "14/06/2021" }));
        assert!(invalid.is_err());
    }

    #[test]
    fn draft_requires_form_fields() {
        let mut missing_name = draft();
        missing_name.name.clear();
        assert_eq!(missing_name.into_employee().expect_err("invalid").field, "name");

        let mut bad_email = draft();
        bad_email.email = "maria".to_string();
        assert_eq!(bad_email.into_employee().expect_err("invalid").field, "email");

        let mut missing_department = draft();
        missing_department.department.clear();
        assert_eq!(
            missing_department.into_employee().expect_err("invalid").field,
            "department"
        );

        let mut blank_position = draft();
        blank_position.position = " ".to_string();
        assert_eq!(
            blank_position.into_employee().expect_err("invalid").field,
            "position"
        );
    }

    #[test]
    fn draft_defaults_status_and_checks_percentage() {
        let employee = draft().into_employee().expect("valid");
        assert_eq!(employee.status, ACTIVE_STATUS);

        let mut out_of_range = draft();
        out_of_range.skills_percentage = Some(140.0);
        assert_eq!(
            out_of_range.into_employee().expect_err("invalid").field,
            "skillsPercentage"
        );
    }
}
