use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::applications::Application;
use crate::workflows::ids::{JobId, UserId};
use crate::workflows::skills::{deserialize_skills, normalize_skills};
use crate::workflows::validation::{require, ValidationError};

/// Job posting as stored under `jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub department: String,
    /// Required skills.
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub vacancies: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub applicants: BTreeMap<UserId, Application>,
}

/// A posting paired with its store key, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: JobId,
    #[serde(flatten)]
    pub posting: JobPosting,
}

/// HR-submitted job form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub vacancies: u32,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

impl JobDraft {
    /// Validates the form and produces a posting with no recorded applicants.
    pub fn into_posting(self) -> Result<JobPosting, ValidationError> {
        let title = require("title", &self.title)?;

        for (field, amount) in [("salaryMin", self.salary_min), ("salaryMax", self.salary_max)] {
            if let Some(amount) = amount {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(ValidationError::invalid(field, "must be a non-negative number"));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(ValidationError::invalid(
                    "salaryMin",
                    "must not exceed salaryMax",
                ));
            }
        }

        Ok(JobPosting {
            title,
            description: self.description.trim().to_string(),
            department: self.department.trim().to_string(),
            skills: normalize_skills(&self.skills),
            vacancies: self.vacancies,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            applicants: BTreeMap::new(),
        })
    }
}
