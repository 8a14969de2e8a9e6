use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::matching::SkillMatch;
use crate::workflows::ids::{JobId, UserId};

pub const PENDING_STATUS: &str = "Pending";

fn pending_status() -> String {
    PENDING_STATUS.to_string()
}

/// Application record, stored under both the job and the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub applicant_id: UserId,
    pub job_id: JobId,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub match_percentage: u8,
    #[serde(default = "pending_status")]
    pub status: String,
}

/// Lifecycle of one (applicant, job) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    NotApplied,
    Applying,
    Applied,
}

impl ApplicationState {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationState::NotApplied => "not_applied",
            ApplicationState::Applying => "applying",
            ApplicationState::Applied => "applied",
        }
    }
}

/// Result of a successful `apply` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(Application),
    /// The pair was already applied; nothing was written.
    AlreadyApplied(Application),
}

impl ApplyOutcome {
    pub fn application(&self) -> &Application {
        match self {
            ApplyOutcome::Applied(application) | ApplyOutcome::AlreadyApplied(application) => {
                application
            }
        }
    }

    pub fn into_application(self) -> Application {
        match self {
            ApplyOutcome::Applied(application) | ApplyOutcome::AlreadyApplied(application) => {
                application
            }
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }
}

/// How the two copies of an application are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStrategy {
    /// Job side first, then applicant side; a failure leaves whatever was written.
    #[default]
    DualWrite,
    /// Both paths in one multi-path update.
    MultiPath,
}

impl WriteStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dual" | "dual_write" => Some(Self::DualWrite),
            "multi_path" | "multipath" | "atomic" => Some(Self::MultiPath),
            _ => None,
        }
    }
}

/// Which copy of an application a failed write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSide {
    Job,
    Applicant,
    Both,
}

impl fmt::Display for WriteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WriteSide::Job => "job",
            WriteSide::Applicant => "applicant",
            WriteSide::Both => "job and applicant",
        };
        f.write_str(label)
    }
}

/// One row of an applicant's activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub job_id: JobId,
    /// Falls back to the job id once the posting has been deleted.
    pub job_title: String,
    pub applied_at: DateTime<Utc>,
    pub match_percentage: u8,
    pub status: String,
}

/// A job as seen from one applicant's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchView {
    pub job_id: JobId,
    pub title: String,
    pub department: String,
    pub required_skills: Vec<String>,
    #[serde(flatten)]
    pub skill_match: SkillMatch,
    pub eligible: bool,
    pub state: ApplicationState,
}
