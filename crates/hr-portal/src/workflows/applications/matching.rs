//! Skill-match evaluation between an applicant and a job posting.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Minimum match percentage an applicant needs before an application is accepted.
pub const ELIGIBILITY_THRESHOLD: u8 = 50;

/// Overlap between an applicant's skills and a job's required skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    /// Required skills the applicant has, in the job's order.
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// 0–100. A job without required skills scores 0.
    pub match_percentage: u8,
}

impl SkillMatch {
    pub fn is_eligible(&self) -> bool {
        self.match_percentage >= ELIGIBILITY_THRESHOLD
    }
}

/// Compares skills by exact string equality.
pub fn evaluate<A, R>(applicant_skills: &[A], required_skills: &[R]) -> SkillMatch
where
    A: AsRef<str>,
    R: AsRef<str>,
{
    let held: HashSet<&str> = applicant_skills
        .iter()
        .map(|skill| AsRef::<str>::as_ref(skill))
        .collect();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    for skill in required_skills {
        let skill: &str = AsRef::<str>::as_ref(skill);
        if held.contains(skill) {
            matched_skills.push(skill.to_string());
        } else {
            missing_skills.push(skill.to_string());
        }
    }

    let match_percentage = rounded_percentage(matched_skills.len(), required_skills.len());

    SkillMatch {
        matched_skills,
        missing_skills,
        match_percentage,
    }
}

/// `round(100 * part / whole)` with halves rounded up, in integer arithmetic so that exact
/// halves such as 23/40 are not lost to float error. An empty `whole` is 0.
fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u64, whole as u64);
    ((200 * part + whole) / (2 * whole)) as u8
}
