//! Skill list normalization shared by applicants, jobs and employees.

use serde::{Deserialize, Deserializer};

/// Trims entries, drops blanks and removes exact duplicates while keeping first-seen order.
pub fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for skill in skills {
        let trimmed = skill.as_ref().trim();
        if !trimmed.is_empty() && !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

/// Splits a comma-separated skill string into a normalized list.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    normalize_skills(raw.split(','))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSkills {
    List(Vec<String>),
    Joined(String),
}

/// Accepts skills stored either as a JSON array or as a comma-separated string; `null` and
/// absent fields read as an empty list.
pub fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredSkills>::deserialize(deserializer)?;
    Ok(match stored {
        Some(StoredSkills::List(list)) => normalize_skills(list),
        Some(StoredSkills::Joined(joined)) => parse_skill_list(&joined),
        None => Vec::new(),
    })
}
