use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::applications::Application;
use crate::workflows::ids::{JobId, UserId};
use crate::workflows::skills::{deserialize_skills, normalize_skills};
use crate::workflows::validation::{require, require_email, ValidationError};

/// Portal role attached to every registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Board Member")]
    BoardMember,
    Applicant,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Hr, Role::BoardMember, Role::Applicant];

    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Hr => "HR",
            Role::BoardMember => "Board Member",
            Role::Applicant => "Applicant",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == raw.trim())
    }
}

/// Dashboard modules a role can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PortalModule {
    Dashboard,
    Reports,
    #[serde(rename = "User Management")]
    UserManagement,
    Applications,
    Settings,
}

impl PortalModule {
    pub const ALL: [PortalModule; 5] = [
        PortalModule::Dashboard,
        PortalModule::Reports,
        PortalModule::UserManagement,
        PortalModule::Applications,
        PortalModule::Settings,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PortalModule::Dashboard => "Dashboard",
            PortalModule::Reports => "Reports",
            PortalModule::UserManagement => "User Management",
            PortalModule::Applications => "Applications",
            PortalModule::Settings => "Settings",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|module| module.label() == raw.trim())
    }
}

/// Account-level record under `profiles/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    pub role: Role,
    /// Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub years: f32,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
}

/// Applicant-owned record under `applicants/{uid}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(rename = "resumeURL", default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience: Vec<WorkExperience>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub applied_jobs: BTreeMap<JobId, Application>,
}

/// Registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub uid: UserId,
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl Registration {
    pub(crate) fn validate(&self) -> Result<(String, String), ValidationError> {
        let email = require_email("email", &self.email)?;
        let username = require("username", &self.username)?;
        Ok((email, username))
    }
}

/// Partial update of an applicant profile; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<WorkExperience>>,
}

impl ApplicantUpdate {
    pub(crate) fn validated(mut self) -> Result<Self, ValidationError> {
        if let Some(email) = &self.email {
            self.email = Some(require_email("email", email)?);
        }
        if let Some(skills) = self.skills.take() {
            self.skills = Some(normalize_skills(skills));
        }
        if let Some(experience) = &self.experience {
            if let Some(entry) = experience
                .iter()
                .find(|entry| !entry.years.is_finite() || entry.years < 0.0)
            {
                return Err(ValidationError::invalid(
                    "experience",
                    format!("years for '{}' must be a non-negative number", entry.title),
                ));
            }
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.contact_number.is_none()
            && self.gender.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
    }
}

/// Uploadable applicant documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Photo,
    Resume,
}

impl DocumentKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "photo" => Some(Self::Photo),
            "resume" => Some(Self::Resume),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Photo => "photo",
            DocumentKind::Resume => "resume",
        }
    }

    /// Profile field receiving the uploaded file's URL.
    pub const fn url_field(self) -> &'static str {
        match self {
            DocumentKind::Photo => "photoURL",
            DocumentKind::Resume => "resumeURL",
        }
    }

    pub fn accepts(self, content_type: &mime::Mime) -> bool {
        match self {
            DocumentKind::Photo => content_type.type_() == mime::IMAGE,
            DocumentKind::Resume => *content_type == mime::APPLICATION_PDF,
        }
    }
}

/// User summary shown on the role management screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uid: UserId,
    pub email: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub url: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolesOverview {
    pub users: Vec<UserSummary>,
    pub permissions: BTreeMap<Role, Vec<PortalModule>>,
}

/// Role management save: role per user plus the full permission table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleAssignments {
    #[serde(default)]
    pub roles: BTreeMap<UserId, Role>,
    #[serde(default)]
    pub permissions: BTreeMap<Role, Vec<PortalModule>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_use_display_labels_on_the_wire() {
        assert_eq!(serde_json::to_value(Role::BoardMember).expect("encode"), json!("Board Member"));
        assert_eq!(serde_json::to_value(Role::Hr).expect("encode"), json!("HR"));
        for role in Role::ALL {
            assert_eq!(serde_json::to_value(role).expect("encode"), json!(role.label()));
        }
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(Role::parse("Board Member"), Some(Role::BoardMember));
        assert_eq!(Role::parse("Intern"), None);
        assert_eq!(PortalModule::parse("User Management"), Some(PortalModule::UserManagement));
        for module in PortalModule::ALL {
            assert_eq!(serde_json::to_value(module).expect("encode"), json!(module.label()));
        }
    }

    #[test]
    fn applicant_profile_reads_joined_skills_and_url_fields() {
        let profile: ApplicantProfile = serde_json::from_value(json!({
            "email": "ana@example.test",
            "contactNumber": "0917",
            "skills": "Java,SQL",
            "resumeURL": "https://files.example.test/cv.pdf",
        }))
        .expect("decodes");

        assert_eq!(profile.skills, vec!["Java", "SQL"]);
        assert_eq!(profile.resume_url.as_deref(), Some("https://files.example.test/cv.pdf"));
        assert!(profile.photo_url.is_none());
    }

    #[test]
    fn update_validation_normalizes_skills() {
        let update = ApplicantUpdate {
            skills: Some(vec![" Go".to_string(), "Go".to_string(), "".to_string()]),
            ..ApplicantUpdate::default()
        };
        let validated = update.validated().expect("valid");
        assert_eq!(validated.skills, Some(vec!["Go".to_string()]));
    }

    #[test]
    fn update_validation_rejects_bad_email() {
        let update = ApplicantUpdate {
            email: Some("nope".to_string()),
            ..ApplicantUpdate::default()
        };
        assert_eq!(update.validated().expect_err("invalid").field, "email");
    }

    #[test]
    fn document_kinds_accept_expected_types() {
        assert!(DocumentKind::Resume.accepts(&mime::APPLICATION_PDF));
        assert!(!DocumentKind::Resume.accepts(&mime::IMAGE_PNG));
        assert!(DocumentKind::Photo.accepts(&mime::IMAGE_JPEG));
        assert!(!DocumentKind::Photo.accepts(&mime::APPLICATION_PDF));
    }
}
