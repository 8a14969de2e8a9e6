use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{
    ApplicantProfile, ApplicantUpdate, DocumentKind, PortalModule, Registration, Role,
    RoleAssignments, RolesOverview, UploadedDocument, UserProfile, UserSummary,
};
use crate::store::{self, paths, BlobError, BlobStore, RealtimeStore, StoreError};
use crate::workflows::ids::UserId;
use crate::workflows::skills::normalize_skills;
use crate::workflows::validation::{require, ValidationError};

/// User accounts, applicant profiles, uploads and role permissions.
pub struct ProfileService<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
}

impl<S, B> ProfileService<S, B>
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    pub fn new(store: Arc<S>, blobs: Arc<B>) -> Self {
        Self { store, blobs }
    }

    /// Creates `profiles/{uid}`; applicants also get an `applicants/{uid}` record seeded with
    /// their email. Both land in one update. An existing profile is never overwritten.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, ProfileServiceError> {
        paths::validate_key(registration.uid.as_str())?;
        let (email, username) = registration.validate()?;
        let uid = registration.uid;
        if self.store.get(&paths::profile(uid.as_str())).await?.is_some() {
            return Err(ProfileServiceError::AlreadyRegistered(uid));
        }

        let profile = UserProfile {
            email: email.clone(),
            username,
            role: registration.role,
            created_at: Some(Utc::now().timestamp_millis()),
        };

        let mut changes = BTreeMap::new();
        changes.insert(paths::profile(uid.as_str()), store::encode(&profile)?);
        if profile.role == Role::Applicant {
            changes.insert(
                format!("{}/email", paths::applicant(uid.as_str())),
                Value::String(email),
            );
        }
        self.store.update("", changes).await?;

        info!(user = %uid, role = profile.role.label(), "user registered");
        Ok(profile)
    }

    pub async fn user_profile(&self, uid: &UserId) -> Result<UserProfile, ProfileServiceError> {
        paths::validate_key(uid.as_str())?;
        store::read(&*self.store, &paths::profile(uid.as_str()))
            .await?
            .ok_or_else(|| ProfileServiceError::NotFound(uid.clone()))
    }

    pub async fn applicant_profile(
        &self,
        uid: &UserId,
    ) -> Result<ApplicantProfile, ProfileServiceError> {
        paths::validate_key(uid.as_str())?;
        store::read(&*self.store, &paths::applicant(uid.as_str()))
            .await?
            .ok_or_else(|| ProfileServiceError::NotFound(uid.clone()))
    }

    /// Writes only the fields present in `update`.
    pub async fn update_applicant(
        &self,
        uid: &UserId,
        update: ApplicantUpdate,
    ) -> Result<ApplicantProfile, ProfileServiceError> {
        let update = update.validated()?;
        let mut profile = self.applicant_profile(uid).await?;
        if update.is_empty() {
            return Ok(profile);
        }

        let mut changes = BTreeMap::new();
        if let Some(email) = update.email {
            changes.insert("email".to_string(), Value::String(email.clone()));
            profile.email = email;
        }
        if let Some(contact_number) = update.contact_number {
            let contact_number = contact_number.trim().to_string();
            changes.insert("contactNumber".to_string(), Value::String(contact_number.clone()));
            profile.contact_number = contact_number;
        }
        if let Some(gender) = update.gender {
            let gender = gender.trim().to_string();
            changes.insert("gender".to_string(), Value::String(gender.clone()));
            profile.gender = gender;
        }
        if let Some(skills) = update.skills {
            changes.insert("skills".to_string(), store::encode(&skills)?);
            profile.skills = skills;
        }
        if let Some(experience) = update.experience {
            changes.insert("experience".to_string(), store::encode(&experience)?);
            profile.experience = experience;
        }

        self.store
            .update(&paths::applicant(uid.as_str()), changes)
            .await?;
        info!(user = %uid, "applicant profile updated");
        Ok(profile)
    }

    /// Returns the skill list after the change; adding a held skill is a no-op.
    pub async fn add_skill(&self, uid: &UserId, skill: &str) -> Result<Vec<String>, ProfileServiceError> {
        let skill = require("skill", skill)?;
        let profile = self.applicant_profile(uid).await?;
        if profile.skills.contains(&skill) {
            return Ok(profile.skills);
        }

        let mut skills = profile.skills;
        skills.push(skill);
        self.write_skills(uid, &skills).await?;
        Ok(skills)
    }

    pub async fn remove_skill(
        &self,
        uid: &UserId,
        skill: &str,
    ) -> Result<Vec<String>, ProfileServiceError> {
        let skill = skill.trim();
        let profile = self.applicant_profile(uid).await?;
        if !profile.skills.iter().any(|held| held == skill) {
            return Ok(profile.skills);
        }

        let skills: Vec<String> = profile
            .skills
            .into_iter()
            .filter(|held| held != skill)
            .collect();
        self.write_skills(uid, &skills).await?;
        Ok(skills)
    }

    async fn write_skills(&self, uid: &UserId, skills: &[String]) -> Result<(), ProfileServiceError> {
        let skills = normalize_skills(skills);
        let path = format!("{}/skills", paths::applicant(uid.as_str()));
        store::write(&*self.store, &path, &skills).await?;
        Ok(())
    }

    /// Uploads a photo or resume and points the applicant profile at the stored file.
    pub async fn upload_document(
        &self,
        uid: &UserId,
        kind: DocumentKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedDocument, ProfileServiceError> {
        let filename = checked_filename(filename)?;
        if bytes.is_empty() {
            return Err(ValidationError::invalid("file", "must not be empty").into());
        }
        let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
        if !kind.accepts(&content_type) {
            return Err(ProfileServiceError::UnsupportedDocument {
                kind,
                content_type: content_type.to_string(),
            });
        }
        self.applicant_profile(uid).await?;

        let blob_path = paths::applicant_file(uid.as_str(), kind.as_str(), &filename);
        let url = self
            .blobs
            .upload(&blob_path, bytes, content_type.as_ref())
            .await?;

        let field_path = format!("{}/{}", paths::applicant(uid.as_str()), kind.url_field());
        if let Err(err) = self.store.set(&field_path, Value::String(url.clone())).await {
            warn!(user = %uid, %blob_path, error = %err, "file uploaded but profile link failed");
            return Err(err.into());
        }

        info!(user = %uid, kind = kind.as_str(), %blob_path, "applicant document uploaded");
        Ok(UploadedDocument {
            kind,
            url,
            content_type: content_type.to_string(),
        })
    }

    /// Every registered user plus the module grants of each role.
    pub async fn roles_overview(&self) -> Result<RolesOverview, ProfileServiceError> {
        let profiles: Vec<(String, UserProfile)> =
            store::read_collection(&*self.store, paths::PROFILES).await?;
        let users = profiles
            .into_iter()
            .map(|(uid, profile)| UserSummary {
                uid: UserId(uid),
                email: profile.email,
                username: profile.username,
                role: profile.role,
            })
            .collect();

        let mut permissions = BTreeMap::new();
        for role in Role::ALL {
            permissions.insert(role, self.role_modules(role).await?);
        }

        Ok(RolesOverview { users, permissions })
    }

    /// Saves role changes and the permission table in one update.
    pub async fn save_roles(&self, assignments: RoleAssignments) -> Result<RolesOverview, ProfileServiceError> {
        let mut changes = BTreeMap::new();
        for (uid, role) in &assignments.roles {
            paths::validate_key(uid.as_str())?;
            if self.store.get(&paths::profile(uid.as_str())).await?.is_none() {
                return Err(ProfileServiceError::NotFound(uid.clone()));
            }
            changes.insert(
                format!("{}/role", paths::profile(uid.as_str())),
                store::encode(role)?,
            );
        }
        for (role, modules) in &assignments.permissions {
            changes.insert(paths::permission(role.label()), store::encode(&dedup_modules(modules))?);
        }

        if !changes.is_empty() {
            self.store.update("", changes).await?;
        }
        info!(
            roles = assignments.roles.len(),
            permissions = assignments.permissions.len(),
            "role assignments saved"
        );
        self.roles_overview().await
    }

    /// Grants the module when absent, revokes it when present; returns the role's new grants.
    pub async fn toggle_module(
        &self,
        role: Role,
        module: PortalModule,
    ) -> Result<Vec<PortalModule>, ProfileServiceError> {
        let mut modules = self.role_modules(role).await?;
        match modules.iter().position(|granted| *granted == module) {
            Some(index) => {
                modules.remove(index);
            }
            None => modules.push(module),
        }

        store::write(&*self.store, &paths::permission(role.label()), &modules).await?;
        info!(role = role.label(), module = module.label(), "module access toggled");
        Ok(modules)
    }

    async fn role_modules(&self, role: Role) -> Result<Vec<PortalModule>, ProfileServiceError> {
        Ok(store::read(&*self.store, &paths::permission(role.label()))
            .await?
            .unwrap_or_default())
    }
}

fn dedup_modules(modules: &[PortalModule]) -> Vec<PortalModule> {
    let mut unique = Vec::with_capacity(modules.len());
    for module in modules {
        if !unique.contains(module) {
            unique.push(*module);
        }
    }
    unique
}

fn checked_filename(raw: &str) -> Result<String, ValidationError> {
    let filename = require("filename", raw)?;
    if filename.contains(&['/', '\\'][..]) || filename == "." || filename == ".." {
        return Err(ValidationError::invalid("filename", "must be a plain file name"));
    }
    Ok(filename)
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("profile '{0}' not found")]
    NotFound(UserId),
    #[error("user '{0}' is already registered")]
    AlreadyRegistered(UserId),
    #[error("{content_type} is not accepted for a {kind:?} upload")]
    UnsupportedDocument {
        kind: DocumentKind,
        content_type: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryBlobStore, InMemoryRealtimeStore};
    use serde_json::json;

    fn service(
        root: Value,
    ) -> (
        ProfileService<InMemoryRealtimeStore, InMemoryBlobStore>,
        Arc<InMemoryRealtimeStore>,
        Arc<InMemoryBlobStore>,
    ) {
        let store = Arc::new(InMemoryRealtimeStore::with_root(root));
        let blobs = Arc::new(InMemoryBlobStore::new("https://files.example.test"));
        (ProfileService::new(store.clone(), blobs.clone()), store, blobs)
    }

    fn applicant_root() -> Value {
        json!({
            "profiles": {
                "uid_ana": { "email": "ana@example.test", "username": "ana", "role": "Applicant" },
                "uid_hr": { "email": "hr@example.test", "username": "hr", "role": "HR" },
            },
            "applicants": {
                "uid_ana": { "email": "ana@example.test", "skills": "Rust,SQL" },
            },
        })
    }

    fn registration(uid: &str, role: Role) -> Registration {
        Registration {
            uid: UserId::from(uid),
            email: format!("{uid}@example.test"),
            username: uid.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn applicant_registration_seeds_applicant_record() {
        let (service, store, _) = service(json!({}));

        let profile = service
            .register(registration("uid_new", Role::Applicant))
            .await
            .expect("registered");
        assert!(profile.created_at.is_some());

        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot["profiles"]["uid_new"]["role"], "Applicant");
        assert_eq!(snapshot["applicants"]["uid_new"]["email"], "uid_new@example.test");
    }

    #[tokio::test]
    async fn staff_registration_writes_profile_only() {
        let (service, store, _) = service(json!({}));

        service
            .register(registration("uid_board", Role::BoardMember))
            .await
            .expect("registered");

        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot["profiles"]["uid_board"]["role"], "Board Member");
        assert!(snapshot.get("applicants").is_none());
    }

    #[tokio::test]
    async fn registering_twice_keeps_the_first_profile() {
        let (service, store, _) = service(json!({}));
        let first = service
            .register(registration("uid_twice", Role::Applicant))
            .await
            .expect("first registration");

        let result = service.register(registration("uid_twice", Role::Admin)).await;

        assert!(matches!(result, Err(ProfileServiceError::AlreadyRegistered(_))));
        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot["profiles"]["uid_twice"]["role"], "Applicant");
        assert_eq!(
            snapshot["profiles"]["uid_twice"]["createdAt"],
            json!(first.created_at)
        );
    }

    #[tokio::test]
    async fn registration_rejects_bad_email_before_writing() {
        let (service, store, _) = service(json!({}));
        let mut bad = registration("uid_x", Role::Applicant);
        bad.email = "not-an-email".to_string();

        let result = service.register(bad).await;

        assert!(matches!(result, Err(ProfileServiceError::Validation(_))));
        assert_eq!(store.snapshot().expect("snapshot"), json!({}));
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let (service, store, _) = service(applicant_root());
        let uid = UserId::from("uid_ana");

        let updated = service
            .update_applicant(
                &uid,
                ApplicantUpdate {
                    contact_number: Some(" 0917 555 0101 ".to_string()),
                    ..ApplicantUpdate::default()
                },
            )
            .await
            .expect("updated");

        assert_eq!(updated.contact_number, "0917 555 0101");
        assert_eq!(updated.skills, vec!["Rust", "SQL"]);
        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot["applicants"]["uid_ana"]["skills"], "Rust,SQL");
        assert_eq!(snapshot["applicants"]["uid_ana"]["contactNumber"], "0917 555 0101");
    }

    #[tokio::test]
    async fn skills_are_added_once_and_removed() {
        let (service, _, _) = service(applicant_root());
        let uid = UserId::from("uid_ana");

        assert_eq!(
            service.add_skill(&uid, " Docker ").await.expect("add"),
            vec!["Rust", "SQL", "Docker"]
        );
        assert_eq!(
            service.add_skill(&uid, "Docker").await.expect("add again"),
            vec!["Rust", "SQL", "Docker"]
        );
        assert_eq!(
            service.remove_skill(&uid, "SQL").await.expect("remove"),
            vec!["Rust", "Docker"]
        );
        assert!(matches!(
            service.add_skill(&uid, "  ").await,
            Err(ProfileServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn resume_upload_links_profile() {
        let (service, store, blobs) = service(applicant_root());
        let uid = UserId::from("uid_ana");

        let uploaded = service
            .upload_document(&uid, DocumentKind::Resume, "cv.pdf", b"%PDF-1.7".to_vec())
            .await
            .expect("uploaded");

        assert_eq!(
            uploaded.url,
            "https://files.example.test/applicantFiles/uid_ana/resume/cv.pdf"
        );
        let stored = blobs
            .object("applicantFiles/uid_ana/resume/cv.pdf")
            .expect("blob stored");
        assert_eq!(stored.content_type, "application/pdf");
        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot["applicants"]["uid_ana"]["resumeURL"], uploaded.url);
    }

    #[tokio::test]
    async fn upload_rejects_wrong_document_type() {
        let (service, _, blobs) = service(applicant_root());
        let uid = UserId::from("uid_ana");

        let result = service
            .upload_document(&uid, DocumentKind::Resume, "cv.docx", b"PK".to_vec())
            .await;
        assert!(matches!(
            result,
            Err(ProfileServiceError::UnsupportedDocument { .. })
        ));

        let result = service
            .upload_document(&uid, DocumentKind::Photo, "../me.png", b"png".to_vec())
            .await;
        assert!(matches!(result, Err(ProfileServiceError::Validation(_))));
        assert!(blobs.object("applicantFiles/uid_ana/photo/me.png").is_none());
    }

    #[tokio::test]
    async fn save_roles_updates_users_and_permissions_together() {
        let (service, store, _) = service(applicant_root());
        let mut assignments = RoleAssignments::default();
        assignments
            .roles
            .insert(UserId::from("uid_hr"), Role::Admin);
        assignments.permissions.insert(
            Role::Hr,
            vec![PortalModule::Dashboard, PortalModule::Reports, PortalModule::Dashboard],
        );

        let overview = service.save_roles(assignments).await.expect("saved");

        let hr = overview
            .users
            .iter()
            .find(|user| user.uid.as_str() == "uid_hr")
            .expect("listed");
        assert_eq!(hr.role, Role::Admin);
        assert_eq!(
            overview.permissions[&Role::Hr],
            vec![PortalModule::Dashboard, PortalModule::Reports]
        );
        assert!(overview.permissions[&Role::Applicant].is_empty());
        assert_eq!(
            store.snapshot().expect("snapshot")["permissions"]["HR"],
            json!(["Dashboard", "Reports"])
        );
    }

    #[tokio::test]
    async fn save_roles_refuses_unknown_users() {
        let (service, store, _) = service(applicant_root());
        let before = store.snapshot().expect("snapshot");
        let mut assignments = RoleAssignments::default();
        assignments.roles.insert(UserId::from("uid_ghost"), Role::Hr);

        let result = service.save_roles(assignments).await;

        assert!(matches!(result, Err(ProfileServiceError::NotFound(_))));
        assert_eq!(store.snapshot().expect("snapshot"), before);
    }

    #[tokio::test]
    async fn toggle_module_grants_then_revokes() {
        let (service, _, _) = service(json!({}));

        let granted = service
            .toggle_module(Role::BoardMember, PortalModule::Reports)
            .await
            .expect("granted");
        assert_eq!(granted, vec![PortalModule::Reports]);

        let revoked = service
            .toggle_module(Role::BoardMember, PortalModule::Reports)
            .await
            .expect("revoked");
        assert!(revoked.is_empty());
    }
}
