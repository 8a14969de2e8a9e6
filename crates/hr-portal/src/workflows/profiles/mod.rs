//! User accounts, applicant profiles and role permissions.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    ApplicantProfile, ApplicantUpdate, DocumentKind, PortalModule, Registration, Role,
    RoleAssignments, RolesOverview, UploadedDocument, UserProfile, UserSummary, WorkExperience,
};
pub use router::profile_router;
pub use service::{ProfileService, ProfileServiceError};
