//! Path layout of the realtime store and blob store.

use super::StoreError;

pub const EMPLOYEES: &str = "employees";
pub const JOBS: &str = "jobs";
pub const APPLICANTS: &str = "applicants";
pub const PROFILES: &str = "profiles";
pub const PERMISSIONS: &str = "permissions";
pub const APPLICANT_FILES: &str = "applicantFiles";

/// Rejects keys the realtime store cannot address.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let forbidden = ['/', '.', '#', '$', '[', ']'];
    if key.trim().is_empty() || key.contains(&forbidden[..]) || key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

pub fn employee(id: &str) -> String {
    format!("{EMPLOYEES}/{id}")
}

pub fn job(id: &str) -> String {
    format!("{JOBS}/{id}")
}

pub fn job_applicants(job_id: &str) -> String {
    format!("{JOBS}/{job_id}/applicants")
}

pub fn job_applicant(job_id: &str, applicant_id: &str) -> String {
    format!("{JOBS}/{job_id}/applicants/{applicant_id}")
}

pub fn applicant(uid: &str) -> String {
    format!("{APPLICANTS}/{uid}")
}

pub fn applied_jobs(uid: &str) -> String {
    format!("{APPLICANTS}/{uid}/appliedJobs")
}

pub fn applied_job(uid: &str, job_id: &str) -> String {
    format!("{APPLICANTS}/{uid}/appliedJobs/{job_id}")
}

pub fn profile(uid: &str) -> String {
    format!("{PROFILES}/{uid}")
}

pub fn permission(role: &str) -> String {
    format!("{PERMISSIONS}/{role}")
}

/// Blob path for an uploaded applicant document.
pub fn applicant_file(uid: &str, kind: &str, filename: &str) -> String {
    format!("{APPLICANT_FILES}/{uid}/{kind}/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_paths() {
        assert_eq!(job_applicant("job_1", "u1"), "jobs/job_1/applicants/u1");
        assert_eq!(applied_job("u1", "job_1"), "applicants/u1/appliedJobs/job_1");
        assert_eq!(
            applicant_file("u1", "resume", "cv.pdf"),
            "applicantFiles/u1/resume/cv.pdf"
        );
    }

    #[test]
    fn validate_key_rejects_path_characters() {
        assert!(validate_key("job_1700000000000-1").is_ok());
        assert!(validate_key("Board Member").is_ok());
        for bad in ["", "  ", "a/b", "a.b", "a#b", "a$b", "a[b", "a]b"] {
            assert!(validate_key(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
