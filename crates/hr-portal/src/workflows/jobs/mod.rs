//! Job postings managed by HR.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{JobDraft, JobPosting, JobRecord};
pub use router::job_router;
pub use service::{JobService, JobServiceError};
