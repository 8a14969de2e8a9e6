//! Skill matching and the apply workflow.
//!
//! An application is recorded twice, under `jobs/{job}/applicants/{uid}` and under
//! `applicants/{uid}/appliedJobs/{job}`. Both copies are keyed by the pair, so a pair can never
//! hold more than one record.

pub mod domain;
pub mod matching;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityEntry, Application, ApplicationState, ApplyOutcome, JobMatchView, WriteSide,
    WriteStrategy, PENDING_STATUS,
};
pub use matching::{evaluate, SkillMatch, ELIGIBILITY_THRESHOLD};
pub use router::application_router;
pub use service::{ApplicationWorkflow, ApplyError};
