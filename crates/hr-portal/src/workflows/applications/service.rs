use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ActivityEntry, Application, ApplicationState, ApplyOutcome, JobMatchView, WriteSide,
    WriteStrategy, PENDING_STATUS,
};
use super::matching::{evaluate, ELIGIBILITY_THRESHOLD};
use crate::store::{self, paths, RealtimeStore, StoreError};
use crate::workflows::ids::{JobId, UserId};
use crate::workflows::jobs::JobPosting;
use crate::workflows::profiles::ApplicantProfile;

type Pair = (UserId, JobId);

/// Orchestrates profile and job reads, match evaluation, and the application writes.
pub struct ApplicationWorkflow<S> {
    store: Arc<S>,
    strategy: WriteStrategy,
    in_flight: Arc<Mutex<HashSet<Pair>>>,
}

/// Marks a pair as `Applying` until dropped.
struct InFlightClaim {
    pair: Pair,
    in_flight: Arc<Mutex<HashSet<Pair>>>,
}

impl InFlightClaim {
    fn acquire(in_flight: &Arc<Mutex<HashSet<Pair>>>, pair: Pair) -> Option<Self> {
        let inserted = in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pair.clone());
        inserted.then(|| Self {
            pair,
            in_flight: Arc::clone(in_flight),
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.pair);
    }
}

impl<S> ApplicationWorkflow<S>
where
    S: RealtimeStore + 'static,
{
    pub fn new(store: Arc<S>, strategy: WriteStrategy) -> Self {
        Self {
            store,
            strategy,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    /// Apply an applicant to a job.
    ///
    /// Re-applying returns the existing record without writing. A pair already in flight is
    /// refused before anything is read, as are matches below [`ELIGIBILITY_THRESHOLD`]; the
    /// in-flight claim is released on every return path.
    pub async fn apply(
        &self,
        applicant_id: &UserId,
        job_id: &JobId,
    ) -> Result<ApplyOutcome, ApplyError> {
        paths::validate_key(applicant_id.as_str())?;
        paths::validate_key(job_id.as_str())?;

        // Held across the reads so a concurrent apply cannot act on a stale job record.
        let pair = (applicant_id.clone(), job_id.clone());
        let _claim = InFlightClaim::acquire(&self.in_flight, pair).ok_or(ApplyError::InFlight)?;

        let profile = self.load_profile(applicant_id).await?;
        let job = self.load_job(job_id).await?;

        let existing = job
            .applicants
            .get(applicant_id)
            .or_else(|| profile.applied_jobs.get(job_id));
        if let Some(existing) = existing {
            info!(applicant = %applicant_id, job = %job_id, "application already recorded");
            return Ok(ApplyOutcome::AlreadyApplied(existing.clone()));
        }

        let skill_match = evaluate(&profile.skills, &job.skills);
        if !skill_match.is_eligible() {
            info!(
                applicant = %applicant_id,
                job = %job_id,
                match_percentage = skill_match.match_percentage,
                "application refused below eligibility threshold"
            );
            return Err(ApplyError::BelowThreshold {
                match_percentage: skill_match.match_percentage,
                threshold: ELIGIBILITY_THRESHOLD,
            });
        }

        let application = Application {
            applicant_id: applicant_id.clone(),
            job_id: job_id.clone(),
            applied_at: Utc::now(),
            match_percentage: skill_match.match_percentage,
            status: PENDING_STATUS.to_string(),
        };
        self.record(&application).await?;

        info!(
            applicant = %applicant_id,
            job = %job_id,
            match_percentage = application.match_percentage,
            "application recorded"
        );
        Ok(ApplyOutcome::Applied(application))
    }

    async fn record(&self, application: &Application) -> Result<(), ApplyError> {
        let uid = application.applicant_id.as_str();
        let job_id = application.job_id.as_str();
        let value = store::encode(application)?;
        let job_path = paths::job_applicant(job_id, uid);
        let applicant_path = paths::applied_job(uid, job_id);

        match self.strategy {
            WriteStrategy::DualWrite => {
                self.store
                    .set(&job_path, value.clone())
                    .await
                    .map_err(|source| ApplyError::WriteFailed {
                        side: WriteSide::Job,
                        source,
                    })?;

                if let Err(source) = self.store.set(&applicant_path, value).await {
                    warn!(
                        applicant = %uid,
                        job = %job_id,
                        error = %source,
                        "job side recorded but applicant side write failed"
                    );
                    return Err(ApplyError::WriteFailed {
                        side: WriteSide::Applicant,
                        source,
                    });
                }
            }
            WriteStrategy::MultiPath => {
                let mut changes = BTreeMap::new();
                changes.insert(job_path, value.clone());
                changes.insert(applicant_path, value);
                self.store
                    .update("", changes)
                    .await
                    .map_err(|source| ApplyError::WriteFailed {
                        side: WriteSide::Both,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Current lifecycle state of a pair.
    pub async fn state(
        &self,
        applicant_id: &UserId,
        job_id: &JobId,
    ) -> Result<ApplicationState, ApplyError> {
        paths::validate_key(applicant_id.as_str())?;
        paths::validate_key(job_id.as_str())?;

        let pair = (applicant_id.clone(), job_id.clone());
        let applying = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&pair);
        if applying {
            return Ok(ApplicationState::Applying);
        }

        let job_side = self
            .store
            .get(&paths::job_applicant(job_id.as_str(), applicant_id.as_str()))
            .await?;
        let applicant_side = self
            .store
            .get(&paths::applied_job(applicant_id.as_str(), job_id.as_str()))
            .await?;

        Ok(if job_side.is_some() || applicant_side.is_some() {
            ApplicationState::Applied
        } else {
            ApplicationState::NotApplied
        })
    }

    /// Applicant activity log, newest first.
    pub async fn applied_jobs(&self, applicant_id: &UserId) -> Result<Vec<ActivityEntry>, ApplyError> {
        paths::validate_key(applicant_id.as_str())?;
        let applications: Vec<(String, Application)> =
            store::read_collection(&*self.store, &paths::applied_jobs(applicant_id.as_str()))
                .await?;

        let mut entries = Vec::with_capacity(applications.len());
        for (_, application) in applications {
            let title_path = format!("{}/title", paths::job(application.job_id.as_str()));
            let job_title = store::read::<String, _>(&*self.store, &title_path)
                .await?
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| application.job_id.to_string());

            entries.push(ActivityEntry {
                job_id: application.job_id,
                job_title,
                applied_at: application.applied_at,
                match_percentage: application.match_percentage,
                status: application.status,
            });
        }

        entries.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(entries)
    }

    /// Applications recorded under a job.
    pub async fn job_applicants(&self, job_id: &JobId) -> Result<Vec<Application>, ApplyError> {
        let job = self.load_job(job_id).await?;
        Ok(job.applicants.into_values().collect())
    }

    /// Every job with the applicant's match result, ordered by job id.
    pub async fn job_matches(&self, applicant_id: &UserId) -> Result<Vec<JobMatchView>, ApplyError> {
        paths::validate_key(applicant_id.as_str())?;
        let profile = self.load_profile(applicant_id).await?;
        let jobs: Vec<(String, JobPosting)> =
            store::read_collection(&*self.store, paths::JOBS).await?;

        let applying: HashSet<JobId> = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(uid, _)| uid == applicant_id)
            .map(|(_, job_id)| job_id.clone())
            .collect();

        Ok(jobs
            .into_iter()
            .map(|(id, job)| {
                let job_id = JobId(id);
                let skill_match = evaluate(&profile.skills, &job.skills);
                let state = if applying.contains(&job_id) {
                    ApplicationState::Applying
                } else if job.applicants.contains_key(applicant_id)
                    || profile.applied_jobs.contains_key(&job_id)
                {
                    ApplicationState::Applied
                } else {
                    ApplicationState::NotApplied
                };
                JobMatchView {
                    eligible: skill_match.is_eligible(),
                    job_id,
                    title: job.title,
                    department: job.department,
                    required_skills: job.skills,
                    skill_match,
                    state,
                }
            })
            .collect())
    }

    async fn load_profile(&self, applicant_id: &UserId) -> Result<ApplicantProfile, ApplyError> {
        store::read(&*self.store, &paths::applicant(applicant_id.as_str()))
            .await?
            .ok_or_else(|| ApplyError::ProfileNotFound(applicant_id.clone()))
    }

    async fn load_job(&self, job_id: &JobId) -> Result<JobPosting, ApplyError> {
        paths::validate_key(job_id.as_str())?;
        store::read(&*self.store, &paths::job(job_id.as_str()))
            .await?
            .ok_or_else(|| ApplyError::JobNotFound(job_id.clone()))
    }
}

/// Error raised by the application workflow.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("applicant profile '{0}' not found")]
    ProfileNotFound(UserId),
    #[error("job '{0}' not found")]
    JobNotFound(JobId),
    #[error("skill match {match_percentage}% is below the {threshold}% eligibility threshold")]
    BelowThreshold { match_percentage: u8, threshold: u8 },
    #[error("an application for this job is already being submitted")]
    InFlight,
    #[error("failed to record application on the {side} side: {source}")]
    WriteFailed {
        side: WriteSide,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
