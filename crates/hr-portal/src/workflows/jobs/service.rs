use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::domain::{JobDraft, JobPosting, JobRecord};
use crate::store::{self, paths, RealtimeStore, StoreError};
use crate::workflows::ids::{next_record_id, JobId};
use crate::workflows::validation::ValidationError;

const APPLICANTS_FIELD: &str = "applicants";

/// CRUD over `jobs/{id}`.
pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> JobService<S>
where
    S: RealtimeStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All postings ordered by id.
    pub async fn list(&self) -> Result<Vec<JobRecord>, JobServiceError> {
        let jobs: Vec<(String, JobPosting)> =
            store::read_collection(&*self.store, paths::JOBS).await?;
        Ok(jobs
            .into_iter()
            .map(|(id, posting)| JobRecord {
                id: JobId(id),
                posting,
            })
            .collect())
    }

    pub async fn get(&self, id: &JobId) -> Result<JobRecord, JobServiceError> {
        let posting = self.load(id).await?;
        Ok(JobRecord {
            id: id.clone(),
            posting,
        })
    }

    pub async fn create(&self, draft: JobDraft) -> Result<JobRecord, JobServiceError> {
        let posting = draft.into_posting()?;
        let id = JobId(next_record_id("job"));
        store::write(&*self.store, &paths::job(id.as_str()), &posting).await?;
        info!(job = %id, title = %posting.title, "job posted");
        Ok(JobRecord { id, posting })
    }

    /// Rewrites the editable fields in one update; the `applicants` subtree is never written, so
    /// applications recorded while the edit is in progress survive it.
    pub async fn update(&self, id: &JobId, draft: JobDraft) -> Result<JobRecord, JobServiceError> {
        let posting = draft.into_posting()?;
        self.load(id).await?;

        let mut changes: BTreeMap<String, Value> = match store::encode(&posting)? {
            Value::Object(fields) => fields
                .into_iter()
                .filter(|(field, _)| field != APPLICANTS_FIELD)
                .collect(),
            _ => BTreeMap::new(),
        };
        for cleared in ["salaryMin", "salaryMax"] {
            changes.entry(cleared.to_string()).or_insert(Value::Null);
        }

        self.store.update(&paths::job(id.as_str()), changes).await?;
        info!(job = %id, "job updated");
        self.get(id).await
    }

    /// Removes only `jobs/{id}`; applicant-side application copies stay in place.
    pub async fn delete(&self, id: &JobId) -> Result<(), JobServiceError> {
        self.load(id).await?;
        self.store.remove(&paths::job(id.as_str())).await?;
        info!(job = %id, "job deleted");
        Ok(())
    }

    async fn load(&self, id: &JobId) -> Result<JobPosting, JobServiceError> {
        paths::validate_key(id.as_str())?;
        store::read(&*self.store, &paths::job(id.as_str()))
            .await?
            .ok_or_else(|| JobServiceError::NotFound(id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("job '{0}' not found")]
    NotFound(JobId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
