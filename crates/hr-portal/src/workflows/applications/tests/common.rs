use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::store::{InMemoryRealtimeStore, RealtimeStore, StoreError};
use crate::workflows::applications::{ApplicationWorkflow, WriteStrategy};

pub(super) const APPLICANT: &str = "uid_ana";
pub(super) const JOB: &str = "job_backend";

pub(super) fn seeded_store() -> Arc<InMemoryRealtimeStore> {
    Arc::new(InMemoryRealtimeStore::with_root(json!({
        "applicants": {
            APPLICANT: {
                "email": "ana@example.test",
                "skills": ["Rust", "SQL", "Docker"],
            },
            "uid_ben": {
                "email": "ben@example.test",
                "skills": "Excel",
            },
        },
        "jobs": {
            JOB: {
                "title": "Backend Engineer",
                "department": "Engineering",
                "skills": ["Rust", "SQL", "Kubernetes"],
                "vacancies": 2,
            },
            "job_frontend": {
                "title": "Frontend Engineer",
                "department": "Engineering",
                "skills": ["TypeScript", "CSS"],
                "vacancies": 1,
            },
        },
    })))
}

pub(super) fn workflow(
    store: Arc<InMemoryRealtimeStore>,
    strategy: WriteStrategy,
) -> ApplicationWorkflow<InMemoryRealtimeStore> {
    ApplicationWorkflow::new(store, strategy)
}

/// Delegates to an in-memory tree but refuses writes under the configured prefixes.
pub(super) struct FailingWrites {
    pub(super) inner: InMemoryRealtimeStore,
    failing_prefixes: Vec<&'static str>,
}

impl FailingWrites {
    pub(super) fn new(inner: InMemoryRealtimeStore, failing_prefixes: Vec<&'static str>) -> Self {
        Self {
            inner,
            failing_prefixes,
        }
    }

    fn check(&self, path: &str) -> Result<(), StoreError> {
        if self
            .failing_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
        {
            return Err(StoreError::Unavailable(format!("write refused for {path}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RealtimeStore for FailingWrites {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check(path)?;
        self.inner.set(path, value).await
    }

    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError> {
        for path in changes.keys() {
            self.check(path)?;
        }
        self.inner.update(base, changes).await
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.check(path)?;
        self.inner.remove(path).await
    }
}

pub(super) fn failing_workflow(
    prefixes: Vec<&'static str>,
    strategy: WriteStrategy,
) -> ApplicationWorkflow<FailingWrites> {
    let inner = InMemoryRealtimeStore::with_root(
        seeded_store().snapshot().expect("seed snapshot"),
    );
    ApplicationWorkflow::new(Arc::new(FailingWrites::new(inner, prefixes)), strategy)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
