use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::{InMemoryRealtimeStore, RealtimeStore, StoreError};

/// In-memory store that parks the first read of one path until released, so tests can
/// interleave a second operation between that read and whatever follows it.
pub(crate) struct GatedReads {
    pub(crate) inner: InMemoryRealtimeStore,
    gated_path: String,
    armed: AtomicBool,
    parked: Notify,
    release: Notify,
}

impl GatedReads {
    pub(crate) fn new(inner: InMemoryRealtimeStore, gated_path: &str) -> Self {
        Self {
            inner,
            gated_path: gated_path.to_string(),
            armed: AtomicBool::new(true),
            parked: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Resolves once the gated read has been reached.
    pub(crate) async fn wait_until_parked(&self) {
        self.parked.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl RealtimeStore for GatedReads {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        if path == self.gated_path && self.armed.swap(false, Ordering::SeqCst) {
            let value = self.inner.get(path).await?;
            self.parked.notify_one();
            self.release.notified().await;
            return Ok(value);
        }
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(path, value).await
    }

    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError> {
        self.inner.update(base, changes).await
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.inner.remove(path).await
    }
}
