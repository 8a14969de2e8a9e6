use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use async_trait::async_trait;
use hr_portal::config::{BlobConfig, StoreConfig};
use hr_portal::store::{
    BlobError, BlobStore, FsBlobStore, InMemoryBlobStore, InMemoryRealtimeStore, RealtimeStore,
    RestRealtimeStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Realtime store selected by configuration.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryRealtimeStore),
    Rest(RestRealtimeStore),
}

impl ConfiguredStore {
    pub(crate) fn from_config(config: &StoreConfig) -> Self {
        match config {
            StoreConfig::InMemory => Self::Memory(InMemoryRealtimeStore::new()),
            StoreConfig::Rest {
                base_url,
                auth_token,
            } => Self::Rest(RestRealtimeStore::new(base_url.clone(), auth_token.clone())),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Rest(_) => "rest",
        }
    }
}

#[async_trait]
impl RealtimeStore for ConfiguredStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Self::Memory(store) => store.get(path).await,
            Self::Rest(store) => store.get(path).await,
        }
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(path, value).await,
            Self::Rest(store) => store.set(path, value).await,
        }
    }

    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.update(base, changes).await,
            Self::Rest(store) => store.update(base, changes).await,
        }
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove(path).await,
            Self::Rest(store) => store.remove(path).await,
        }
    }
}

/// Blob store selected by configuration.
pub(crate) enum ConfiguredBlobs {
    Memory(InMemoryBlobStore),
    Fs(FsBlobStore),
}

impl ConfiguredBlobs {
    pub(crate) fn from_config(config: &BlobConfig) -> Self {
        match &config.directory {
            Some(directory) => Self::Fs(FsBlobStore::new(directory.clone(), config.public_url.clone())),
            None => Self::Memory(InMemoryBlobStore::new(config.public_url.clone())),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Fs(_) => "filesystem",
        }
    }
}

#[async_trait]
impl BlobStore for ConfiguredBlobs {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        match self {
            Self::Memory(blobs) => blobs.upload(path, bytes, content_type).await,
            Self::Fs(blobs) => blobs.upload(path, bytes, content_type).await,
        }
    }
}
