//! Realtime key-value store and blob store abstractions.
//!
//! Records are untyped JSON addressed by slash-separated paths (`jobs/{id}/applicants/{uid}`).
//! Writing `null` removes a node, and nodes left empty disappear, matching the hosted realtime
//! database the portal was built against.

pub mod blob;
pub mod memory;
pub mod paths;
pub mod rest;
#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub use blob::{BlobError, BlobStore, FsBlobStore, InMemoryBlobStore};
pub use memory::InMemoryRealtimeStore;
pub use rest::RestRealtimeStore;

/// Storage abstraction shared by every workflow service.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Reads the node at `path`; `None` when nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the node at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Applies every change (keyed by a path relative to `base`) as one atomic write.
    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError>;

    async fn remove(&self, path: &str) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid key '{0}'")]
    InvalidKey(String),
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("record at '{path}' could not be decoded: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Reads and decodes a single record.
pub async fn read<T, S>(store: &S, path: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: RealtimeStore + ?Sized,
{
    match store.get(path).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                path: path.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encodes and writes a single record.
pub async fn write<T, S>(store: &S, path: &str, record: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: RealtimeStore + ?Sized,
{
    let value = encode(record)?;
    store.set(path, value).await
}

pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(StoreError::Encode)
}

/// Reads every child of `path` as `(key, record)` pairs ordered by key.
///
/// Children that fail to decode are skipped with a warning so one malformed record does not
/// hide the rest of the collection.
pub async fn read_collection<T, S>(store: &S, path: &str) -> Result<Vec<(String, T)>, StoreError>
where
    T: DeserializeOwned,
    S: RealtimeStore + ?Sized,
{
    let children = match store.get(path).await? {
        Some(Value::Object(map)) => map,
        Some(_) | None => return Ok(Vec::new()),
    };

    let ordered: BTreeMap<String, Value> = children.into_iter().collect();
    let mut records = Vec::with_capacity(ordered.len());
    for (key, value) in ordered {
        match serde_json::from_value(value) {
            Ok(record) => records.push((key, record)),
            Err(err) => warn!(%path, %key, error = %err, "skipping malformed record"),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn read_collection_orders_by_key_and_skips_malformed_children() {
        let store = InMemoryRealtimeStore::default();
        store
            .set(
                "people",
                json!({
                    "b": { "name": "Bea" },
                    "a": { "name": "Ari" },
                    "c": { "age": 4 },
                }),
            )
            .await
            .expect("seed");

        let people: Vec<(String, Named)> = read_collection(&store, "people").await.expect("read");

        let keys: Vec<&str> = people.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(people[0].1.name, "Ari");
    }

    #[tokio::test]
    async fn read_reports_decode_failures_with_path() {
        let store = InMemoryRealtimeStore::default();
        store.set("people/x", json!(7)).await.expect("seed");

        match read::<Named, _>(&store, "people/x").await {
            Err(StoreError::Decode { path, .. }) => assert_eq!(path, "people/x"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
