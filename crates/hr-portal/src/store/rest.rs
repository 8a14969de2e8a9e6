use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::{RealtimeStore, StoreError};

/// Realtime database reached through its REST surface (`{base}/{path}.json`).
///
/// `PATCH` carries multi-path updates, so `update` keeps its single-write semantics remotely.
#[derive(Debug, Clone)]
pub struct RestRealtimeStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestRealtimeStore {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, auth_token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            auth_token,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RealtimeStore for RestRealtimeStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        debug!(%path, "store read");
        let response = self.send(self.client.get(self.url_for(path))).await?;
        let value: Value = response.json().await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        debug!(%path, "store write");
        self.send(self.client.put(self.url_for(path)).json(&value))
            .await?;
        Ok(())
    }

    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError> {
        debug!(%base, paths = changes.len(), "store multi-path update");
        let body: serde_json::Map<String, Value> = changes
            .into_iter()
            .map(|(path, value)| (path.trim_matches('/').to_string(), value))
            .collect();
        self.send(self.client.patch(self.url_for(base)).json(&body))
            .await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        debug!(%path, "store delete");
        self.send(self.client.delete(self.url_for(path))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_appends_json_suffix() {
        let store = RestRealtimeStore::new("https://hr.example.test/", None);
        assert_eq!(
            store.url_for("jobs/job_1/applicants/u1"),
            "https://hr.example.test/jobs/job_1/applicants/u1.json"
        );
        assert_eq!(store.url_for("/"), "https://hr.example.test/.json");
    }
}
