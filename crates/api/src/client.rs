use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::{AggregateStats, ApiError, InventoryRecord, RecordFields};

/// Trim a search term; empty or whitespace-only input means "no filter".
pub fn normalize_search(term: &str) -> Option<&str> {
    let trimmed = term.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Request/response gateway to the inventory service.
///
/// Implemented over HTTP in production and by in-process fakes in engine
/// tests, so the refresh pipeline never needs a live service to be exercised.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Full replacement snapshot, optionally narrowed by a search term.
    async fn list_inventory(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<InventoryRecord>, ApiError>;

    async fn get_stats(&self) -> Result<AggregateStats, ApiError>;

    async fn create_inventory(&self, fields: &RecordFields)
        -> Result<InventoryRecord, ApiError>;

    async fn update_inventory(
        &self,
        id: i64,
        fields: &RecordFields,
    ) -> Result<InventoryRecord, ApiError>;

    async fn delete_inventory(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    root: String,
}

impl HttpInventoryClient {
    pub fn new(root: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("shelfwatch/0.1")
            .build()?;
        Ok(Self {
            client,
            root: root.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.root)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn list_inventory(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<InventoryRecord>, ApiError> {
        let mut request = self.client.get(self.endpoint("/api/inventory"));
        if let Some(term) = search.and_then(normalize_search) {
            request = request.query(&[("search", term)]);
        }
        Self::decode(request.send().await?).await
    }

    async fn get_stats(&self) -> Result<AggregateStats, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/api/inventory/stats"))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_inventory(
        &self,
        fields: &RecordFields,
    ) -> Result<InventoryRecord, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/inventory"))
            .json(fields)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_inventory(
        &self,
        id: i64,
        fields: &RecordFields,
    ) -> Result<InventoryRecord, ApiError> {
        let response = self
            .client
            .put(self.endpoint(&format!("/api/inventory/{id}")))
            .json(fields)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_inventory(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/api/inventory/{id}")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
