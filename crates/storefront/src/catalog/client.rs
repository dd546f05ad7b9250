//! Remote catalog HTTP client.
//!
//! Five operations over one collection resource:
//!
//! | Operation | Request          |
//! |-----------|------------------|
//! | list      | `GET {base}`     |
//! | get       | `GET {base}/{id}`|
//! | create    | `POST {base}`    |
//! | replace   | `PUT {base}/{id}`|
//! | delete    | `DELETE {base}/{id}` |
//!
//! No retries and no caching. The only failure handling is the request
//! timeout configured on the underlying `reqwest` client; any non-2xx status
//! or transport error is returned to the caller.

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use techstore_core::{Item, ItemDraft, ItemId};

use super::conversions::{ItemPayload, ItemRecord, convert_item_list};
use crate::config::CatalogConfig;

/// Errors talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// Network failure, timeout, or client construction failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed as JSON but failed field checks.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// The identifier cannot be placed in the resource URL.
    #[error("invalid item URL for id {0}")]
    InvalidUrl(ItemId),
}

/// The catalog operations the stores depend on.
///
/// Implemented by [`HttpCatalogClient`] for the real service and by in-memory
/// fakes in tests.
pub trait CatalogApi: Send + Sync {
    /// Fetch every item in the collection.
    fn list(&self) -> impl Future<Output = Result<Vec<Item>, CatalogClientError>> + Send;

    /// Fetch one item.
    fn get(&self, id: &ItemId) -> impl Future<Output = Result<Item, CatalogClientError>> + Send;

    /// Create an item; the service assigns its identifier.
    fn create(
        &self,
        draft: &ItemDraft,
    ) -> impl Future<Output = Result<Item, CatalogClientError>> + Send;

    /// Replace every field of an existing item.
    fn replace(
        &self,
        id: &ItemId,
        draft: &ItemDraft,
    ) -> impl Future<Output = Result<Item, CatalogClientError>> + Send;

    /// Delete an item.
    fn delete(&self, id: &ItemId) -> impl Future<Output = Result<(), CatalogClientError>> + Send;
}

// =============================================================================
// HttpCatalogClient
// =============================================================================

/// Client for the remote catalog collection.
#[derive(Clone)]
pub struct HttpCatalogClient {
    inner: Arc<HttpCatalogClientInner>,
}

struct HttpCatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpCatalogClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The collection URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn item_url(&self, id: &ItemId) -> Result<Url, CatalogClientError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogClientError::InvalidUrl(id.clone()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, CatalogClientError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog service returned non-success status"
            );
            return Err(CatalogClientError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogClientError> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogClientError::Parse(e)
        })
    }
}

impl CatalogApi for HttpCatalogClient {
    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<Item>, CatalogClientError> {
        let request = self.inner.client.get(self.inner.base_url.clone());
        let records: Vec<serde_json::Value> = self.execute_json(request).await?;
        let items = convert_item_list(records);
        debug!(count = items.len(), "Fetched catalog");
        Ok(items)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &ItemId) -> Result<Item, CatalogClientError> {
        let request = self.inner.client.get(self.item_url(id)?);
        let record: ItemRecord = self.execute_json(request).await?;
        Item::try_from(record)
    }

    #[instrument(skip_all, fields(name = %draft.name))]
    async fn create(&self, draft: &ItemDraft) -> Result<Item, CatalogClientError> {
        let request = self
            .inner
            .client
            .post(self.inner.base_url.clone())
            .json(&ItemPayload::from(draft));
        let record: ItemRecord = self.execute_json(request).await?;
        let item = Item::try_from(record)?;
        debug!(id = %item.id, "Created catalog item");
        Ok(item)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn replace(&self, id: &ItemId, draft: &ItemDraft) -> Result<Item, CatalogClientError> {
        let request = self
            .inner
            .client
            .put(self.item_url(id)?)
            .json(&ItemPayload::from(draft));
        let record: ItemRecord = self.execute_json(request).await?;
        Item::try_from(record)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &ItemId) -> Result<(), CatalogClientError> {
        let request = self.inner.client.delete(self.item_url(id)?);
        self.execute(request).await?;
        Ok(())
    }
}
