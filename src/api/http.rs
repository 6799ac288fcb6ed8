//! `reqwest`-backed implementation of the API traits.

use super::error::ApiError;
use super::messages::{classify_failure, PaginatedEnvelope};
use super::{ContactApi, EventsApi};
use crate::domain::error::{AppError, Result};
use crate::domain::{
    ContactMessage, EventRecord, PageQuery, PageResult, RegistrationRecord, RegistrationRequest,
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the events backend.
///
/// Events live under `{api_url}/v1/events`, the contact form posts to
/// `{api_url}/auth/contact-us`. Requests are sent once: list fetches are
/// never retried so server errors surface instead of hiding behind retries.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Builds a client for the given API root.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `api_url` is not an absolute http(s)
    /// URL or the underlying client cannot be constructed.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(api_url)
            .map_err(|e| AppError::Config(format!("invalid api_url {api_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "api_url must use http or https, got {}",
                base_url.scheme()
            )));
        }
        // Url::join drops the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    /// Decodes a success body or classifies the failure.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
    ) -> std::result::Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(ApiError::from);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), &body))
    }
}

#[async_trait]
impl EventsApi for HttpApiClient {
    async fn list_events(
        &self,
        query: &PageQuery,
    ) -> std::result::Result<PageResult<EventRecord>, ApiError> {
        tracing::debug!(
            page = query.page,
            limit = query.limit.get(),
            sorts = query.sorts.len(),
            "requesting events page"
        );

        let url = self.endpoint("v1/events")?;
        let response = self
            .http
            .get(url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let envelope: PaginatedEnvelope<EventRecord> = Self::read_json(response).await?;
        let page = envelope.into_page()?;

        tracing::debug!(items = page.items.len(), total = page.total, "events page received");
        Ok(page)
    }

    async fn register(
        &self,
        event_id: i64,
        request: &RegistrationRequest,
    ) -> std::result::Result<RegistrationRecord, ApiError> {
        let url = self.endpoint(&format!("v1/events/{event_id}/register"))?;
        let response = self.http.post(url).json(request).send().await?;

        let record: RegistrationRecord = Self::read_json(response).await?;
        tracing::debug!(event_id, registration_id = record.id, "registration accepted");
        Ok(record)
    }
}

#[async_trait]
impl ContactApi for HttpApiClient {
    async fn send_contact(&self, message: &ContactMessage) -> std::result::Result<(), ApiError> {
        let url = self.endpoint("auth/contact-us")?;
        let response = self.http.post(url).json(message).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "contact message accepted");
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), &body))
    }
}
