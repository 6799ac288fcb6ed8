//! Remote API access for events, registrations and contact messages.
//!
//! The controllers never talk HTTP directly. They go through the
//! [`EventsApi`] and [`ContactApi`] traits so the runtime can be driven by
//! [`HttpApiClient`] in production and by in-memory fakes in tests.
//!
//! # Modules
//!
//! - `error`: [`ApiError`] failure taxonomy (422 / 429 / status / transport / decode)
//! - `messages`: Wire envelopes and status classification
//! - `http`: `reqwest`-backed client

pub mod error;
pub mod http;
pub mod messages;

pub use error::{ApiError, ServerFieldErrors};
pub use http::HttpApiClient;
pub use messages::{classify_failure, ErrorBody, PageMeta, PaginatedEnvelope};

use crate::domain::{
    ContactMessage, EventRecord, PageQuery, PageResult, RegistrationRecord, RegistrationRequest,
};
use async_trait::async_trait;

/// Access to the event list and registration endpoints.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetches one page of events for the given query.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] describing the failed request.
    async fn list_events(&self, query: &PageQuery) -> Result<PageResult<EventRecord>, ApiError>;

    /// Registers a visitor for an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the server rejects fields,
    /// [`ApiError::RateLimited`] on 429, and other variants for anything else.
    async fn register(
        &self,
        event_id: i64,
        request: &RegistrationRequest,
    ) -> Result<RegistrationRecord, ApiError>;
}

/// Access to the contact-us endpoint.
#[async_trait]
pub trait ContactApi: Send + Sync {
    /// Sends a contact message.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`EventsApi::register`].
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError>;
}
