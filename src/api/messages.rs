//! Wire envelopes exchanged with the events API.
//!
//! These types mirror the JSON the server sends and receives. They are kept
//! apart from the domain types so the envelope layout (`items` + `meta`,
//! `errors` maps with string-or-list values) never leaks past the client.

use super::error::{ApiError, ServerFieldErrors};
use crate::domain::{EventRecord, PageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paginated list envelope: `{items, meta: {total, page, limit}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedEnvelope<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata of a list envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl PaginatedEnvelope<EventRecord> {
    /// Converts the envelope into a domain page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the server sent more items than its
    /// own limit allows.
    pub fn into_page(self) -> Result<PageResult<EventRecord>, ApiError> {
        if self.items.len() > self.meta.limit as usize {
            return Err(ApiError::Decode(format!(
                "page holds {} items but limit is {}",
                self.items.len(),
                self.meta.limit
            )));
        }

        Ok(PageResult {
            items: self.items,
            total: self.meta.total,
            page: self.meta.page,
            limit: self.meta.limit,
        })
    }
}

/// A field error value as sent by the server: one message or several.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum MessageOrList {
    One(String),
    Many(Vec<String>),
}

impl MessageOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(message) => vec![message],
            Self::Many(messages) => messages,
        }
    }
}

/// Error body: `{errors?: {field: message | [message]}, message?: string}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    errors: Option<BTreeMap<String, MessageOrList>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parses an error body, falling back to an empty body on anything that
    /// is not the documented JSON shape (HTML error pages, empty bodies).
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Field errors normalized to message lists; fields with no message are dropped.
    #[must_use]
    pub fn field_errors(&self) -> ServerFieldErrors {
        self.errors
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|(field, messages)| (field, messages.into_vec()))
            .filter(|(_, messages)| !messages.is_empty())
            .collect()
    }
}

/// Maps a non-success status and its body onto the failure taxonomy.
///
/// # Example
///
/// ```rust
/// use eventdesk::api::{classify_failure, ApiError};
///
/// let error = classify_failure(422, br#"{"errors":{"email":"Email already registered"}}"#);
/// assert!(matches!(error, ApiError::Validation { .. }));
/// assert_eq!(classify_failure(429, b""), ApiError::RateLimited);
/// ```
#[must_use]
pub fn classify_failure(status: u16, body: &[u8]) -> ApiError {
    match status {
        422 => {
            let body = ErrorBody::parse(body);
            ApiError::Validation {
                errors: body.field_errors(),
                message: body.message,
            }
        }
        429 => ApiError::RateLimited,
        _ => ApiError::Status {
            status,
            message: ErrorBody::parse(body).message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_accept_strings_and_lists() {
        let error = classify_failure(
            422,
            br#"{"message":"Invalid data","errors":{"email":["Email already registered","Too long"],"name":"Too short","phone":[]}}"#,
        );

        let ApiError::Validation { errors, message } = error else {
            panic!("expected validation error");
        };
        assert_eq!(message.as_deref(), Some("Invalid data"));
        assert_eq!(errors["email"], vec!["Email already registered", "Too long"]);
        assert_eq!(errors["name"], vec!["Too short"]);
        assert!(!errors.contains_key("phone"));
    }

    #[test]
    fn non_json_bodies_still_classify() {
        assert_eq!(
            classify_failure(503, b"<html>Bad gateway</html>"),
            ApiError::Status {
                status: 503,
                message: None
            }
        );
        assert_eq!(
            classify_failure(422, b""),
            ApiError::Validation {
                errors: ServerFieldErrors::new(),
                message: None
            }
        );
    }

    #[test]
    fn generic_status_keeps_server_message() {
        let error = classify_failure(409, br#"{"message":"Event is full"}"#);
        assert_eq!(error.server_message(), Some("Event is full"));
        assert_eq!(error.status(), Some(409));
    }

    #[test]
    fn envelope_larger_than_limit_is_rejected() {
        let envelope: PaginatedEnvelope<EventRecord> = serde_json::from_str(
            r#"{"items":[
                {"id":1,"name":"a","location":"x","date":"2025-01-01","available_spots":1,"created_at":"2025-01-01T00:00:00Z"},
                {"id":2,"name":"b","location":"y","date":"2025-01-02","available_spots":1,"created_at":"2025-01-01T00:00:00Z"}
            ],"meta":{"total":2,"page":1,"limit":1}}"#,
        )
        .unwrap();

        assert!(matches!(envelope.into_page(), Err(ApiError::Decode(_))));
    }
}
