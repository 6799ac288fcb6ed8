//! Form models, client-side validation and server error mapping.
//!
//! Both forms follow the same shape: values live in a plain struct validated
//! with `validator`, errors are collected per field in [`FieldErrors`], and a
//! failed submission is turned into a [`FailureReport`] that says which
//! field errors to show, which notification to raise, and whether the form
//! gets a persistent banner.
//!
//! # Modules
//!
//! - `registration`: Event registration form (name, email)
//! - `contact`: Contact form (name, email, message, newsletter)

pub mod contact;
pub mod registration;

pub use contact::{ContactField, ContactForm, LengthBound, MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS};
pub use registration::{RegistrationField, RegistrationForm, NAME_MIN_CHARS};

use crate::api::{ApiError, ServerFieldErrors};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

/// Notification shown when the server answers 429.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";

/// Notification shown for any other failed submission.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Service is not available at the moment. Please try again later.";

/// Banner text when the server gave no message of its own.
pub const FALLBACK_BANNER_MESSAGE: &str = "An unexpected error occurred. Please try again.";

pub(crate) const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// A field of a specific form.
///
/// Server field names that do not map onto a variant are dropped when
/// server errors are applied.
pub trait FormField: Copy + Ord + std::fmt::Debug {
    /// Looks up a field by its wire name.
    fn from_name(name: &str) -> Option<Self>;

    /// Wire name of the field.
    fn name(self) -> &'static str;
}

/// Per-field error messages attached to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: FormField> {
    errors: BTreeMap<F, Vec<String>>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds errors from a server 422 body, silently dropping unknown fields.
    #[must_use]
    pub fn from_server(server: &ServerFieldErrors) -> Self {
        let mut errors = Self::new();
        for (name, messages) in server {
            match F::from_name(name) {
                Some(field) => {
                    for message in messages {
                        errors.push(field, message.clone());
                    }
                }
                None => tracing::debug!(field = %name, "dropping server error for unknown field"),
            }
        }
        errors
    }

    /// Builds errors from `validator` output.
    #[must_use]
    pub fn from_validation(validation: &ValidationErrors) -> Self {
        let mut errors = Self::new();
        for (name, failures) in validation.field_errors() {
            let Some(field) = F::from_name(&name) else {
                continue;
            };
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map_or_else(|| failure.code.to_string(), ToString::to_string);
                errors.push(field, message);
            }
        }
        errors
    }

    pub fn push(&mut self, field: F, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// First (displayed) message for a field.
    #[must_use]
    pub fn first(&self, field: F) -> Option<&str> {
        self.errors
            .get(&field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages for a field.
    #[must_use]
    pub fn messages(&self, field: F) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.errors.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Drops the errors of a single field (e.g. after the user edits it).
    pub fn clear_field(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (*field, messages.as_slice()))
    }
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient (toast-style) notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// What a form shows after a failed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport<F: FormField> {
    /// Field errors to attach (only for 422).
    pub field_errors: FieldErrors<F>,
    /// Transient notification (429 and generic failures).
    pub notification: Option<Notification>,
    /// Persistent inline banner text (generic failures only).
    pub banner: Option<String>,
}

/// Maps a submission failure onto what the form should display.
///
/// - 422: server field errors mapped onto `F`, nothing else.
/// - 429: rate-limit notification only.
/// - anything else: service-unavailable notification plus a banner with the
///   server's message or a generic fallback.
#[must_use]
pub fn report_failure<F: FormField>(error: &ApiError) -> FailureReport<F> {
    match error {
        ApiError::Validation { errors, .. } => FailureReport {
            field_errors: FieldErrors::from_server(errors),
            notification: None,
            banner: None,
        },
        ApiError::RateLimited => FailureReport {
            field_errors: FieldErrors::new(),
            notification: Some(Notification::error(RATE_LIMIT_MESSAGE)),
            banner: None,
        },
        ApiError::Status { .. } | ApiError::Transport(_) | ApiError::Decode(_) => FailureReport {
            field_errors: FieldErrors::new(),
            notification: Some(Notification::error(SERVICE_UNAVAILABLE_MESSAGE)),
            banner: Some(
                error
                    .server_message()
                    .unwrap_or(FALLBACK_BANNER_MESSAGE)
                    .to_string(),
            ),
        },
    }
}

/// Builds a validation error with a user-facing message.
pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Shared email check: required, then well-formed.
pub(crate) fn check_email(
    value: &str,
    required_message: &'static str,
) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error("required", required_message));
    }
    if !trimmed.to_owned().validate_email() {
        return Err(field_error("email", INVALID_EMAIL_MESSAGE));
    }
    Ok(())
}
