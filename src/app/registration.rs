//! Registration flow for a single event.
//!
//! [`RegistrationFlow`] hosts the registration form in a dialog or a drawer
//! (see [`Presentation`]), validates it before anything is sent, and maps
//! the server's answer back onto the form.
//!
//! # Submission
//!
//! ```text
//! begin_submit ──invalid──▶ field errors, nothing sent
//!      │
//!      ▼
//! EventsApi::register ──▶ finish_submit
//!                            ├─ Ok   → reset, close, on_success, "Successfully registered…"
//!                            ├─ 422  → server field errors (unknown fields dropped)
//!                            ├─ 429  → rate-limit notification
//!                            └─ else → service-unavailable notification + banner
//! ```
//!
//! Values typed by the user survive every failure. Submission is re-enabled
//! after every outcome.
//!
//! The flow does not touch the event list itself;
//! [`TableSession::submit_registration`](super::TableSession::submit_registration)
//! invalidates the cached pages after a success.

use super::modes::Presentation;
use crate::api::{ApiError, EventsApi};
use crate::domain::{EventRecord, RegistrationRecord, RegistrationRequest};
use crate::forms::{
    report_failure, FieldErrors, Notification, RegistrationField, RegistrationForm,
};
use crate::ui::viewmodel::{EventDetails, RegistrationViewModel};

pub const REGISTRATION_TITLE: &str = "Register for Event";
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Successfully registered for the event!";

/// Called with the confirmed registration after a successful submission.
pub type RegistrationCallback = Box<dyn FnMut(&RegistrationRecord) + Send>;

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// The server accepted the submission.
    Succeeded(T),
    /// Client-side validation failed; no request was sent.
    Invalid,
    /// A submission was already pending; nothing was sent.
    AlreadySubmitting,
    /// The server (or the network) rejected the submission.
    Failed(ApiError),
}

impl<T> SubmitOutcome<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Registration form state for one event.
pub struct RegistrationFlow {
    event: EventRecord,
    presentation: Presentation,
    is_open: bool,
    form: RegistrationForm,
    errors: FieldErrors<RegistrationField>,
    banner: Option<String>,
    submitting: bool,
    notifications: Vec<Notification>,
    on_success: Option<RegistrationCallback>,
}

impl std::fmt::Debug for RegistrationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationFlow")
            .field("event_id", &self.event.id)
            .field("presentation", &self.presentation)
            .field("is_open", &self.is_open)
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("banner", &self.banner)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl RegistrationFlow {
    /// Creates a closed flow for `event` in a viewport `viewport_width` pixels wide.
    #[must_use]
    pub fn new(event: EventRecord, viewport_width: u32) -> Self {
        Self {
            event,
            presentation: Presentation::for_viewport_width(viewport_width),
            is_open: false,
            form: RegistrationForm::default(),
            errors: FieldErrors::new(),
            banner: None,
            submitting: false,
            notifications: Vec::new(),
            on_success: None,
        }
    }

    /// Registers a callback run after every successful registration.
    #[must_use]
    pub fn with_on_success(
        mut self,
        callback: impl FnMut(&RegistrationRecord) + Send + 'static,
    ) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn event(&self) -> &EventRecord {
        &self.event
    }

    #[must_use]
    pub const fn presentation(&self) -> Presentation {
        self.presentation
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub const fn form(&self) -> &RegistrationForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<RegistrationField> {
        &self.errors
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes the container. The form is unmounted, so its state is lost.
    pub fn close(&mut self) {
        self.is_open = false;
        self.reset_form();
    }

    /// Re-evaluates the container for a new viewport width.
    ///
    /// Switching between dialog and drawer remounts the form, which resets
    /// its values, errors and banner. Returns whether the container changed.
    pub fn resize(&mut self, viewport_width: u32) -> bool {
        let next = Presentation::for_viewport_width(viewport_width);
        if next == self.presentation {
            return false;
        }

        tracing::debug!(from = ?self.presentation, to = ?next, "registration container swapped");
        self.presentation = next;
        self.reset_form();
        true
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.name = value.into();
        self.errors.clear_field(RegistrationField::Name);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.form.email = value.into();
        self.errors.clear_field(RegistrationField::Email);
    }

    /// Starts a submission: clears the banner and validates the form.
    ///
    /// Returns the request to send, or `None` when a submission is already
    /// pending or the form is invalid (field errors are then attached).
    pub fn begin_submit(&mut self) -> Option<RegistrationRequest> {
        if self.submitting {
            tracing::debug!(event_id = self.event.id, "registration already submitting");
            return None;
        }

        self.banner = None;
        match self.form.to_request() {
            Ok(request) => {
                self.errors.clear();
                self.submitting = true;
                Some(request)
            }
            Err(errors) => {
                tracing::debug!(
                    event_id = self.event.id,
                    fields = errors.iter().count(),
                    "registration form invalid"
                );
                self.errors = errors;
                None
            }
        }
    }

    /// Applies the server's answer to a submission started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(
        &mut self,
        result: Result<RegistrationRecord, ApiError>,
    ) -> SubmitOutcome<RegistrationRecord> {
        self.submitting = false;

        match result {
            Ok(record) => {
                tracing::info!(
                    event_id = self.event.id,
                    registration_id = record.id,
                    "registered for event"
                );
                self.event = record.event.clone();
                self.is_open = false;
                self.reset_form();
                self.notifications
                    .push(Notification::success(REGISTRATION_SUCCESS_MESSAGE));
                if let Some(callback) = self.on_success.as_mut() {
                    callback(&record);
                }
                SubmitOutcome::Succeeded(record)
            }
            Err(error) => {
                tracing::warn!(event_id = self.event.id, error = %error, "registration failed");
                let report = report_failure::<RegistrationField>(&error);
                self.errors = report.field_errors;
                self.notifications.extend(report.notification);
                self.banner = report.banner;
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Validates and submits the form through `api`.
    pub async fn submit(&mut self, api: &dyn EventsApi) -> SubmitOutcome<RegistrationRecord> {
        if self.submitting {
            return SubmitOutcome::AlreadySubmitting;
        }
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Invalid;
        };

        let result = api.register(self.event.id, &request).await;
        self.finish_submit(result)
    }

    /// Takes the notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    #[must_use]
    pub fn compute_viewmodel(&self) -> RegistrationViewModel {
        let details = self.presentation.is_drawer().then(|| EventDetails {
            date: self.event.display_date(),
            location: self.event.location.clone(),
            available_spots: self.event.available_spots,
        });

        RegistrationViewModel {
            title: REGISTRATION_TITLE,
            presentation: self.presentation,
            is_open: self.is_open,
            details,
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            name_error: self.errors.first(RegistrationField::Name).map(str::to_string),
            email_error: self.errors.first(RegistrationField::Email).map(str::to_string),
            banner: self.banner.clone(),
            submit_label: if self.submitting {
                "Registering..."
            } else {
                REGISTRATION_TITLE
            },
            submit_enabled: !self.submitting,
        }
    }

    fn reset_form(&mut self) {
        self.form = RegistrationForm::default();
        self.errors.clear();
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServerFieldErrors;
    use crate::forms::{NotificationLevel, RATE_LIMIT_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event() -> EventRecord {
        EventRecord {
            id: 42,
            name: "RustConf".to_string(),
            location: "Montreal".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
            available_spots: 3,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn record() -> RegistrationRecord {
        let mut event = event();
        event.available_spots = 2;
        RegistrationRecord {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            event,
        }
    }

    fn filled_flow() -> RegistrationFlow {
        let mut flow = RegistrationFlow::new(event(), 1280);
        flow.open();
        flow.set_name("Alice");
        flow.set_email("alice@example.com");
        flow
    }

    #[test]
    fn second_begin_submit_is_rejected_while_pending() {
        let mut flow = filled_flow();

        assert!(flow.begin_submit().is_some());
        assert!(flow.begin_submit().is_none());
        assert!(!flow.compute_viewmodel().submit_enabled);
        assert_eq!(flow.compute_viewmodel().submit_label, "Registering...");
    }

    #[test]
    fn success_resets_closes_and_notifies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut flow = filled_flow().with_on_success(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        flow.begin_submit();
        let outcome = flow.finish_submit(Ok(record()));

        assert!(outcome.is_success());
        assert!(!flow.is_open());
        assert_eq!(flow.form(), &RegistrationForm::default());
        assert_eq!(flow.event().available_spots, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            flow.take_notifications(),
            vec![Notification::success(REGISTRATION_SUCCESS_MESSAGE)]
        );
        assert!(flow.take_notifications().is_empty());
    }

    #[test]
    fn validation_failure_maps_onto_fields_and_keeps_values() {
        let mut flow = filled_flow();
        let mut errors = ServerFieldErrors::new();
        errors.insert("email".to_string(), vec!["Email already registered".to_string()]);

        flow.begin_submit();
        flow.finish_submit(Err(ApiError::Validation {
            errors,
            message: None,
        }));

        assert_eq!(flow.errors().first(RegistrationField::Email), Some("Email already registered"));
        assert!(!flow.errors().contains(RegistrationField::Name));
        assert_eq!(flow.form().name, "Alice");
        assert!(flow.is_open());
        assert!(!flow.is_submitting());
        assert!(flow.take_notifications().is_empty());
    }

    #[test]
    fn rate_limit_only_notifies() {
        let mut flow = filled_flow();
        flow.begin_submit();
        flow.finish_submit(Err(ApiError::RateLimited));

        assert_eq!(flow.banner(), None);
        assert_eq!(
            flow.take_notifications(),
            vec![Notification::error(RATE_LIMIT_MESSAGE)]
        );
    }

    #[test]
    fn other_failures_set_banner_which_next_submit_clears() {
        let mut flow = filled_flow();
        flow.begin_submit();
        flow.finish_submit(Err(ApiError::Status {
            status: 503,
            message: Some("Maintenance".to_string()),
        }));

        assert_eq!(flow.banner(), Some("Maintenance"));
        let notifications = flow.take_notifications();
        assert_eq!(notifications[0].level, NotificationLevel::Error);
        assert_eq!(notifications[0].message, SERVICE_UNAVAILABLE_MESSAGE);

        assert!(flow.begin_submit().is_some());
        assert_eq!(flow.banner(), None);
    }

    #[test]
    fn container_swap_resets_the_form() {
        let mut flow = filled_flow();
        assert!(!flow.resize(1024));
        assert_eq!(flow.form().name, "Alice");

        assert!(flow.resize(400));
        assert_eq!(flow.presentation(), Presentation::Drawer);
        assert_eq!(flow.form(), &RegistrationForm::default());
        assert!(flow.is_open());
    }

    #[test]
    fn drawer_shows_event_details() {
        let flow = RegistrationFlow::new(event(), 375);
        let vm = flow.compute_viewmodel();

        assert_eq!(vm.title, "Register for Event");
        assert_eq!(
            vm.details,
            Some(EventDetails {
                date: "9/2/2025".to_string(),
                location: "Montreal".to_string(),
                available_spots: 3,
            })
        );
        assert_eq!(RegistrationFlow::new(event(), 1024).compute_viewmodel().details, None);
    }
}
