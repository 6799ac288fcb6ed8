//! Contact dialog flow.
//!
//! Same pattern as the registration flow: validate locally, send through
//! [`ContactApi`], map the failure taxonomy onto the form. Unlike
//! registration there is no persistent banner and only one container.

use super::registration::SubmitOutcome;
use crate::api::{ApiError, ContactApi};
use crate::domain::ContactMessage;
use crate::forms::{
    report_failure, ContactField, ContactForm, FieldErrors, LengthBound, Notification,
};
use crate::ui::viewmodel::ContactViewModel;

pub const CONTACT_SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// Called with the sent message after a successful submission.
pub type ContactCallback = Box<dyn FnMut(&ContactMessage) + Send>;

/// Contact form state.
pub struct ContactFlow {
    is_open: bool,
    form: ContactForm,
    errors: FieldErrors<ContactField>,
    submitting: bool,
    notifications: Vec<Notification>,
    on_success: Option<ContactCallback>,
}

impl std::fmt::Debug for ContactFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactFlow")
            .field("is_open", &self.is_open)
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl Default for ContactFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_open: false,
            form: ContactForm::default(),
            errors: FieldErrors::new(),
            submitting: false,
            notifications: Vec::new(),
            on_success: None,
        }
    }

    #[must_use]
    pub fn with_on_success(
        mut self,
        callback: impl FnMut(&ContactMessage) + Send + 'static,
    ) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub const fn form(&self) -> &ContactForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<ContactField> {
        &self.errors
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Which message length bound is currently broken, if any.
    #[must_use]
    pub fn message_violation(&self) -> Option<LengthBound> {
        self.form.message_violation()
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes the dialog and discards whatever was typed.
    pub fn close(&mut self) {
        self.is_open = false;
        self.form = ContactForm::default();
        self.errors.clear();
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.name = value.into();
        self.errors.clear_field(ContactField::Name);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.form.email = value.into();
        self.errors.clear_field(ContactField::Email);
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.form.message = value.into();
        self.errors.clear_field(ContactField::Message);
    }

    pub fn set_newsletter(&mut self, subscribe: bool) {
        self.form.newsletter = subscribe;
    }

    /// Validates the form and marks it as submitting.
    ///
    /// Returns `None` when already submitting or invalid.
    pub fn begin_submit(&mut self) -> Option<ContactMessage> {
        if self.submitting {
            return None;
        }

        match self.form.to_message() {
            Ok(message) => {
                self.errors.clear();
                self.submitting = true;
                Some(message)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<ContactMessage, ApiError>) -> SubmitOutcome<()> {
        self.submitting = false;

        match result {
            Ok(message) => {
                tracing::info!(newsletter = message.newsletter, "contact message sent");
                self.notifications.push(Notification::success(CONTACT_SUCCESS_MESSAGE));
                if let Some(callback) = self.on_success.as_mut() {
                    callback(&message);
                }
                self.form = ContactForm::default();
                self.errors.clear();
                self.is_open = false;
                SubmitOutcome::Succeeded(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "contact message failed");
                let report = report_failure::<ContactField>(&error);
                self.errors = report.field_errors;
                self.notifications.extend(report.notification);
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Validates and sends the message through `api`.
    pub async fn submit(&mut self, api: &dyn ContactApi) -> SubmitOutcome<()> {
        if self.submitting {
            return SubmitOutcome::AlreadySubmitting;
        }
        let Some(message) = self.begin_submit() else {
            return SubmitOutcome::Invalid;
        };

        let result = api.send_contact(&message).await.map(|()| message);
        self.finish_submit(result)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    #[must_use]
    pub fn compute_viewmodel(&self) -> ContactViewModel {
        let error = |field| self.errors.first(field).map(str::to_string);

        ContactViewModel {
            is_open: self.is_open,
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            message: self.form.message.clone(),
            newsletter: self.form.newsletter,
            name_error: error(ContactField::Name),
            email_error: error(ContactField::Email),
            message_error: error(ContactField::Message),
            submit_label: if self.submitting { "Sending..." } else { "Submit" },
            submit_enabled: !self.submitting,
        }
    }
}
