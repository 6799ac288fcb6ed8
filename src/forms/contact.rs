//! Contact form.
//!
//! Besides the shared name/email checks, the message body has both a lower
//! and an upper length bound. The violated bound is reported twice: in the
//! message text (which cites the limit) and as a typed [`LengthBound`] so a
//! renderer can localize it.

use super::{check_email, field_error, FieldErrors, FormField};
use crate::domain::ContactMessage;
use validator::{Validate, ValidationError};

pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 500;

const REQUIRED_MESSAGE: &str = "This field is required";

/// Fields of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Email,
    Message,
    Newsletter,
}

impl FormField for ContactField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "message" => Some(Self::Message),
            "newsletter" => Some(Self::Newsletter),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
            Self::Newsletter => "newsletter",
        }
    }
}

/// Which length limit of the message was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    Min(usize),
    Max(usize),
}

/// Values typed into the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactForm {
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[validate(custom(function = "validate_contact_email"))]
    pub email: String,
    #[validate(custom(function = "validate_message"))]
    pub message: String,
    pub newsletter: bool,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            newsletter: true,
        }
    }
}

impl ContactForm {
    /// Validates the values and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors when any field is invalid.
    pub fn to_message(&self) -> Result<ContactMessage, FieldErrors<ContactField>> {
        self.validate()
            .map_err(|errors| FieldErrors::from_validation(&errors))?;

        Ok(ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.clone(),
            newsletter: self.newsletter,
        })
    }

    /// The length bound the current message breaks, if any.
    ///
    /// An empty message reports the lower bound.
    #[must_use]
    pub fn message_violation(&self) -> Option<LengthBound> {
        message_length_violation(&self.message)
    }
}

/// Checks a message body against the length bounds.
///
/// # Example
///
/// ```rust
/// use eventdesk::forms::contact::{message_length_violation, LengthBound};
///
/// assert_eq!(message_length_violation(&"x".repeat(9)), Some(LengthBound::Min(10)));
/// assert_eq!(message_length_violation(&"x".repeat(501)), Some(LengthBound::Max(500)));
/// assert_eq!(message_length_violation(&"x".repeat(250)), None);
/// ```
#[must_use]
pub fn message_length_violation(message: &str) -> Option<LengthBound> {
    let length = message.chars().count();
    if length < MESSAGE_MIN_CHARS {
        Some(LengthBound::Min(MESSAGE_MIN_CHARS))
    } else if length > MESSAGE_MAX_CHARS {
        Some(LengthBound::Max(MESSAGE_MAX_CHARS))
    } else {
        None
    }
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", REQUIRED_MESSAGE));
    }
    Ok(())
}

fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    check_email(email, REQUIRED_MESSAGE)
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(field_error("required", REQUIRED_MESSAGE));
    }

    match message_length_violation(message) {
        Some(LengthBound::Min(count)) => {
            let mut error = field_error("min", "This field must be at least 10 characters");
            error.add_param("count".into(), &count);
            Err(error)
        }
        Some(LengthBound::Max(count)) => {
            let mut error = field_error("max", "This field must not exceed 500 characters");
            error.add_param("count".into(), &count);
            Err(error)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_message(message: String) -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message,
            newsletter: false,
        }
    }

    #[test]
    fn newsletter_defaults_to_opted_in() {
        assert!(ContactForm::default().newsletter);
    }

    #[test]
    fn short_message_cites_the_minimum() {
        let form = form_with_message("x".repeat(9));
        let errors = form.to_message().unwrap_err();

        assert_eq!(
            errors.first(ContactField::Message),
            Some("This field must be at least 10 characters")
        );
        assert_eq!(form.message_violation(), Some(LengthBound::Min(10)));
    }

    #[test]
    fn long_message_cites_the_maximum() {
        let form = form_with_message("x".repeat(501));
        let errors = form.to_message().unwrap_err();

        assert_eq!(
            errors.first(ContactField::Message),
            Some("This field must not exceed 500 characters")
        );
        assert_eq!(form.message_violation(), Some(LengthBound::Max(500)));
    }

    #[test]
    fn message_within_bounds_passes() {
        let message = form_with_message("x".repeat(250)).to_message().unwrap();
        assert_eq!(message.message.len(), 250);
        assert!(!message.newsletter);
    }

    #[test]
    fn empty_form_requires_every_text_field() {
        let errors = ContactForm::default().to_message().unwrap_err();
        for field in [ContactField::Name, ContactField::Email, ContactField::Message] {
            assert_eq!(errors.first(field), Some("This field is required"));
        }
        assert!(!errors.contains(ContactField::Newsletter));
    }
}
