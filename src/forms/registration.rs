//! Event registration form.

use super::{check_email, field_error, FieldErrors, FormField};
use crate::domain::RegistrationRequest;
use validator::{Validate, ValidationError};

/// Minimum length of the registrant's name, in characters.
pub const NAME_MIN_CHARS: usize = 2;

/// Fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    Name,
    Email,
}

impl FormField for RegistrationField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

/// Values typed into the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RegistrationForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_registration_email"))]
    pub email: String,
}

impl RegistrationForm {
    /// Validates the values and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors when any field is invalid; in that case
    /// no request must be sent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eventdesk::forms::{RegistrationField, RegistrationForm};
    ///
    /// let short = RegistrationForm { name: "A".into(), email: "a@b.com".into() };
    /// let errors = short.to_request().unwrap_err();
    /// assert_eq!(
    ///     errors.first(RegistrationField::Name),
    ///     Some("Name must be at least 2 characters")
    /// );
    ///
    /// let ok = RegistrationForm { name: "Al".into(), email: "a@b.com".into() };
    /// assert_eq!(ok.to_request().unwrap().name, "Al");
    /// ```
    pub fn to_request(&self) -> Result<RegistrationRequest, FieldErrors<RegistrationField>> {
        self.validate()
            .map_err(|errors| FieldErrors::from_validation(&errors))?;

        Ok(RegistrationRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(field_error("required", "Name is required"));
    }
    if length < NAME_MIN_CHARS {
        return Err(field_error("min", "Name must be at least 2 characters"));
    }
    Ok(())
}

fn validate_registration_email(email: &str) -> Result<(), ValidationError> {
    check_email(email, "Email is required")
}
