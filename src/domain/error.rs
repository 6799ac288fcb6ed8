//! Error types for the event desk client.
//!
//! This module defines the crate-wide error type [`AppError`] and a type alias
//! [`Result`]. Transport-level failures live in [`ApiError`](crate::api::ApiError)
//! and are wrapped here when they escape an API call that is not a form
//! submission (form submissions turn them into outcomes instead).

use crate::api::ApiError;
use thiserror::Error;

/// The main error type for event desk operations.
///
/// # Examples
///
/// ```
/// use eventdesk::AppError;
///
/// fn load() -> Result<(), AppError> {
///     Err(AppError::Config("api_url must not be empty".to_string()))
/// }
/// assert!(load().is_err());
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed as TOML.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Query parameters could not be turned into a page query.
    ///
    /// Raised when restoring table state from a URL whose parameters are out
    /// of range (page 0, unsupported limit) or malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Remote API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A specialized `Result` type for event desk operations.
pub type Result<T> = std::result::Result<T, AppError>;
