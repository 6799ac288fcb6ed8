//! Eventdesk: a headless client for an event-registration service.
//!
//! Eventdesk provides:
//! - A server-driven events table (pagination, multi-column sorting,
//!   debounced search) with last-request-wins ordering
//! - A shared query cache with namespace invalidation
//! - A registration flow presented as dialog or drawer depending on the
//!   viewport, with client-side validation and server error mapping
//! - A contact form following the same pattern
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machines
//! │  - Table events, actions, session runtime           │
//! │  - Registration and contact flows                   │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Cache Layer   │   │ API Layer     │
//! │ (ui/)         │   │ (cache/)      │   │ (api/)        │
//! │ - View models │   │ - Stale time  │   │ - Traits      │
//! │               │   │ - Namespaces  │   │ - reqwest     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Forms                                     │
//! │  - Events, page queries, errors (domain/)           │
//! │  - Validation, failure mapping (forms/)             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Table state machine, session runtime and form flows
//! - [`api`]: API traits and the HTTP client
//! - [`cache`]: Shared query cache
//! - [`domain`]: Core domain types and errors
//! - [`forms`]: Form models, validation and failure reports
//! - [`ui`]: View models
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! ```toml
//! api_url = "https://api.example.com"
//! search_debounce_ms = 300
//! default_page_size = 10
//! stale_time_secs = 120
//! gc_time_secs = 300
//! request_timeout_secs = 30
//! trace_level = "eventdesk=debug"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use eventdesk::{initialize, Config, Event};
//!
//! # async fn run() -> eventdesk::Result<()> {
//! let config = Config::from_file("eventdesk.toml")?;
//! let desk = initialize(&config)?;
//!
//! let mut table = desk.table_session()?;
//! table.mount().await?;
//! table.dispatch(Event::SearchChanged("rust".into())).await?;
//! table.pump().await?;
//!
//! for row in table.viewmodel().rows {
//!     println!("{} {}", row.date, row.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod cache;
pub mod domain;
pub mod forms;
pub mod observability;
pub mod ui;

pub use app::{
    handle_event, Action, ContactFlow, Event, RegistrationFlow, SubmitOutcome, TableSession,
    TableState,
};
pub use domain::{AppError, Result};

use api::HttpApiClient;
use app::EventsCache;
use domain::{EventRecord, PageSize};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Client configuration.
///
/// Every field but `api_url` has a default, so a minimal TOML file is a
/// single line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the events API, e.g. `https://api.example.com`.
    pub api_url: String,

    /// Quiet period before a search is sent. Default: 300
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Initial page size; one of 10, 20, 50, 100. Default: 10
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// How long a cached page is served without a request. Default: 120
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,

    /// How long any cached page is kept before eviction. Default: 300
    #[serde(default = "default_gc_time_secs")]
    pub gc_time_secs: u64,

    /// Per-request timeout. Default: 30
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or a full
    /// directive such as `eventdesk=debug`. Default: `"info"`
    #[serde(default)]
    pub trace_level: Option<String>,
}

const fn default_search_debounce_ms() -> u64 {
    300
}

const fn default_page_size() -> u32 {
    10
}

const fn default_stale_time_secs() -> u64 {
    120
}

const fn default_gc_time_secs() -> u64 {
    300
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Configuration with defaults for everything but the API root.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            search_debounce_ms: default_search_debounce_ms(),
            default_page_size: default_page_size(),
            stale_time_secs: default_stale_time_secs(),
            gc_time_secs: default_gc_time_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            trace_level: None,
        }
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConfigParse`] for malformed TOML, missing
    /// `api_url` or unknown keys, and [`AppError::Config`] for values out of
    /// range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eventdesk::Config;
    ///
    /// let config = Config::from_toml_str(r#"
    ///     api_url = "http://localhost:8080"
    ///     default_page_size = 20
    /// "#)?;
    /// assert_eq!(config.default_page_size, 20);
    /// assert_eq!(config.search_debounce_ms, 300);
    /// # Ok::<(), eventdesk::AppError>(())
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the file cannot be read, otherwise the
    /// errors of [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "configuration file read");
        Self::from_toml_str(&raw)
    }

    /// Checks values that the type system does not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(AppError::Config("api_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.page_size()?;
        Ok(())
    }

    /// The configured initial page size.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if it is not 10, 20, 50 or 100.
    pub fn page_size(&self) -> Result<PageSize> {
        PageSize::try_from(self.default_page_size)
            .map_err(|_| AppError::Config(format!(
                "default_page_size must be one of 10, 20, 50, 100, got {}",
                self.default_page_size
            )))
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub const fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    #[must_use]
    pub const fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_time_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Wired-up client: HTTP access plus the cache shared by every table.
#[derive(Debug, Clone)]
pub struct EventDesk {
    config: Config,
    api: Arc<HttpApiClient>,
    cache: Arc<EventsCache>,
}

impl EventDesk {
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn api(&self) -> Arc<HttpApiClient> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn cache(&self) -> Arc<EventsCache> {
        Arc::clone(&self.cache)
    }

    /// Starts a table session over the shared cache.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the configured page size is invalid.
    pub fn table_session(&self) -> Result<TableSession> {
        Ok(TableSession::new(
            self.api(),
            self.cache(),
            self.config.search_debounce(),
            self.config.page_size()?,
        ))
    }

    /// Registration flow for `event` in a viewport `viewport_width` pixels wide.
    #[must_use]
    pub fn registration_flow(&self, event: EventRecord, viewport_width: u32) -> RegistrationFlow {
        RegistrationFlow::new(event, viewport_width)
    }

    /// Validates and sends the contact form.
    pub async fn submit_contact(&self, flow: &mut ContactFlow) -> SubmitOutcome<()> {
        flow.submit(self.api.as_ref()).await
    }
}

/// Initializes the client with configuration.
///
/// Installs the tracing subscriber, validates the configuration, builds the
/// HTTP client and creates the shared cache.
///
/// # Errors
///
/// Returns [`AppError::Config`] for invalid configuration or an unusable
/// `api_url`.
///
/// # Example
///
/// ```rust
/// use eventdesk::{initialize, Config};
///
/// let desk = initialize(&Config::new("http://localhost:8080"))?;
/// assert_eq!(desk.config().stale_time_secs, 120);
/// # Ok::<(), eventdesk::AppError>(())
/// ```
pub fn initialize(config: &Config) -> Result<EventDesk> {
    observability::init_tracing(config);
    tracing::debug!(api_url = %config.api_url, "initializing eventdesk");

    config.validate()?;
    let api = HttpApiClient::new(&config.api_url, config.request_timeout())?;

    Ok(EventDesk {
        config: config.clone(),
        api: Arc::new(api),
        cache: Arc::new(EventsCache::new(config.stale_time()).with_gc_time(config.gc_time())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_takes_defaults() {
        let config = Config::from_toml_str(r#"api_url = "https://api.example.com""#).unwrap();
        assert_eq!(config, Config::new("https://api.example.com"));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.page_size().unwrap(), PageSize::Ten);
        assert_eq!(config.gc_time(), Duration::from_secs(300));
    }

    #[test]
    fn missing_api_url_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("search_debounce_ms = 100"),
            Err(AppError::ConfigParse(_))
        ));
    }

    #[test]
    fn unsupported_page_size_is_rejected() {
        let raw = "api_url = \"http://localhost\"\ndefault_page_size = 15";
        assert!(matches!(Config::from_toml_str(raw), Err(AppError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = "api_url = \"http://localhost\"\ntheme = \"dark\"";
        assert!(matches!(Config::from_toml_str(raw), Err(AppError::ConfigParse(_))));
    }
}
