//! Domain layer for the event desk client.
//!
//! Core types shared by every other layer, free of HTTP and runtime concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`event`]: Event, registration and contact models
//! - [`query`]: Page queries (the cache key) and paginated results
//!
//! # Examples
//!
//! ```
//! use eventdesk::domain::{PageQuery, PageSize, Result};
//!
//! fn second_page() -> Result<PageQuery> {
//!     let query = PageQuery { page: 2, limit: PageSize::try_from(20)?, ..PageQuery::default() };
//!     Ok(query)
//! }
//! assert_eq!(second_page().unwrap().page, 2);
//! ```

pub mod error;
pub mod event;
pub mod query;

pub use error::{AppError, Result};
pub use event::{ContactMessage, EventRecord, RegistrationRecord, RegistrationRequest};
pub use query::{page_count, PageQuery, PageResult, PageSize, SortSpec};
