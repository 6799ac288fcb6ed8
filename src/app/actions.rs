//! Side effects requested by the table event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O itself. It mutates
//! [`TableState`](super::TableState) and returns a `Vec<Action>` describing
//! what should happen next; [`TableSession`](super::TableSession) executes
//! them in order.
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::Action;
//! use eventdesk::domain::PageQuery;
//!
//! let actions = vec![
//!     Action::DebounceSearch("rust".to_string()),
//!     Action::Fetch(PageQuery::default()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::PageQuery;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Loads a page, answering from the cache when a fresh entry exists.
    ///
    /// A request for a query that is already in flight is not issued twice.
    Fetch(PageQuery),

    /// Loads a page from the server, ignoring any cached entry.
    Refetch(PageQuery),

    /// Feeds the raw search input to the debouncer.
    ///
    /// The settled value comes back as
    /// [`Event::SearchSettled`](super::Event::SearchSettled).
    DebounceSearch(String),
}

impl Action {
    /// Query this action would load, if it loads one.
    #[must_use]
    pub const fn query(&self) -> Option<&PageQuery> {
        match self {
            Self::Fetch(query) | Self::Refetch(query) => Some(query),
            Self::DebounceSearch(_) => None,
        }
    }
}
