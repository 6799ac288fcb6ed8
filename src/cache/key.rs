//! Cache keys.

use crate::domain::PageQuery;

/// Namespace of every event-list entry.
pub const EVENTS_NAMESPACE: &str = "events";

/// Identifies one cached result: a namespace plus the full page query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub namespace: String,
    pub query: PageQuery,
}

impl QueryKey {
    #[must_use]
    pub fn new(namespace: impl Into<String>, query: PageQuery) -> Self {
        Self {
            namespace: namespace.into(),
            query,
        }
    }

    /// Key of an event-list page.
    #[must_use]
    pub fn events(query: PageQuery) -> Self {
        Self::new(EVENTS_NAMESPACE, query)
    }
}
