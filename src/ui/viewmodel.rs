//! View model types representing renderable UI state.
//!
//! View models are immutable snapshots computed from controller state
//! ([`TableState::compute_viewmodel`](crate::app::TableState::compute_viewmodel),
//! [`RegistrationFlow::compute_viewmodel`](crate::app::RegistrationFlow::compute_viewmodel),
//! [`ContactFlow::compute_viewmodel`](crate::app::ContactFlow::compute_viewmodel)).
//! They carry display-ready strings and flags only; any front end can render
//! them without knowing how the controllers work.
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::TableState;
//! use eventdesk::domain::PageSize;
//!
//! let state = TableState::new(PageSize::Ten);
//! let vm = state.compute_viewmodel();
//! assert_eq!(vm.summary, "Showing 0-0 of 0");
//! assert_eq!(vm.empty_state.as_deref(), Some("No results."));
//! ```

use crate::app::modes::Presentation;
use crate::app::table::EventColumn;

/// Text shown in place of rows when a page has none.
pub const EMPTY_TABLE_MESSAGE: &str = "No results.";

/// Renderable state of the events table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewModel {
    /// Headers of the visible columns, in display order.
    pub headers: Vec<ColumnHeader>,

    /// Rows of the current page after presentation filters.
    pub rows: Vec<EventRow>,

    /// `Showing {start}-{end} of {total}`.
    pub summary: String,

    /// Raw (not yet debounced) text of the search box.
    pub search: String,

    pub can_previous_page: bool,
    pub can_next_page: bool,

    /// Whether a request for the current query is in flight.
    pub is_loading: bool,

    /// Error of the last failed fetch; rows still show the previous page.
    pub error: Option<String>,

    /// Message to render instead of the rows.
    pub empty_state: Option<String>,

    pub selected_count: usize,
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub column: EventColumn,
    pub label: &'static str,
    pub sortable: bool,
    /// Current sort of this column, if it takes part in the sort.
    pub sort: Option<SortIndicator>,
}

/// Sort state shown next to a header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortIndicator {
    pub descending: bool,
    /// Zero-based position in a multi-column sort.
    pub priority: usize,
}

/// Display information for a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    /// Date in `M/D/YYYY` form.
    pub date: String,
    pub location: String,
    pub available_spots: i64,
    pub is_selected: bool,

    /// Character ranges of `name` matching the active search.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Renderable state of the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationViewModel {
    pub title: &'static str,
    pub presentation: Presentation,
    pub is_open: bool,

    /// Event details, only shown inside the drawer.
    pub details: Option<EventDetails>,

    pub name: String,
    pub email: String,
    pub name_error: Option<String>,
    pub email_error: Option<String>,

    /// Persistent error banner above the form.
    pub banner: Option<String>,

    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

/// Event summary shown in the registration drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub date: String,
    pub location: String,
    pub available_spots: i64,
}

/// Renderable state of the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactViewModel {
    pub is_open: bool,
    pub name: String,
    pub email: String,
    pub message: String,
    pub newsletter: bool,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub message_error: Option<String>,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}
