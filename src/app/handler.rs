//! Event handling and state transition logic for the events table.
//!
//! The handler follows a unidirectional data flow:
//! 1. Events arrive from the user (search box, headers, pager) or from
//!    completed work (loaded pages, settled search text)
//! 2. [`handle_event`] pattern-matches the event
//! 3. [`TableState`] is mutated
//! 4. Actions are collected and returned for [`TableSession`](super::TableSession)
//!    to execute
//!
//! Every change that alters [`TableState::current_query`] yields exactly one
//! fetch action; changes that leave the query alone (visibility, column
//! filters, selection, typing before the search settles on page one) yield
//! none.
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::{handle_event, Action, Event, TableState};
//! use eventdesk::domain::PageSize;
//!
//! let mut state = TableState::new(PageSize::Ten);
//! let (render, actions) = handle_event(&mut state, &Event::SearchChanged("rust".into()))?;
//! assert!(render);
//! assert_eq!(actions, vec![Action::DebounceSearch("rust".into())]);
//! # Ok::<(), eventdesk::domain::AppError>(())
//! ```

use crate::app::table::{ColumnFilter, EventColumn, Pagination};
use crate::app::{Action, TableState};
use crate::domain::error::Result;
use crate::domain::{EventRecord, PageQuery, PageResult, PageSize, SortSpec};

/// Events that drive the events table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Table shown for the first time; loads the current query.
    Mount,

    /// Search box edited. Resets to the first page and starts the debounce.
    SearchChanged(String),

    /// Debounced search text settled on a value.
    SearchSettled(String),

    /// Replaces page index and size.
    SetPagination(Pagination),

    /// Changes the page size and goes back to the first page.
    SetPageSize(PageSize),

    /// Replaces the whole sort.
    SetSorting(Vec<SortSpec>),

    /// Sortable header clicked.
    ToggleSort {
        column: EventColumn,
        /// Add to the existing sort instead of replacing it.
        multi: bool,
    },

    NextPage,
    PreviousPage,

    SetColumnVisibility {
        column: EventColumn,
        visible: bool,
    },

    /// Replaces the presentation-only column filters.
    SetColumnFilters(Vec<ColumnFilter>),

    SetRowSelected {
        id: i64,
        selected: bool,
    },
    ClearSelection,

    /// Restores search, pagination and sorting from query-string pairs.
    RestoreQuery(Vec<(String, String)>),

    /// A request finished successfully.
    PageLoaded {
        query: PageQuery,
        result: PageResult<EventRecord>,
    },

    /// A request failed.
    PageFailed {
        query: PageQuery,
        message: String,
    },

    /// Cached event lists were invalidated by a mutation.
    EventsInvalidated,

    /// Reload the current query from the server (e.g. the window regained focus).
    Refresh,
}

/// Processes an event, mutates table state, and returns actions to execute.
///
/// # Returns
///
/// `(needs_render, actions)`. Stale responses (for a query that is no longer
/// current) and unavailable page moves return `(false, [])`.
///
/// # Errors
///
/// [`RestoreQuery`](Event::RestoreQuery) fails with
/// [`AppError::InvalidQuery`](crate::domain::AppError::InvalidQuery) when the
/// pairs do not describe a valid query; the state is left untouched.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut TableState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    let previous = state.current_query();

    match event {
        Event::Mount => Ok((true, vec![state.begin_fetch(false)])),
        Event::SearchChanged(value) => {
            state.search.clone_from(value);
            state.pagination.page_index = 0;

            tracing::trace!(search = %value, "search input changed");

            let mut actions = vec![Action::DebounceSearch(value.clone())];
            actions.extend(fetch_if_changed(state, &previous));
            Ok((true, actions))
        }
        Event::SearchSettled(value) => {
            if state.debounced_search == *value {
                return Ok((false, vec![]));
            }
            state.debounced_search.clone_from(value);
            tracing::debug!(search = %value, "search settled");
            Ok((true, fetch_if_changed(state, &previous)))
        }
        Event::SetPagination(next) => {
            state.pagination = *next;
            let actions = fetch_if_changed(state, &previous);
            Ok((!actions.is_empty(), actions))
        }
        Event::SetPageSize(size) => {
            state.pagination = Pagination {
                page_index: 0,
                page_size: *size,
            };
            let actions = fetch_if_changed(state, &previous);
            Ok((!actions.is_empty(), actions))
        }
        Event::SetSorting(next) => {
            state.sorting.clone_from(next);
            let actions = fetch_if_changed(state, &previous);
            Ok((!actions.is_empty(), actions))
        }
        Event::ToggleSort { column, multi } => {
            if !state.toggle_sort(*column, *multi) {
                tracing::debug!(column = column.id(), "column is not sortable");
                return Ok((false, vec![]));
            }
            Ok((true, fetch_if_changed(state, &previous)))
        }
        Event::NextPage => {
            if !state.can_next_page() {
                tracing::debug!(
                    page_index = state.pagination.page_index,
                    page_count = state.page_count(),
                    loading = state.is_loading(),
                    "next page unavailable"
                );
                return Ok((false, vec![]));
            }
            state.pagination.page_index += 1;
            Ok((true, fetch_if_changed(state, &previous)))
        }
        Event::PreviousPage => {
            if !state.can_previous_page() {
                tracing::debug!(
                    page_index = state.pagination.page_index,
                    loading = state.is_loading(),
                    "previous page unavailable"
                );
                return Ok((false, vec![]));
            }
            state.pagination.page_index -= 1;
            Ok((true, fetch_if_changed(state, &previous)))
        }
        Event::SetColumnVisibility { column, visible } => {
            if !column.is_hideable() {
                return Ok((false, vec![]));
            }
            let was_visible = state.is_column_visible(*column);
            state.column_visibility.insert(*column, *visible);
            Ok((was_visible != *visible, vec![]))
        }
        Event::SetColumnFilters(filters) => {
            if state.column_filters == *filters {
                return Ok((false, vec![]));
            }
            state.column_filters.clone_from(filters);
            Ok((true, vec![]))
        }
        Event::SetRowSelected { id, selected } => {
            let changed = if *selected {
                state.row_selection.insert(*id)
            } else {
                state.row_selection.remove(id)
            };
            Ok((changed, vec![]))
        }
        Event::ClearSelection => {
            let changed = !state.row_selection.is_empty();
            state.row_selection.clear();
            Ok((changed, vec![]))
        }
        Event::RestoreQuery(pairs) => {
            let query = PageQuery::from_query_pairs(pairs)?;
            state.apply_query(&query);
            let actions = fetch_if_changed(state, &previous);
            Ok((!actions.is_empty(), actions))
        }
        Event::PageLoaded { query, result } => {
            if *query != previous {
                tracing::debug!(page = query.page, "dropping stale page");
                return Ok((false, vec![]));
            }

            tracing::debug!(
                page = result.page,
                items = result.items.len(),
                total = result.total,
                "page applied"
            );
            state.page = Some(result.clone());
            state.loading_key = None;
            state.error = None;
            Ok((true, vec![]))
        }
        Event::PageFailed { query, message } => {
            if *query != previous {
                tracing::debug!(page = query.page, "dropping stale failure");
                return Ok((false, vec![]));
            }

            tracing::warn!(page = query.page, error = %message, "page fetch failed");
            state.loading_key = None;
            state.error = Some(message.clone());
            Ok((true, vec![]))
        }
        Event::EventsInvalidated => Ok((true, vec![state.begin_fetch(false)])),
        Event::Refresh => Ok((true, vec![state.begin_fetch(true)])),
    }
}

/// Issues a fetch when the mutation changed the current query.
fn fetch_if_changed(state: &mut TableState, previous: &PageQuery) -> Vec<Action> {
    if state.current_query() == *previous {
        vec![]
    } else {
        vec![state.begin_fetch(false)]
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount => "mount",
        Event::SearchChanged(_) => "search_changed",
        Event::SearchSettled(_) => "search_settled",
        Event::SetPagination(_) => "set_pagination",
        Event::SetPageSize(_) => "set_page_size",
        Event::SetSorting(_) => "set_sorting",
        Event::ToggleSort { .. } => "toggle_sort",
        Event::NextPage => "next_page",
        Event::PreviousPage => "previous_page",
        Event::SetColumnVisibility { .. } => "set_column_visibility",
        Event::SetColumnFilters(_) => "set_column_filters",
        Event::SetRowSelected { .. } => "set_row_selected",
        Event::ClearSelection => "clear_selection",
        Event::RestoreQuery(_) => "restore_query",
        Event::PageLoaded { .. } => "page_loaded",
        Event::PageFailed { .. } => "page_failed",
        Event::EventsInvalidated => "events_invalidated",
        Event::Refresh => "refresh",
    }
}
