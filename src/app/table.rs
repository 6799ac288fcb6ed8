//! Events table state and view model computation.
//!
//! [`TableState`] owns everything the events table remembers between
//! renders: sorting, presentation-only column filters and visibility, row
//! selection, pagination, the raw and debounced search text, and the last
//! page the server answered with.
//!
//! Pagination and sorting are server-authoritative. The state never reorders
//! or re-slices fetched rows; it only derives the next [`PageQuery`] and
//! waits for the server to answer it. The one local transformation is the
//! column filter, which hides rows of the page already on screen.
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::TableState;
//! use eventdesk::domain::PageSize;
//!
//! let state = TableState::new(PageSize::Twenty);
//! let query = state.current_query();
//! assert_eq!(query.page, 1);
//! assert_eq!(query.limit, PageSize::Twenty);
//! assert!(!state.can_next_page());
//! ```

use crate::app::Action;
use crate::domain::{page_count, EventRecord, PageQuery, PageResult, PageSize, SortSpec};
use crate::ui::viewmodel::{
    ColumnHeader, EventRow, SortIndicator, TableViewModel, EMPTY_TABLE_MESSAGE,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::{BTreeMap, BTreeSet};

/// Columns of the events table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventColumn {
    Name,
    Date,
    Location,
    /// Row actions (the registration trigger). Never sortable or hideable.
    Actions,
}

impl EventColumn {
    /// All columns in display order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Date, Self::Location, Self::Actions];

    /// Identifier used in sort specs.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Location => "location",
            Self::Actions => "actions",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.id() == id)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Date => "Date",
            Self::Location => "Location",
            Self::Actions => "",
        }
    }

    #[must_use]
    pub const fn is_sortable(self) -> bool {
        !matches!(self, Self::Actions)
    }

    #[must_use]
    pub const fn is_hideable(self) -> bool {
        !matches!(self, Self::Actions)
    }

    /// Text of this column's cell for `event`, if the column shows text.
    #[must_use]
    pub fn cell_text(self, event: &EventRecord) -> Option<String> {
        match self {
            Self::Name => Some(event.name.clone()),
            Self::Date => Some(event.display_date()),
            Self::Location => Some(event.location.clone()),
            Self::Actions => None,
        }
    }
}

/// A presentation-only filter on one column of the displayed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: EventColumn,
    /// Case-insensitive substring the cell text must contain.
    pub value: String,
}

impl ColumnFilter {
    #[must_use]
    pub fn new(column: EventColumn, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    fn matches(&self, event: &EventRecord) -> bool {
        let needle = self.value.to_lowercase();
        self.column
            .cell_text(event)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    }
}

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: PageSize,
}

/// State of the events table.
#[derive(Debug, Clone)]
pub struct TableState {
    /// Multi-column sort; earlier entries take precedence.
    pub sorting: Vec<SortSpec>,

    pub column_filters: Vec<ColumnFilter>,

    /// Explicit visibility overrides. Columns not listed are visible.
    pub column_visibility: BTreeMap<EventColumn, bool>,

    /// Ids of selected events.
    pub row_selection: BTreeSet<i64>,

    pub pagination: Pagination,

    /// What the user typed, updated on every keystroke.
    pub search: String,

    /// Search text that takes part in the query, updated once typing settles.
    pub debounced_search: String,

    /// Last page applied for the current query (or an earlier one while the
    /// current query loads or after it failed).
    pub page: Option<PageResult<EventRecord>>,

    /// Query of the request in flight, if any.
    pub loading_key: Option<PageQuery>,

    /// Message of the last failed fetch for the current query.
    pub error: Option<String>,
}

impl TableState {
    #[must_use]
    pub fn new(page_size: PageSize) -> Self {
        Self {
            sorting: Vec::new(),
            column_filters: Vec::new(),
            column_visibility: BTreeMap::new(),
            row_selection: BTreeSet::new(),
            pagination: Pagination {
                page_index: 0,
                page_size,
            },
            search: String::new(),
            debounced_search: String::new(),
            page: None,
            loading_key: None,
            error: None,
        }
    }

    /// The query that fully describes what the table should show right now.
    #[must_use]
    pub fn current_query(&self) -> PageQuery {
        PageQuery {
            search: self.debounced_search.clone(),
            page: self.pagination.page_index.saturating_add(1),
            limit: self.pagination.page_size,
            sorts: self.sorting.clone(),
        }
    }

    /// Replaces the query-bearing state with `query` (e.g. restored from a URL).
    pub fn apply_query(&mut self, query: &PageQuery) {
        self.search.clone_from(&query.search);
        self.debounced_search.clone_from(&query.search);
        self.pagination = Pagination {
            page_index: query.page.saturating_sub(1),
            page_size: query.limit,
        };
        self.sorting.clone_from(&query.sorts);
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading_key.is_some()
    }

    /// Marks the current query as loading and returns the action that loads it.
    pub fn begin_fetch(&mut self, bypass_cache: bool) -> Action {
        let query = self.current_query();
        tracing::debug!(
            page = query.page,
            limit = query.limit.get(),
            search = %query.search,
            sorts = query.sorts.len(),
            bypass_cache,
            "requesting page"
        );
        self.loading_key = Some(query.clone());

        if bypass_cache {
            Action::Refetch(query)
        } else {
            Action::Fetch(query)
        }
    }

    /// `ceil(total / page_size)` of the last applied page, zero before any.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.page.as_ref().map_or(0, |page| {
            page_count(page.total, self.pagination.page_size.get())
        })
    }

    /// Whether there is an earlier page and no request is in flight.
    #[must_use]
    pub const fn can_previous_page(&self) -> bool {
        !self.is_loading() && self.pagination.page_index > 0
    }

    /// Whether there is a later page and no request is in flight.
    ///
    /// The page index is never clamped, so after the result set shrinks the
    /// index may sit past the last page; this then stays false.
    #[must_use]
    pub fn can_next_page(&self) -> bool {
        !self.is_loading() && u64::from(self.pagination.page_index) + 1 < self.page_count()
    }

    /// `Showing {start}-{end} of {total}` for the current pagination.
    #[must_use]
    pub fn showing_range(&self) -> String {
        let total = self.page.as_ref().map_or(0, |page| page.total);
        let size = u64::from(self.pagination.page_size.get());
        let index = u64::from(self.pagination.page_index);

        let start = if total > 0 { index * size + 1 } else { 0 };
        let end = ((index + 1) * size).min(total);
        format!("Showing {start}-{end} of {total}")
    }

    #[must_use]
    pub fn is_column_visible(&self, column: EventColumn) -> bool {
        !column.is_hideable() || self.column_visibility.get(&column).copied().unwrap_or(true)
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<EventColumn> {
        EventColumn::ALL
            .into_iter()
            .filter(|column| self.is_column_visible(*column))
            .collect()
    }

    /// Rows of the applied page that pass every column filter.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&EventRecord> {
        self.page.as_ref().map_or_else(Vec::new, |page| {
            page.items
                .iter()
                .filter(|event| self.column_filters.iter().all(|filter| filter.matches(event)))
                .collect()
        })
    }

    /// Cycles the sort of `column`: none, ascending, descending, none.
    ///
    /// With `multi` the column is updated in place (or appended) and the other
    /// entries are kept; otherwise the result replaces the whole sort.
    /// Returns `false` for columns that cannot be sorted.
    pub fn toggle_sort(&mut self, column: EventColumn, multi: bool) -> bool {
        if !column.is_sortable() {
            return false;
        }

        let position = self
            .sorting
            .iter()
            .position(|sort| sort.column_id == column.id());
        let next = match position.map(|index| self.sorting[index].descending) {
            None => Some(SortSpec::ascending(column.id())),
            Some(false) => Some(SortSpec::descending(column.id())),
            Some(true) => None,
        };

        if multi {
            match (position, next) {
                (Some(index), Some(spec)) => self.sorting[index] = spec,
                (Some(index), None) => {
                    self.sorting.remove(index);
                }
                (None, Some(spec)) => self.sorting.push(spec),
                (None, None) => {}
            }
        } else {
            self.sorting = next.into_iter().collect();
        }

        true
    }

    /// Computes a renderable view model from the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> TableViewModel {
        let columns = self.visible_columns();

        let headers = columns
            .iter()
            .map(|column| ColumnHeader {
                column: *column,
                label: column.label(),
                sortable: column.is_sortable(),
                sort: self
                    .sorting
                    .iter()
                    .position(|sort| sort.column_id == column.id())
                    .map(|priority| SortIndicator {
                        descending: self.sorting[priority].descending,
                        priority,
                    }),
            })
            .collect();

        let matcher = if self.debounced_search.trim().is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        let rows: Vec<EventRow> = self
            .visible_rows()
            .into_iter()
            .map(|event| EventRow {
                id: event.id,
                name: event.name.clone(),
                date: event.display_date(),
                location: event.location.clone(),
                available_spots: event.available_spots,
                is_selected: self.row_selection.contains(&event.id),
                highlight_ranges: matcher.as_ref().map_or_else(Vec::new, |m| {
                    self.compute_highlight_ranges(&event.name, m)
                }),
            })
            .collect();

        let empty_state = rows.is_empty().then(|| EMPTY_TABLE_MESSAGE.to_string());

        TableViewModel {
            headers,
            rows,
            summary: self.showing_range(),
            search: self.search.clone(),
            can_previous_page: self.can_previous_page(),
            can_next_page: self.can_next_page(),
            is_loading: self.is_loading(),
            error: self.error.clone(),
            empty_state,
            selected_count: self.row_selection.len(),
        }
    }

    /// Coalesces fuzzy-match positions of the search in `text` into ranges.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, self.debounced_search.trim())
        else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn event(id: i64, name: &str, location: &str) -> EventRecord {
        EventRecord {
            id,
            name: name.to_string(),
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            available_spots: 5,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn with_page(total: u64, items: Vec<EventRecord>) -> TableState {
        let mut state = TableState::new(PageSize::Ten);
        state.page = Some(PageResult {
            items,
            total,
            page: 1,
            limit: 10,
        });
        state
    }

    #[test]
    fn showing_range_covers_partial_last_page() {
        let mut state = with_page(25, vec![]);
        assert_eq!(state.showing_range(), "Showing 1-10 of 25");

        state.pagination.page_index = 2;
        assert_eq!(state.showing_range(), "Showing 21-25 of 25");

        assert_eq!(TableState::new(PageSize::Ten).showing_range(), "Showing 0-0 of 0");
    }

    #[test]
    fn navigation_is_bounded_by_page_count() {
        let mut state = with_page(25, vec![]);
        assert_eq!(state.page_count(), 3);
        assert!(!state.can_previous_page());
        assert!(state.can_next_page());

        state.pagination.page_index = 2;
        assert!(state.can_previous_page());
        assert!(!state.can_next_page());
    }

    #[test]
    fn navigation_is_disabled_while_loading() {
        let mut state = with_page(25, vec![]);
        state.pagination.page_index = 1;
        let _ = state.begin_fetch(false);

        assert!(!state.can_previous_page());
        assert!(!state.can_next_page());
    }

    #[test]
    fn toggle_sort_cycles_through_three_states() {
        let mut state = TableState::new(PageSize::Ten);

        assert!(state.toggle_sort(EventColumn::Date, false));
        assert_eq!(state.sorting, vec![SortSpec::ascending("date")]);

        state.toggle_sort(EventColumn::Date, false);
        assert_eq!(state.sorting, vec![SortSpec::descending("date")]);

        state.toggle_sort(EventColumn::Date, false);
        assert!(state.sorting.is_empty());
    }

    #[test]
    fn multi_sort_keeps_tie_break_order() {
        let mut state = TableState::new(PageSize::Ten);
        state.toggle_sort(EventColumn::Date, false);
        state.toggle_sort(EventColumn::Name, true);
        state.toggle_sort(EventColumn::Date, true);

        assert_eq!(
            state.sorting,
            vec![SortSpec::descending("date"), SortSpec::ascending("name")]
        );

        state.toggle_sort(EventColumn::Location, false);
        assert_eq!(state.sorting, vec![SortSpec::ascending("location")]);
    }

    #[test]
    fn actions_column_cannot_be_sorted_or_hidden() {
        let mut state = TableState::new(PageSize::Ten);
        assert!(!state.toggle_sort(EventColumn::Actions, false));

        state.column_visibility.insert(EventColumn::Actions, false);
        state.column_visibility.insert(EventColumn::Location, false);
        assert_eq!(
            state.visible_columns(),
            vec![EventColumn::Name, EventColumn::Date, EventColumn::Actions]
        );
    }

    #[test]
    fn column_filters_only_hide_rows_of_the_current_page() {
        let mut state = with_page(
            3,
            vec![
                event(1, "RustConf", "Montreal"),
                event(2, "EuroRust", "Vienna"),
                event(3, "Rust Nation", "London"),
            ],
        );
        state.column_filters = vec![ColumnFilter::new(EventColumn::Location, "LON")];

        let ids: Vec<i64> = state.visible_rows().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(state.current_query(), PageQuery::default());
    }

    #[test]
    fn viewmodel_marks_sorts_selection_and_matches() {
        let mut state = with_page(1, vec![event(7, "RustConf", "Montreal")]);
        state.debounced_search = "rust".to_string();
        state.row_selection.insert(7);
        state.toggle_sort(EventColumn::Name, false);

        let vm = state.compute_viewmodel();

        assert_eq!(vm.headers[0].sort, Some(SortIndicator { descending: false, priority: 0 }));
        assert_eq!(vm.headers[1].sort, None);
        assert_eq!(vm.rows.len(), 1);
        assert!(vm.rows[0].is_selected);
        assert_eq!(vm.rows[0].date, "3/14/2025");
        assert_eq!(vm.rows[0].highlight_ranges, vec![(0, 4)]);
        assert_eq!(vm.empty_state, None);
        assert_eq!(vm.selected_count, 1);
    }

    #[test]
    fn apply_query_restores_pagination_and_search() {
        let mut state = TableState::new(PageSize::Ten);
        let query = PageQuery {
            search: "conf".to_string(),
            page: 3,
            limit: PageSize::Fifty,
            sorts: vec![SortSpec::descending("date")],
        };

        state.apply_query(&query);

        assert_eq!(state.pagination.page_index, 2);
        assert_eq!(state.search, "conf");
        assert_eq!(state.current_query(), query);
    }
}
