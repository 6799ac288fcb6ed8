//! Page queries and paginated results.
//!
//! A [`PageQuery`] fully determines one list request and doubles as the cache
//! key for its result. It serializes to the query-string layout the events
//! endpoint expects and parses back from it without loss, so table state can
//! be restored from a URL.
//!
//! # Wire Layout
//!
//! ```text
//! search=conf&page=2&limit=20&sorts[0][id]=date&sorts[0][desc]=true&sorts[1][id]=name&sorts[1][desc]=false
//! ```

use super::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a multi-column sort.
///
/// Later entries only break ties left by earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "id")]
    pub column_id: String,
    #[serde(rename = "desc", default)]
    pub descending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: false,
        }
    }

    #[must_use]
    pub fn descending(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: true,
        }
    }
}

/// Number of rows requested per page.
///
/// The events endpoint only accepts these four sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    /// All supported sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::Ten, Self::Twenty, Self::Fifty, Self::Hundred];

    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| AppError::InvalidQuery(format!("unsupported page size: {value}")))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub search: String,
    /// One-based page number.
    pub page: u32,
    pub limit: PageSize,
    pub sorts: Vec<SortSpec>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            limit: PageSize::default(),
            sorts: Vec::new(),
        }
    }
}

impl PageQuery {
    /// Serializes the query into ordered key/value pairs for a query string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eventdesk::domain::{PageQuery, PageSize, SortSpec};
    ///
    /// let query = PageQuery {
    ///     search: "conf".to_string(),
    ///     page: 2,
    ///     limit: PageSize::Twenty,
    ///     sorts: vec![SortSpec::descending("date")],
    /// };
    /// let pairs = query.to_query_pairs();
    /// assert_eq!(pairs[3], ("sorts[0][id]".to_string(), "date".to_string()));
    /// assert_eq!(PageQuery::from_query_pairs(&pairs).unwrap(), query);
    /// ```
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.sorts.len() * 2);
        pairs.push(("search".to_string(), self.search.clone()));
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));

        for (index, sort) in self.sorts.iter().enumerate() {
            pairs.push((format!("sorts[{index}][id]"), sort.column_id.clone()));
            pairs.push((format!("sorts[{index}][desc]"), sort.descending.to_string()));
        }

        pairs
    }

    /// Restores a query from key/value pairs produced by [`Self::to_query_pairs`].
    ///
    /// Missing `search`, `page` and `limit` take their defaults. Unknown keys
    /// are ignored. Sort entries keep the order of their indices.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidQuery`] if the page is zero or not a number,
    /// the limit is unsupported, a sort key is malformed, or a sort entry has
    /// no column id.
    pub fn from_query_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        let mut sorts: BTreeMap<usize, (Option<String>, bool)> = BTreeMap::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "search" => query.search = value.to_string(),
                "page" => {
                    query.page = value
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .ok_or_else(|| AppError::InvalidQuery(format!("invalid page: {value}")))?;
                }
                "limit" => {
                    let limit = value
                        .parse::<u32>()
                        .map_err(|_| AppError::InvalidQuery(format!("invalid limit: {value}")))?;
                    query.limit = PageSize::try_from(limit)?;
                }
                _ => {
                    if let Some(rest) = key.strip_prefix("sorts[") {
                        let (index, field) = parse_sort_key(rest).ok_or_else(|| {
                            AppError::InvalidQuery(format!("malformed sort key: {key}"))
                        })?;
                        let entry = sorts.entry(index).or_insert((None, false));
                        match field {
                            "id" => entry.0 = Some(value.to_string()),
                            "desc" => {
                                entry.1 = value.parse::<bool>().map_err(|_| {
                                    AppError::InvalidQuery(format!(
                                        "invalid sort direction: {value}"
                                    ))
                                })?;
                            }
                            _ => {
                                return Err(AppError::InvalidQuery(format!(
                                    "unknown sort field: {field}"
                                )))
                            }
                        }
                    }
                }
            }
        }

        query.sorts = sorts
            .into_iter()
            .map(|(index, (column_id, descending))| {
                column_id
                    .map(|column_id| SortSpec { column_id, descending })
                    .ok_or_else(|| AppError::InvalidQuery(format!("sort {index} has no column id")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(query)
    }
}

/// Splits `"<index>][<field>]"` into its index and field name.
fn parse_sort_key(rest: &str) -> Option<(usize, &str)> {
    let (index, field) = rest.split_once("][")?;
    let field = field.strip_suffix(']')?;
    Some((index.parse().ok()?, field))
}

/// One page of results as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    /// One-based page number the server answered for.
    pub page: u32,
    pub limit: u32,
}

impl<T> PageResult<T> {
    /// Number of pages needed for `total` items at this page's limit.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.limit)
    }
}

/// `ceil(total / limit)`, zero when the limit is zero.
#[must_use]
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(u64::from(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn default_query_serializes_first_page_of_ten() {
        let pairs = PageQuery::default().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), String::new()),
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn multi_sort_survives_the_round_trip_in_order() {
        let query = PageQuery {
            search: "rust & friends".to_string(),
            page: 4,
            limit: PageSize::Hundred,
            sorts: vec![
                SortSpec::descending("date"),
                SortSpec::ascending("name"),
                SortSpec::ascending("location"),
            ],
        };

        let restored = PageQuery::from_query_pairs(&query.to_query_pairs()).unwrap();
        assert_eq!(restored, query);
    }

    #[test]
    fn sort_order_follows_indices_not_parameter_order() {
        let query = PageQuery::from_query_pairs(&pairs(&[
            ("sorts[1][id]", "name"),
            ("sorts[0][id]", "date"),
            ("sorts[0][desc]", "true"),
        ]))
        .unwrap();

        assert_eq!(
            query.sorts,
            vec![SortSpec::descending("date"), SortSpec::ascending("name")]
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(PageQuery::from_query_pairs(&pairs(&[("page", "0")])).is_err());
        assert!(PageQuery::from_query_pairs(&pairs(&[("page", "-1")])).is_err());
        assert!(PageQuery::from_query_pairs(&pairs(&[("limit", "15")])).is_err());
        assert!(PageQuery::from_query_pairs(&pairs(&[("sorts[x][id]", "name")])).is_err());
        assert!(PageQuery::from_query_pairs(&pairs(&[("sorts[0][desc]", "true")])).is_err());
        assert!(PageQuery::from_query_pairs(&pairs(&[("sorts[0][desc]", "yes")])).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let query = PageQuery::from_query_pairs(&pairs(&[("utm_source", "mail")])).unwrap();
        assert_eq!(query, PageQuery::default());
    }

    #[test]
    fn page_size_accepts_only_supported_limits() {
        assert_eq!(PageSize::try_from(50).unwrap(), PageSize::Fifty);
        assert!(PageSize::try_from(25).is_err());
        assert_eq!(serde_json::to_string(&PageSize::Twenty).unwrap(), "20");
        assert!(serde_json::from_str::<PageSize>("30").is_err());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }
}
