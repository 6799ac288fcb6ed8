//! Shared query cache with namespace invalidation.
//!
//! The cache holds the last successful result per query key so a page the
//! user already visited renders immediately, and so that a mutation
//! elsewhere (a registration) can mark a whole family of results as outdated
//! with one [`QueryCache::invalidate_namespace`] call.
//!
//! It is an explicit service: build one, wrap it in an `Arc`, and hand it to
//! every component that reads or invalidates it.
//!
//! # Modules
//!
//! - `key`: [`QueryKey`] (namespace + page query)

pub mod key;

pub use key::{QueryKey, EVENTS_NAMESPACE};

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How long an entry survives after it was stored, fresh or not.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    /// Bumped by every invalidation of the namespace.
    epochs: HashMap<String, u64>,
}

impl<V> CacheState<V> {
    fn epoch(&self, namespace: &str) -> u64 {
        self.epochs.get(namespace).copied().unwrap_or(0)
    }
}

/// In-memory cache keyed by [`QueryKey`].
///
/// Entries older than the stale time are still kept (a renderer may show
/// them while a refresh is in flight) but [`get_fresh`](Self::get_fresh)
/// no longer returns them. Entries older than the gc time are evicted on
/// the next insert.
///
/// Each namespace carries an epoch that [`invalidate_namespace`] advances.
/// A request started before an invalidation stores its result with
/// [`insert_if_current`](Self::insert_if_current), which refuses it.
///
/// [`invalidate_namespace`]: Self::invalidate_namespace
#[derive(Debug)]
pub struct QueryCache<V> {
    state: RwLock<CacheState<V>>,
    stale_after: Duration,
    gc_after: Duration,
}

impl<V: Clone> QueryCache<V> {
    /// Creates an empty cache whose entries go stale after `stale_after` and
    /// are evicted after [`DEFAULT_GC_TIME`].
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                epochs: HashMap::new(),
            }),
            stale_after,
            gc_after: DEFAULT_GC_TIME,
        }
    }

    #[must_use]
    pub const fn with_gc_time(mut self, gc_after: Duration) -> Self {
        self.gc_after = gc_after;
        self
    }

    /// Returns the cached value if it was stored less than the stale time ago.
    pub async fn get_fresh(&self, key: &QueryKey) -> Option<V> {
        let state = self.state.read().await;
        let entry = state.entries.get(key)?;
        if entry.stored_at.elapsed() < self.stale_after {
            Some(entry.value.clone())
        } else {
            tracing::debug!(namespace = %key.namespace, "cache entry is stale");
            None
        }
    }

    /// Returns the cached value regardless of age.
    pub async fn get_any(&self, key: &QueryKey) -> Option<V> {
        let state = self.state.read().await;
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Current epoch of `namespace`. Read it before starting a request whose
    /// result goes to [`insert_if_current`](Self::insert_if_current).
    pub async fn epoch(&self, namespace: &str) -> u64 {
        self.state.read().await.epoch(namespace)
    }

    /// Stores a value, replacing any previous entry for the key.
    pub async fn insert(&self, key: QueryKey, value: V) {
        let mut state = self.state.write().await;
        self.store(&mut state, key, value);
    }

    /// Stores a value only if its namespace was not invalidated since `epoch`.
    ///
    /// Returns whether the value was stored.
    pub async fn insert_if_current(&self, key: QueryKey, value: V, epoch: u64) -> bool {
        let mut state = self.state.write().await;
        let current = state.epoch(&key.namespace);
        if current != epoch {
            tracing::debug!(
                namespace = %key.namespace,
                epoch,
                current,
                "discarding result from before invalidation"
            );
            return false;
        }
        self.store(&mut state, key, value);
        true
    }

    fn store(&self, state: &mut CacheState<V>, key: QueryKey, value: V) {
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.gc_after);
        let evicted = before - state.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired cache entries");
        }

        state.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry under `namespace`, advances its epoch and returns
    /// how many entries were removed.
    pub async fn invalidate_namespace(&self, namespace: &str) -> usize {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|key, _| key.namespace != namespace);
        let removed = before - state.entries.len();
        *state.epochs.entry(namespace.to_string()).or_insert(0) += 1;

        tracing::debug!(namespace, removed, "cache namespace invalidated");
        removed
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageQuery;

    fn key(namespace: &str, page: u32) -> QueryKey {
        QueryKey::new(
            namespace,
            PageQuery {
                page,
                ..PageQuery::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn entries_go_stale_but_stay_readable() {
        let cache = QueryCache::new(Duration::from_secs(120));
        cache.insert(key(EVENTS_NAMESPACE, 1), "page one").await;

        assert_eq!(cache.get_fresh(&key(EVENTS_NAMESPACE, 1)).await, Some("page one"));

        tokio::time::advance(Duration::from_secs(121)).await;
        assert_eq!(cache.get_fresh(&key(EVENTS_NAMESPACE, 1)).await, None);
        assert_eq!(cache.get_any(&key(EVENTS_NAMESPACE, 1)).await, Some("page one"));
    }

    #[tokio::test]
    async fn invalidation_only_touches_its_namespace() {
        let cache = QueryCache::new(Duration::from_secs(120));
        cache.insert(key(EVENTS_NAMESPACE, 1), 1).await;
        cache.insert(key(EVENTS_NAMESPACE, 2), 2).await;
        cache.insert(key("venues", 1), 3).await;

        assert_eq!(cache.invalidate_namespace(EVENTS_NAMESPACE).await, 2);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get_fresh(&key("venues", 1)).await, Some(3));
        assert_eq!(cache.get_fresh(&key(EVENTS_NAMESPACE, 1)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_evicted_on_insert() {
        let cache =
            QueryCache::new(Duration::from_secs(120)).with_gc_time(Duration::from_secs(300));
        cache.insert(key(EVENTS_NAMESPACE, 1), 1).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        cache.insert(key(EVENTS_NAMESPACE, 2), 2).await;
        assert_eq!(cache.len().await, 2);

        tokio::time::advance(Duration::from_secs(101)).await;
        cache.insert(key(EVENTS_NAMESPACE, 3), 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get_any(&key(EVENTS_NAMESPACE, 1)).await, None);
        assert_eq!(cache.get_any(&key(EVENTS_NAMESPACE, 2)).await, Some(2));
    }

    #[tokio::test]
    async fn results_from_before_invalidation_are_refused() {
        let cache = QueryCache::new(Duration::from_secs(120));
        let before = cache.epoch(EVENTS_NAMESPACE).await;
        let venues = cache.epoch("venues").await;

        cache.invalidate_namespace(EVENTS_NAMESPACE).await;

        assert!(!cache.insert_if_current(key(EVENTS_NAMESPACE, 1), 1, before).await);
        assert!(cache.is_empty().await);
        assert!(cache.insert_if_current(key("venues", 1), 2, venues).await);

        let after = cache.epoch(EVENTS_NAMESPACE).await;
        assert!(cache.insert_if_current(key(EVENTS_NAMESPACE, 1), 3, after).await);
        assert_eq!(cache.get_fresh(&key(EVENTS_NAMESPACE, 1)).await, Some(3));
    }
}
