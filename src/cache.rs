//! Query Cache
//!
//! Keyed cache of server-fetched collections. The coordinator and views only
//! see the [`QueryCache`] trait; [`MemoryCache`] is the plain implementation
//! and `store::SignalCache` the reactive one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

use crate::error::ApiResult;

/// Identifies one cached collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Tasks,
    Statuses,
    Notes,
}

impl QueryKey {
    pub fn name(self) -> &'static str {
        match self {
            QueryKey::Tasks => "tasks",
            QueryKey::Statuses => "statuses",
            QueryKey::Notes => "notes",
        }
    }
}

/// Handle for an in-flight read, used to detect that it was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    generation: u64,
}

/// Keyed collection cache shared by views and the mutation coordinator
pub trait QueryCache<T> {
    /// Current data, `None` if never loaded
    fn get(&self, key: &QueryKey) -> Option<Vec<T>>;

    /// Mutate the collection in place (an empty one is created if missing)
    fn set(&self, key: &QueryKey, updater: &mut dyn FnMut(&mut Vec<T>));

    /// Mark the collection as needing a refetch
    fn invalidate(&self, key: &QueryKey);

    fn is_stale(&self, key: &QueryKey) -> bool;

    /// Make every in-flight read for `key` land as a no-op
    fn cancel(&self, key: &QueryKey);

    fn begin_fetch(&self, key: &QueryKey) -> FetchTicket;

    /// Store fetched data unless the read was cancelled meanwhile.
    /// Returns whether the data was written.
    fn complete_fetch(&self, ticket: FetchTicket, data: Vec<T>) -> bool;

    /// Overwrite the whole collection
    fn replace(&self, key: &QueryKey, data: Vec<T>) {
        let mut data = Some(data);
        self.set(key, &mut |current| {
            if let Some(data) = data.take() {
                *current = data;
            }
        });
    }
}

/// Per-key cache state shared by the cache implementations
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<T> {
    pub(crate) data: Option<Vec<T>>,
    generation: u64,
    stale: bool,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            generation: 0,
            stale: false,
        }
    }
}

impl<T> CacheEntry<T> {
    pub(crate) fn update(&mut self, updater: &mut dyn FnMut(&mut Vec<T>)) {
        updater(self.data.get_or_insert_with(Vec::new));
    }

    pub(crate) fn invalidate(&mut self) {
        self.stale = true;
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.stale || self.data.is_none()
    }

    pub(crate) fn cancel(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn ticket(&self, key: QueryKey) -> FetchTicket {
        FetchTicket {
            key,
            generation: self.generation,
        }
    }

    /// Accept fetched data when the ticket is still current
    pub(crate) fn complete(&mut self, ticket: FetchTicket, data: Vec<T>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.data = Some(data);
        self.stale = false;
        true
    }
}

/// Non-reactive cache
pub struct MemoryCache<T> {
    entries: RefCell<HashMap<QueryKey, CacheEntry<T>>>,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<T: Clone> MemoryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with one collection
    pub fn with(key: QueryKey, data: Vec<T>) -> Self {
        let cache = Self::new();
        cache.replace(&key, data);
        cache
    }

    fn with_entry<R>(&self, key: &QueryKey, f: impl FnOnce(&mut CacheEntry<T>) -> R) -> R {
        f(self.entries.borrow_mut().entry(*key).or_default())
    }
}

impl<T: Clone> QueryCache<T> for MemoryCache<T> {
    fn get(&self, key: &QueryKey) -> Option<Vec<T>> {
        self.entries.borrow().get(key).and_then(|entry| entry.data.clone())
    }

    fn set(&self, key: &QueryKey, updater: &mut dyn FnMut(&mut Vec<T>)) {
        self.with_entry(key, |entry| entry.update(updater));
    }

    fn invalidate(&self, key: &QueryKey) {
        self.with_entry(key, CacheEntry::invalidate);
    }

    fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.borrow().get(key).map_or(true, CacheEntry::is_stale)
    }

    fn cancel(&self, key: &QueryKey) {
        self.with_entry(key, CacheEntry::cancel);
    }

    fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        self.with_entry(key, |entry| entry.ticket(*key))
    }

    fn complete_fetch(&self, ticket: FetchTicket, data: Vec<T>) -> bool {
        self.with_entry(&ticket.key, |entry| entry.complete(ticket, data))
    }
}

/// Run a read and store its result unless a mutation cancelled it meanwhile.
///
/// Returns `Ok(false)` when the result was discarded.
pub async fn fetch_query<T, F>(cache: &dyn QueryCache<T>, key: QueryKey, fetch: F) -> ApiResult<bool>
where
    F: Future<Output = ApiResult<Vec<T>>>,
{
    let ticket = cache.begin_fetch(&key);
    let data = fetch.await?;
    let written = cache.complete_fetch(ticket, data);
    if !written {
        log::debug!("[CACHE] Dropped {} read cancelled by a mutation", key.name());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let cache = MemoryCache::<u32>::new();
        assert_eq!(cache.get(&QueryKey::Tasks), None);
        assert!(cache.is_stale(&QueryKey::Tasks));
    }

    #[test]
    fn test_set_creates_and_updates() {
        let cache = MemoryCache::<u32>::new();
        cache.set(&QueryKey::Notes, &mut |v| v.push(1));
        cache.set(&QueryKey::Notes, &mut |v| v.push(2));
        assert_eq!(cache.get(&QueryKey::Notes), Some(vec![1, 2]));
        assert_eq!(cache.get(&QueryKey::Tasks), None);
    }

    #[test]
    fn test_invalidate_marks_stale_but_keeps_data() {
        let cache = MemoryCache::with(QueryKey::Tasks, vec![1u32]);
        assert!(!cache.is_stale(&QueryKey::Tasks));
        cache.invalidate(&QueryKey::Tasks);
        assert!(cache.is_stale(&QueryKey::Tasks));
        assert_eq!(cache.get(&QueryKey::Tasks), Some(vec![1]));
    }

    #[test]
    fn test_cancelled_fetch_is_discarded() {
        let cache = MemoryCache::with(QueryKey::Tasks, vec![1u32]);
        let ticket = cache.begin_fetch(&QueryKey::Tasks);

        cache.cancel(&QueryKey::Tasks);
        cache.set(&QueryKey::Tasks, &mut |v| v[0] = 7);

        assert!(!cache.complete_fetch(ticket, vec![1]));
        assert_eq!(cache.get(&QueryKey::Tasks), Some(vec![7]));
    }

    #[test]
    fn test_fetch_after_cancel_is_accepted() {
        let cache = MemoryCache::<u32>::new();
        cache.cancel(&QueryKey::Statuses);
        let ticket = cache.begin_fetch(&QueryKey::Statuses);
        assert!(cache.complete_fetch(ticket, vec![3]));
        assert_eq!(cache.get(&QueryKey::Statuses), Some(vec![3]));
    }

    #[tokio::test]
    async fn test_fetch_query_writes_result() {
        let cache = MemoryCache::<u32>::new();
        let written = fetch_query(&cache, QueryKey::Notes, async { Ok(vec![4, 5]) }).await;
        assert_eq!(written, Ok(true));
        assert_eq!(cache.get(&QueryKey::Notes), Some(vec![4, 5]));
        assert!(!cache.is_stale(&QueryKey::Notes));
    }

    #[tokio::test]
    async fn test_fetch_query_error_leaves_cache() {
        let cache = MemoryCache::with(QueryKey::Notes, vec![1u32]);
        let result = fetch_query(&cache, QueryKey::Notes, async {
            Err(crate::error::ApiError::Network("offline".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(cache.get(&QueryKey::Notes), Some(vec![1]));
    }
}
