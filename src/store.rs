//! Reactive Query Store
//!
//! Signal-backed [`QueryCache`] so views re-render when the coordinator
//! writes optimistic or rolled-back data.

use std::collections::HashMap;

use leptos::prelude::*;

use crate::cache::{CacheEntry, FetchTicket, QueryCache, QueryKey};

/// Query cache whose writes notify subscribed views
pub struct SignalCache<T: Send + Sync + 'static> {
    entries: RwSignal<HashMap<QueryKey, CacheEntry<T>>>,
}

impl<T: Send + Sync + 'static> Clone for SignalCache<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for SignalCache<T> {}

impl<T: Clone + Send + Sync + 'static> SignalCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwSignal::new(HashMap::new()),
        }
    }

    /// Tracked read for views; empty until loaded
    pub fn read(&self, key: &QueryKey) -> Vec<T> {
        self.entries
            .with(|entries| entries.get(key).and_then(|entry| entry.data.clone()))
            .unwrap_or_default()
    }

    /// Untracked read for event handlers
    pub fn snapshot(&self, key: &QueryKey) -> Vec<T> {
        QueryCache::get(self, key).unwrap_or_default()
    }

    pub fn is_loaded(&self, key: &QueryKey) -> bool {
        self.entries
            .with(|entries| entries.get(key).is_some_and(|entry| entry.data.is_some()))
    }

    /// Tracked staleness, for showing a refresh hint
    pub fn needs_refresh(&self, key: &QueryKey) -> bool {
        self.entries
            .with(|entries| entries.get(key).map_or(true, CacheEntry::is_stale))
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SignalCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> for SignalCache<T> {
    fn get(&self, key: &QueryKey) -> Option<Vec<T>> {
        self.entries
            .with_untracked(|entries| entries.get(key).and_then(|entry| entry.data.clone()))
    }

    fn set(&self, key: &QueryKey, updater: &mut dyn FnMut(&mut Vec<T>)) {
        self.entries
            .update(|entries| entries.entry(*key).or_default().update(updater));
    }

    fn invalidate(&self, key: &QueryKey) {
        self.entries
            .update(|entries| entries.entry(*key).or_default().invalidate());
    }

    fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .with_untracked(|entries| entries.get(key).map_or(true, CacheEntry::is_stale))
    }

    fn cancel(&self, key: &QueryKey) {
        // Bookkeeping only, views do not care
        self.entries
            .update_untracked(|entries| entries.entry(*key).or_default().cancel());
    }

    fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        self.entries
            .try_update_untracked(|entries| entries.entry(*key).or_default().ticket(*key))
            .unwrap_or_else(|| CacheEntry::<T>::default().ticket(*key))
    }

    fn complete_fetch(&self, ticket: FetchTicket, data: Vec<T>) -> bool {
        let mut data = Some(data);
        let mut written = false;
        self.entries.update(|entries| {
            if let Some(data) = data.take() {
                written = entries.entry(ticket.key).or_default().complete(ticket, data);
            }
        });
        written
    }
}
