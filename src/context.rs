//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use crate::cache::QueryKey;
use crate::commands::HttpBackend;
use crate::config::ClientConfig;
use crate::models::{Note, Status, Task};
use crate::mutation::{Caches, MutationCoordinator};
use crate::notice::NoticeQueue;
use crate::store::SignalCache;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub tasks: SignalCache<Task>,
    pub statuses: SignalCache<Status>,
    pub notes: SignalCache<Note>,
    pub notices: NoticeQueue,
    /// The coordinator holds `Rc`s, so it lives in local storage
    coordinator: StoredValue<MutationCoordinator, LocalStorage>,
    /// Bumped to refetch every collection
    pub reload_trigger: RwSignal<u32>,
}

impl AppContext {
    pub fn new(config: &ClientConfig) -> Self {
        let tasks = SignalCache::new();
        let statuses = SignalCache::new();
        let notes = SignalCache::new();
        let notices = NoticeQueue::new(config.notice_ttl_ms);

        let caches = Caches {
            tasks: Rc::new(tasks),
            statuses: Rc::new(statuses),
            notes: Rc::new(notes),
        };
        let coordinator = MutationCoordinator::new(Rc::new(HttpBackend::new(config)), caches, Rc::new(notices), config);

        Self {
            tasks,
            statuses,
            notes,
            notices,
            coordinator: StoredValue::new_local(coordinator),
            reload_trigger: RwSignal::new(0),
        }
    }

    /// Cheap clone for moving into a `spawn_local` future
    pub fn coordinator(&self) -> MutationCoordinator {
        self.coordinator.get_value()
    }

    /// Trigger a reload of every collection
    pub fn reload(&self) {
        self.reload_trigger.update(|v| *v += 1);
    }

    pub fn task_list(&self) -> Vec<Task> {
        self.tasks.read(&QueryKey::Tasks)
    }

    pub fn status_list(&self) -> Vec<Status> {
        self.statuses.read(&QueryKey::Statuses)
    }

    pub fn note_list(&self) -> Vec<Note> {
        self.notes.read(&QueryKey::Notes)
    }
}
