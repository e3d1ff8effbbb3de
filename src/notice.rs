//! User-visible Notices
//!
//! Transient messages raised when a mutation fails.

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Surfaces a message to the user
pub trait Notifier {
    fn notify(&self, kind: NoticeKind, message: String);
}

/// Reactive notice list rendered by `NoticeBar`
#[derive(Clone, Copy)]
pub struct NoticeQueue {
    notices: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u64>,
    ttl_ms: u32,
}

impl NoticeQueue {
    pub fn new(ttl_ms: u32) -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            ttl_ms,
        }
    }

    /// Tracked list of visible notices
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.get()
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|notices| notices.retain(|n| n.id != id));
    }

    fn push(&self, kind: NoticeKind, message: String) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.notices.update(|notices| notices.push(Notice { id, kind, message }));
        id
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, kind: NoticeKind, message: String) {
        let id = self.push(kind, message);
        if self.ttl_ms > 0 {
            let queue = *self;
            gloo_timers::callback::Timeout::new(self.ttl_ms, move || queue.dismiss(id)).forget();
        }
    }
}
