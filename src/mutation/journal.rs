//! Mutation journal
//!
//! Ordered record of task writes made while at least one optimistic mutation
//! is unresolved, together with the collection as it was before the oldest
//! of them (the base). The cache can always be rebuilt as the base with
//! every surviving entry replayed in order.

use super::patch::TaskPatch;
use crate::models::Task;

#[derive(Debug, Clone)]
struct JournalEntry {
    seq: u64,
    patch: TaskPatch,
    committed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    next_seq: u64,
    base: Vec<Task>,
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Record an optimistic patch; `before` is the collection it was applied to
    pub(crate) fn record(&mut self, before: &[Task], patch: TaskPatch) -> u64 {
        if self.entries.is_empty() {
            self.base = before.to_vec();
        }
        self.push(patch, false)
    }

    /// Record a write the server already confirmed.
    ///
    /// Only kept while some mutation is pending, so a rollback replays it.
    pub(crate) fn record_confirmed(&mut self, patch: TaskPatch) -> Option<u64> {
        if self.pending() == 0 {
            return None;
        }
        Some(self.push(patch, true))
    }

    fn push(&mut self, patch: TaskPatch, committed: bool) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(JournalEntry { seq, patch, committed });
        seq
    }

    pub(crate) fn commit(&mut self, seq: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) {
            entry.committed = true;
        }
        self.prune();
    }

    /// Drop a failed entry and rebuild the collection without it.
    ///
    /// Returns `None` when `seq` is not in the journal.
    pub(crate) fn discard(&mut self, seq: u64) -> Option<Vec<Task>> {
        let before = self.entries.len();
        self.entries.retain(|e| e.seq != seq);
        if self.entries.len() == before {
            return None;
        }
        let rebuilt = self.rebuild();
        self.prune();
        Some(rebuilt)
    }

    /// Fetched data with every live entry replayed on top
    pub(crate) fn replay_onto(&self, fresh: &[Task]) -> Vec<Task> {
        let mut tasks = fresh.to_vec();
        for entry in &self.entries {
            entry.patch.apply(&mut tasks);
        }
        tasks
    }

    /// Accept fetched data as the new base
    pub(crate) fn rebase(&mut self, fresh: Vec<Task>) {
        if !self.entries.is_empty() {
            self.base = fresh;
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.committed).count()
    }

    fn rebuild(&self) -> Vec<Task> {
        self.replay_onto(&self.base)
    }

    /// Fold committed entries older than the oldest pending one into the base
    fn prune(&mut self) {
        let Some(oldest) = self.entries.iter().filter(|e| !e.committed).map(|e| e.seq).min() else {
            self.entries.clear();
            self.base.clear();
            return;
        };
        let (settled, live): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|e| e.seq < oldest);
        for entry in settled {
            entry.patch.apply(&mut self.base);
        }
        self.entries = live;
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
