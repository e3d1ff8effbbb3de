//! Mutation Coordinator
//!
//! Wraps each write in an optimistic cache update. Every operation is split
//! into a synchronous `begin_*` step (validate, cancel reads, snapshot, write
//! locally) and an async network step that ends in commit or rollback.
//!
//! Snapshots are taken when the user action is dispatched, never when the
//! network call resolves.

mod journal;
mod patch;


use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::cache::{fetch_query, QueryCache, QueryKey};
use crate::commands::{ChangeStatusArgs, CreateSubtaskArgs, EditTaskArgs, ReorderNotesArgs, TaskBackend};
use crate::config::{ClientConfig, ReorderFailurePolicy, RollbackPolicy};
use crate::error::{ApiError, ApiResult, MutationError};
use crate::models::{FieldEdit, Note, Status, Task, TaskField};
use crate::notice::{NoticeKind, Notifier};

use journal::Journal;
pub use patch::TaskPatch;

/// Lifecycle of one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    /// Local write applied, request in flight
    Optimistic,
    Committed,
    RolledBack,
}

impl MutationPhase {
    pub fn can_advance_to(self, next: MutationPhase) -> bool {
        matches!(
            (self, next),
            (MutationPhase::Idle, MutationPhase::Optimistic)
                | (MutationPhase::Optimistic, MutationPhase::Committed)
                | (MutationPhase::Optimistic, MutationPhase::RolledBack)
        )
    }
}

/// An in-flight write and its rollback point
#[derive(Debug)]
pub struct PendingMutation<T> {
    key: QueryKey,
    target: String,
    label: &'static str,
    /// Journal position; only task mutations are journaled
    seq: Option<u64>,
    snapshot: Rc<[T]>,
    phase: MutationPhase,
}

impl<T> PendingMutation<T> {
    fn new(key: QueryKey, target: &str, label: &'static str, snapshot: Vec<T>) -> Self {
        Self {
            key,
            target: target.to_string(),
            label,
            seq: None,
            snapshot: snapshot.into(),
            phase: MutationPhase::Idle,
        }
    }

    fn advance(&mut self, next: MutationPhase) -> bool {
        if !self.phase.can_advance_to(next) {
            return false;
        }
        self.phase = next;
        true
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Collection as it was right before the optimistic write
    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }
}

/// Caches the coordinator reads and writes
#[derive(Clone)]
pub struct Caches {
    pub tasks: Rc<dyn QueryCache<Task>>,
    pub statuses: Rc<dyn QueryCache<Status>>,
    pub notes: Rc<dyn QueryCache<Note>>,
}

#[derive(Clone)]
pub struct MutationCoordinator {
    backend: Rc<dyn TaskBackend>,
    caches: Caches,
    notifier: Rc<dyn Notifier>,
    journal: Rc<RefCell<Journal>>,
    rollback_policy: RollbackPolicy,
    reorder_failure: ReorderFailurePolicy,
}

impl MutationCoordinator {
    pub fn new(
        backend: Rc<dyn TaskBackend>,
        caches: Caches,
        notifier: Rc<dyn Notifier>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            backend,
            caches,
            notifier,
            journal: Rc::new(RefCell::new(Journal::default())),
            rollback_policy: config.rollback_policy,
            reorder_failure: config.reorder_failure,
        }
    }

    /// Task mutations still waiting on the server
    pub fn pending_count(&self) -> usize {
        self.journal.borrow().pending()
    }

    // ========================
    // Reads
    // ========================

    /// Fetch tasks; writes still journaled stay visible on top of the result
    pub async fn load_tasks(&self) -> ApiResult<bool> {
        let tasks = &self.caches.tasks;
        let ticket = tasks.begin_fetch(&QueryKey::Tasks);
        let fresh = self.backend.list_tasks().await?;

        let merged = self.journal.borrow().replay_onto(&fresh);
        let written = tasks.complete_fetch(ticket, merged);
        if written {
            self.journal.borrow_mut().rebase(fresh);
        } else {
            log::debug!("[CACHE] Dropped tasks read cancelled by a mutation");
        }
        Ok(written)
    }

    pub async fn load_statuses(&self) -> ApiResult<bool> {
        fetch_query(self.caches.statuses.as_ref(), QueryKey::Statuses, self.backend.list_statuses()).await
    }

    pub async fn load_notes(&self) -> ApiResult<bool> {
        fetch_query(self.caches.notes.as_ref(), QueryKey::Notes, self.backend.list_notes()).await
    }

    /// Load every collection, logging failures
    pub async fn refresh_all(&self) {
        if let Err(e) = self.load_statuses().await {
            log::error!("[SYNC] Loading statuses failed: {}", e);
        }
        if let Err(e) = self.load_tasks().await {
            log::error!("[SYNC] Loading tasks failed: {}", e);
        }
        if let Err(e) = self.load_notes().await {
            log::error!("[SYNC] Loading notes failed: {}", e);
        }
    }

    /// Reload only collections marked stale or never loaded
    pub async fn refresh_stale(&self) {
        if self.caches.statuses.is_stale(&QueryKey::Statuses) {
            if let Err(e) = self.load_statuses().await {
                log::error!("[SYNC] Loading statuses failed: {}", e);
            }
        }
        if self.caches.tasks.is_stale(&QueryKey::Tasks) {
            if let Err(e) = self.load_tasks().await {
                log::error!("[SYNC] Loading tasks failed: {}", e);
            }
        }
        if self.caches.notes.is_stale(&QueryKey::Notes) {
            if let Err(e) = self.load_notes().await {
                log::error!("[SYNC] Loading notes failed: {}", e);
            }
        }
    }

    // ========================
    // Optimistic task writes
    // ========================

    pub async fn change_status(&self, task_id: &str, status_id: &str) -> Result<(), MutationError> {
        let mut pending = self.begin_change_status(task_id, status_id)?;
        let args = ChangeStatusArgs {
            new_status: status_id.to_string(),
        };
        let result = self.backend.change_status(task_id, &args).await;
        self.settle(&mut pending, result.map(drop))
    }

    pub async fn edit_field(&self, task_id: &str, edit: FieldEdit) -> Result<(), MutationError> {
        let (mut pending, args) = self.begin_edit_field(task_id, edit)?;
        let result = self.backend.update_task(task_id, &args).await;
        self.settle(&mut pending, result.map(drop))
    }

    /// [`edit_field`](Self::edit_field) from raw input, e.g. a date `<input>`
    pub async fn edit_field_raw(&self, task_id: &str, field: TaskField, raw: &str) -> Result<(), MutationError> {
        let edit = field.parse(raw)?;
        self.edit_field(task_id, edit).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), MutationError> {
        let mut pending = self.begin_delete(task_id)?;
        let result = self.backend.delete_task(task_id).await;
        self.settle(&mut pending, result)
    }

    pub fn begin_change_status(&self, task_id: &str, status_id: &str) -> Result<PendingMutation<Task>, MutationError> {
        self.cached_task(task_id)?;
        let status = self.resolve_status(status_id)?;
        Ok(self.begin_task_patch(TaskPatch::Status {
            task_id: task_id.to_string(),
            status,
        }))
    }

    /// Returns the pending mutation and the full-record body to send
    pub fn begin_edit_field(
        &self,
        task_id: &str,
        edit: FieldEdit,
    ) -> Result<(PendingMutation<Task>, EditTaskArgs), MutationError> {
        edit.validate()?;
        let task = self.cached_task(task_id)?;
        let args = EditTaskArgs::new(&task, &edit);
        let pending = self.begin_task_patch(TaskPatch::Field {
            task_id: task_id.to_string(),
            edit,
        });
        Ok((pending, args))
    }

    pub fn begin_delete(&self, task_id: &str) -> Result<PendingMutation<Task>, MutationError> {
        self.cached_task(task_id)?;
        Ok(self.begin_task_patch(TaskPatch::Remove {
            task_id: task_id.to_string(),
        }))
    }

    fn begin_task_patch(&self, patch: TaskPatch) -> PendingMutation<Task> {
        let tasks = &self.caches.tasks;
        // A read landing after this point would clobber the optimistic write
        tasks.cancel(&QueryKey::Tasks);

        let snapshot = tasks.get(&QueryKey::Tasks).unwrap_or_default();
        let seq = self.journal.borrow_mut().record(&snapshot, patch.clone());
        let mut pending = PendingMutation::new(QueryKey::Tasks, patch.task_id(), patch.label(), snapshot);
        pending.seq = Some(seq);

        tasks.set(&QueryKey::Tasks, &mut |current| patch.apply(current));
        pending.advance(MutationPhase::Optimistic);
        log::debug!("[MUTATION] {} on {} applied optimistically", pending.label, pending.target);
        pending
    }

    /// Resolve a task mutation with the server's answer.
    ///
    /// Success keeps the optimistic state (no refetch). Failure rebuilds the
    /// collection without this mutation (or restores its snapshot under
    /// [`RollbackPolicy::Snapshot`]), raises a notice and returns the
    /// transport error. Settling twice is a no-op.
    pub fn settle(&self, pending: &mut PendingMutation<Task>, result: ApiResult<()>) -> Result<(), MutationError> {
        if pending.phase != MutationPhase::Optimistic {
            log::debug!("[MUTATION] {} on {} already settled", pending.label, pending.target);
            return Ok(());
        }
        match result {
            Ok(()) => {
                if let Some(seq) = pending.seq {
                    self.journal.borrow_mut().commit(seq);
                }
                pending.advance(MutationPhase::Committed);
                log::debug!("[MUTATION] {} on {} confirmed", pending.label, pending.target);
                Ok(())
            }
            Err(err) => {
                self.roll_back(pending);
                log::error!("[MUTATION] {} on {} failed: {}", pending.label, pending.target, err);
                self.notifier
                    .notify(NoticeKind::Error, format!("Could not save {}: {}", pending.label, err));
                Err(MutationError::Transport(err))
            }
        }
    }

    fn roll_back(&self, pending: &mut PendingMutation<Task>) {
        let rebuilt = pending.seq.and_then(|seq| self.journal.borrow_mut().discard(seq));

        let restored = match (self.rollback_policy, rebuilt) {
            (RollbackPolicy::Rebase, Some(rebuilt)) => rebuilt,
            _ => pending.snapshot.to_vec(),
        };
        self.caches.tasks.replace(&QueryKey::Tasks, restored);
        pending.advance(MutationPhase::RolledBack);
    }

    /// Apply a server-confirmed write and keep it for replay by rollbacks
    fn apply_confirmed(&self, patch: TaskPatch) {
        self.caches.tasks.set(&QueryKey::Tasks, &mut |tasks| patch.apply(tasks));
        self.journal.borrow_mut().record_confirmed(patch);
    }

    // ========================
    // Non-optimistic task writes
    // ========================

    /// Duplicate a task; the copy is appended once the server returns it
    pub async fn copy_task(&self, task_id: &str) -> Result<Task, MutationError> {
        self.cached_task(task_id)?;
        match self.backend.copy_task(task_id).await {
            Ok(copy) => {
                self.apply_confirmed(TaskPatch::Insert { task: copy.clone() });
                log::info!("[MUTATION] Copied task {} as {}", task_id, copy.id);
                Ok(copy)
            }
            Err(err) => Err(self.report("copy task", task_id, err)),
        }
    }

    pub async fn create_subtask(
        &self,
        task_id: &str,
        title: &str,
        parent_subtask_id: Option<&str>,
    ) -> Result<Task, MutationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(MutationError::Validation("subtask title cannot be empty".to_string()));
        }
        self.cached_task(task_id)?;

        let args = CreateSubtaskArgs {
            title: title.to_string(),
            parent_subtask_id: parent_subtask_id.map(str::to_string),
        };
        match self.backend.create_subtask(task_id, &args).await {
            Ok(updated) => {
                self.apply_confirmed(TaskPatch::Replace { task: updated.clone() });
                Ok(updated)
            }
            Err(err) => Err(self.report("add subtask", task_id, err)),
        }
    }

    // ========================
    // Note ordering
    // ========================

    /// Apply a new note order locally and persist it as one batch.
    ///
    /// `ordered_ids` must list every cached note exactly once. Persistence is
    /// best-effort: under [`ReorderFailurePolicy::Log`] a failure only logs a
    /// warning, marks the notes stale and the local order stays until the
    /// next refetch.
    pub async fn reorder(&self, ordered_ids: &[String]) -> Result<(), MutationError> {
        let (mut pending, args) = self.begin_reorder(ordered_ids)?;
        match self.backend.reorder_notes(&args).await {
            Ok(()) => {
                pending.advance(MutationPhase::Committed);
                Ok(())
            }
            Err(err) => {
                log::warn!("[REORDER] Persisting order of {} notes failed: {}", ordered_ids.len(), err);
                match self.reorder_failure {
                    ReorderFailurePolicy::Log => self.caches.notes.invalidate(&QueryKey::Notes),
                    ReorderFailurePolicy::Rollback => {
                        self.caches.notes.replace(&QueryKey::Notes, pending.snapshot.to_vec());
                        pending.advance(MutationPhase::RolledBack);
                        self.notifier
                            .notify(NoticeKind::Warning, format!("Could not save the new order: {}", err));
                    }
                }
                Err(MutationError::Transport(err))
            }
        }
    }

    pub fn begin_reorder(&self, ordered_ids: &[String]) -> Result<(PendingMutation<Note>, ReorderNotesArgs), MutationError> {
        let notes = &self.caches.notes;
        let current = notes.get(&QueryKey::Notes).unwrap_or_default();
        let reordered = apply_order(&current, ordered_ids)?;

        notes.cancel(&QueryKey::Notes);
        let mut pending = PendingMutation::new(QueryKey::Notes, "notes", "reorder", current);
        notes.replace(&QueryKey::Notes, reordered);
        pending.advance(MutationPhase::Optimistic);

        Ok((pending, ReorderNotesArgs::from_ids(ordered_ids)))
    }

    // ========================
    // Helpers
    // ========================

    fn cached_task(&self, task_id: &str) -> Result<Task, MutationError> {
        self.caches
            .tasks
            .get(&QueryKey::Tasks)
            .and_then(|tasks| tasks.into_iter().find(|t| t.id == task_id))
            .ok_or_else(|| MutationError::NotFound(format!("task {}", task_id)))
    }

    /// Look the status up in the status list, or on any cached task when the
    /// list has not been loaded
    fn resolve_status(&self, status_id: &str) -> Result<Status, MutationError> {
        let known = match self.caches.statuses.get(&QueryKey::Statuses) {
            Some(statuses) => statuses.into_iter().find(|s| s.id == status_id),
            None => self
                .caches
                .tasks
                .get(&QueryKey::Tasks)
                .unwrap_or_default()
                .into_iter()
                .map(|t| t.status)
                .find(|s| s.id == status_id),
        };
        known.ok_or_else(|| MutationError::Validation(format!("unknown status {}", status_id)))
    }

    fn report(&self, action: &str, task_id: &str, err: ApiError) -> MutationError {
        log::error!("[MUTATION] {} for {} failed: {}", action, task_id, err);
        self.notifier
            .notify(NoticeKind::Error, format!("Could not {}: {}", action, err));
        MutationError::Transport(err)
    }
}

/// Arrange `notes` in `ordered_ids` order with `order` set to the position
fn apply_order(notes: &[Note], ordered_ids: &[String]) -> Result<Vec<Note>, MutationError> {
    let unique: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
    if unique.len() != ordered_ids.len() || ordered_ids.len() != notes.len() {
        return Err(MutationError::Validation(format!(
            "reorder needs each of the {} notes exactly once, got {} ids",
            notes.len(),
            ordered_ids.len()
        )));
    }
    ordered_ids
        .iter()
        .enumerate()
        .map(|(position, id)| {
            let mut note = notes
                .iter()
                .find(|n| &n.id == id)
                .cloned()
                .ok_or_else(|| MutationError::Validation(format!("note {} is not in the list", id)))?;
            note.order = position as i32;
            Ok(note)
        })
        .collect()
}
