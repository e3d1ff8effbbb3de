//! Test fixtures: an in-memory backend and a notifier that records.

use std::cell::RefCell;
use std::collections::HashSet;

use async_trait::async_trait;

use crate::commands::{ChangeStatusArgs, CreateSubtaskArgs, EditTaskArgs, ReorderNotesArgs, TaskBackend};
use crate::error::{ApiError, ApiResult};
use crate::models::{Note, Status, Subtask, Task};
use crate::notice::{NoticeKind, Notifier};

pub fn status(id: &str) -> Status {
    Status {
        id: id.to_string(),
        title: id.to_uppercase(),
        order: 0,
    }
}

pub fn task(id: &str, title: &str, status_id: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        status: status(status_id),
        estimated_date: None,
        due_date: None,
        order: 0,
        subtasks: Vec::new(),
    }
}

pub fn note(id: &str, order: i32) -> Note {
    Note {
        id: id.to_string(),
        title: format!("Note {}", id),
        content: String::new(),
        order,
    }
}

/// One request as seen by [`FakeBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListTasks,
    ListStatuses,
    ListNotes,
    ChangeStatus(String, ChangeStatusArgs),
    UpdateTask(String, EditTaskArgs),
    DeleteTask(String),
    CopyTask(String),
    CreateSubtask(String, CreateSubtaskArgs),
    ReorderNotes(ReorderNotesArgs),
}

/// Backend double: records calls, answers from seeded data, fails on demand
#[derive(Default)]
pub struct FakeBackend {
    pub tasks: RefCell<Vec<Task>>,
    pub statuses: RefCell<Vec<Status>>,
    pub notes: RefCell<Vec<Note>>,
    calls: RefCell<Vec<Call>>,
    failing: RefCell<HashSet<&'static str>>,
}

impl FakeBackend {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let backend = Self::default();
        *backend.tasks.borrow_mut() = tasks;
        backend
    }

    /// Make every call to `op` (the trait method name) fail with a 500
    pub fn fail(&self, op: &'static str) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, op: &'static str, call: Call) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(op) {
            return Err(ApiError::Status {
                code: 500,
                body: format!("{} failed", op),
            });
        }
        Ok(())
    }

    fn find_task(&self, task_id: &str) -> ApiResult<Task> {
        self.tasks
            .borrow()
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                code: 404,
                body: format!("no task {}", task_id),
            })
    }
}

#[async_trait(?Send)]
impl TaskBackend for FakeBackend {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.record("list_tasks", Call::ListTasks)?;
        Ok(self.tasks.borrow().clone())
    }

    async fn list_statuses(&self) -> ApiResult<Vec<Status>> {
        self.record("list_statuses", Call::ListStatuses)?;
        Ok(self.statuses.borrow().clone())
    }

    async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        self.record("list_notes", Call::ListNotes)?;
        Ok(self.notes.borrow().clone())
    }

    async fn change_status(&self, task_id: &str, args: &ChangeStatusArgs) -> ApiResult<Task> {
        self.record("change_status", Call::ChangeStatus(task_id.to_string(), args.clone()))?;
        let mut task = self.find_task(task_id)?;
        task.status = status(&args.new_status);
        Ok(task)
    }

    async fn update_task(&self, task_id: &str, args: &EditTaskArgs) -> ApiResult<Task> {
        self.record("update_task", Call::UpdateTask(task_id.to_string(), args.clone()))?;
        let mut task = self.find_task(task_id)?;
        task.title = args.title.clone();
        Ok(task)
    }

    async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        self.record("delete_task", Call::DeleteTask(task_id.to_string()))
    }

    async fn copy_task(&self, task_id: &str) -> ApiResult<Task> {
        self.record("copy_task", Call::CopyTask(task_id.to_string()))?;
        let mut copy = self.find_task(task_id)?;
        copy.id = format!("{}-copy", task_id);
        copy.title = format!("{} (copy)", copy.title);
        Ok(copy)
    }

    async fn create_subtask(&self, task_id: &str, args: &CreateSubtaskArgs) -> ApiResult<Task> {
        self.record("create_subtask", Call::CreateSubtask(task_id.to_string(), args.clone()))?;
        let mut task = self.find_task(task_id)?;
        task.subtasks.push(Subtask {
            id: format!("{}-sub-{}", task_id, task.subtasks.len() + 1),
            title: args.title.clone(),
            completed: false,
            parent_subtask_id: args.parent_subtask_id.clone(),
        });
        Ok(task)
    }

    async fn reorder_notes(&self, args: &ReorderNotesArgs) -> ApiResult<()> {
        self.record("reorder_notes", Call::ReorderNotes(args.clone()))
    }
}

/// Notifier that keeps every message
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notices.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: String) {
        self.notices.borrow_mut().push((kind, message));
    }
}
