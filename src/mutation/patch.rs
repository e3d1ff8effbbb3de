//! Optimistic task patches
//!
//! A patch is the local effect of one write, replayable onto any copy of
//! the task collection. Every patch is idempotent, so replaying one whose
//! effect a refetch already contains is harmless.

use crate::models::{FieldEdit, Status, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPatch {
    Status { task_id: String, status: Status },
    Field { task_id: String, edit: FieldEdit },
    Remove { task_id: String },
    /// Server-created task (copy)
    Insert { task: Task },
    /// Server's version of an existing task (after adding a subtask)
    Replace { task: Task },
}

impl TaskPatch {
    pub fn task_id(&self) -> &str {
        match self {
            TaskPatch::Status { task_id, .. }
            | TaskPatch::Field { task_id, .. }
            | TaskPatch::Remove { task_id } => task_id,
            TaskPatch::Insert { task } | TaskPatch::Replace { task } => &task.id,
        }
    }

    /// Short label used in notices and logs
    pub fn label(&self) -> &'static str {
        match self {
            TaskPatch::Status { .. } => "status change",
            TaskPatch::Field { .. } => "task edit",
            TaskPatch::Remove { .. } => "delete",
            TaskPatch::Insert { .. } => "copy",
            TaskPatch::Replace { .. } => "subtask",
        }
    }

    /// Apply to a collection; a missing task is left alone
    pub fn apply(&self, tasks: &mut Vec<Task>) {
        match self {
            TaskPatch::Remove { task_id } => tasks.retain(|t| &t.id != task_id),
            TaskPatch::Status { task_id, status } => {
                if let Some(task) = tasks.iter_mut().find(|t| &t.id == task_id) {
                    task.status = status.clone();
                }
            }
            TaskPatch::Field { task_id, edit } => {
                if let Some(task) = tasks.iter_mut().find(|t| &t.id == task_id) {
                    edit.apply_to(task);
                }
            }
            TaskPatch::Insert { task } => match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => *existing = task.clone(),
                None => tasks.push(task.clone()),
            },
            TaskPatch::Replace { task } => {
                if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
                    *existing = task.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{status, task};

    #[test]
    fn test_status_patch() {
        let mut tasks = vec![task("a", "A", "open"), task("b", "B", "open")];
        TaskPatch::Status { task_id: "b".into(), status: status("done") }.apply(&mut tasks);
        assert_eq!(tasks[0].status.id, "open");
        assert_eq!(tasks[1].status.id, "done");
    }

    #[test]
    fn test_remove_patch_keeps_others_in_place() {
        let mut tasks = vec![task("a", "A", "open"), task("b", "B", "open"), task("c", "C", "open")];
        TaskPatch::Remove { task_id: "b".into() }.apply(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_insert_twice_keeps_one_copy() {
        let mut tasks = vec![task("a", "A", "open")];
        let insert = TaskPatch::Insert { task: task("a-copy", "A", "open") };
        insert.apply(&mut tasks);
        insert.apply(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "a-copy"]);
    }

    #[test]
    fn test_replace_skips_removed_task() {
        let mut tasks = vec![task("a", "A", "open")];
        TaskPatch::Replace { task: task("b", "B2", "open") }.apply(&mut tasks);
        assert_eq!(tasks.len(), 1);

        TaskPatch::Replace { task: task("a", "A2", "done") }.apply(&mut tasks);
        assert_eq!(tasks[0].title, "A2");
        assert_eq!(tasks[0].status.id, "done");
    }

    #[test]
    fn test_patch_on_missing_task_is_noop() {
        let mut tasks = vec![task("a", "A", "open")];
        let before = tasks.clone();
        TaskPatch::Field { task_id: "zzz".into(), edit: FieldEdit::Title("x".into()) }.apply(&mut tasks);
        assert_eq!(tasks, before);
    }
}
