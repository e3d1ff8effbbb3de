//! Task Commands
//!
//! Request bodies and paths for task endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{FieldEdit, Task};

use super::encode_segment;

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeStatusArgs {
    #[serde(rename = "newStatus")]
    pub new_status: String,
}

/// Full-record replace body for `PUT /edit-task/{id}`.
///
/// The backend overwrites the record, so `title` and `status` are always
/// resent alongside the changed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditTaskArgs {
    pub title: String,
    /// Status id
    pub status: String,
    #[serde(flatten)]
    pub changed: Map<String, Value>,
}

impl EditTaskArgs {
    /// Build the body from the task as cached at dispatch time
    pub fn new(task: &Task, edit: &FieldEdit) -> Self {
        let mut args = Self {
            title: task.title.clone(),
            status: task.status.id.clone(),
            changed: Map::new(),
        };
        match edit {
            FieldEdit::Title(title) => args.title = title.clone(),
            other => {
                args.changed.insert(other.field().wire_name().to_string(), other.wire_value());
            }
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSubtaskArgs {
    pub title: String,
    #[serde(rename = "parentSubtaskId", skip_serializing_if = "Option::is_none")]
    pub parent_subtask_id: Option<String>,
}

// ========================
// Paths
// ========================

pub fn status_path(task_id: &str) -> String {
    format!("task/{}/status", encode_segment(task_id))
}

pub fn edit_path(task_id: &str) -> String {
    format!("edit-task/{}", encode_segment(task_id))
}

pub fn delete_path(task_id: &str) -> String {
    format!("delete-task/{}", encode_segment(task_id))
}

pub fn copy_path(task_id: &str) -> String {
    format!("copy-task/{}", encode_segment(task_id))
}

pub fn subtasks_path(task_id: &str) -> String {
    format!("tasks/{}/subtasks", encode_segment(task_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use chrono::NaiveDate;
    use serde_json::json;

    fn task() -> Task {
        Task {
            id: "t1".into(),
            title: "Draft".into(),
            status: Status { id: "s-open".into(), title: "Open".into(), order: 0 },
            estimated_date: None,
            due_date: None,
            order: 0,
            subtasks: vec![],
        }
    }

    #[test]
    fn test_edit_date_resends_title_and_status() {
        let edit = FieldEdit::DueDate(NaiveDate::from_ymd_opt(2024, 6, 1));
        let body = serde_json::to_value(EditTaskArgs::new(&task(), &edit)).unwrap();
        assert_eq!(body, json!({ "title": "Draft", "status": "s-open", "dueDate": "2024-06-01" }));
    }

    #[test]
    fn test_edit_title_has_single_title_key() {
        let edit = FieldEdit::Title("Final".into());
        let body = serde_json::to_value(EditTaskArgs::new(&task(), &edit)).unwrap();
        assert_eq!(body, json!({ "title": "Final", "status": "s-open" }));
    }

    #[test]
    fn test_clearing_a_date_sends_null() {
        let edit = FieldEdit::EstimatedDate(None);
        let body = serde_json::to_value(EditTaskArgs::new(&task(), &edit)).unwrap();
        assert_eq!(body["estimatedDate"], Value::Null);
    }

    #[test]
    fn test_change_status_body() {
        let body = serde_json::to_value(ChangeStatusArgs { new_status: "s2".into() }).unwrap();
        assert_eq!(body, json!({ "newStatus": "s2" }));
    }

    #[test]
    fn test_subtask_body_omits_missing_parent() {
        let body = serde_json::to_value(CreateSubtaskArgs { title: "Step".into(), parent_subtask_id: None }).unwrap();
        assert_eq!(body, json!({ "title": "Step" }));
    }

    #[test]
    fn test_paths_encode_ids() {
        assert_eq!(status_path("abc"), "task/abc/status");
        assert_eq!(delete_path("a/b c"), "delete-task/a%2Fb%20c");
        assert_eq!(subtasks_path("x-1_2.3~"), "tasks/x-1_2.3~/subtasks");
    }
}
