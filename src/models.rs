//! Frontend Models
//!
//! Data structures matching backend entities.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::MutationError;

/// Task status (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order: i32,
}

/// Checklist entry nested in a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "parentSubtaskId", default, skip_serializing_if = "Option::is_none")]
    pub parent_subtask_id: Option<String>,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub status: Status,
    #[serde(rename = "estimatedDate", default, deserialize_with = "lenient_date")]
    pub estimated_date: Option<NaiveDate>,
    #[serde(rename = "dueDate", default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Note data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub order: i32,
}

/// Accepts `YYYY-MM-DD`, a full ISO timestamp (date part kept) or null
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Task attributes the client may edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Title,
    EstimatedDate,
    DueDate,
}

impl TaskField {
    pub const ALL: [TaskField; 3] = [TaskField::Title, TaskField::EstimatedDate, TaskField::DueDate];

    /// JSON key used by the backend
    pub fn wire_name(self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::EstimatedDate => "estimatedDate",
            TaskField::DueDate => "dueDate",
        }
    }

    /// Turn raw input (e.g. an `<input>` value) into a validated edit.
    /// Empty date input clears the date.
    pub fn parse(self, raw: &str) -> Result<FieldEdit, MutationError> {
        let edit = match self {
            TaskField::Title => FieldEdit::Title(raw.trim().to_string()),
            TaskField::EstimatedDate => FieldEdit::EstimatedDate(parse_date_input(self, raw)?),
            TaskField::DueDate => FieldEdit::DueDate(parse_date_input(self, raw)?),
        };
        edit.validate()?;
        Ok(edit)
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TaskField {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| MutationError::Validation(format!("'{}' is not an editable task field", s)))
    }
}

fn parse_date_input(field: TaskField, raw: &str) -> Result<Option<NaiveDate>, MutationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| MutationError::Validation(format!("{} must be a date like 2024-05-31, got '{}'", field, raw)))
}

/// A single field change with its typed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    EstimatedDate(Option<NaiveDate>),
    DueDate(Option<NaiveDate>),
}

impl FieldEdit {
    pub fn field(&self) -> TaskField {
        match self {
            FieldEdit::Title(_) => TaskField::Title,
            FieldEdit::EstimatedDate(_) => TaskField::EstimatedDate,
            FieldEdit::DueDate(_) => TaskField::DueDate,
        }
    }

    /// Title is required; dates are already valid by construction
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            FieldEdit::Title(title) if title.trim().is_empty() => {
                Err(MutationError::Validation("title cannot be empty".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn wire_value(&self) -> Value {
        match self {
            FieldEdit::Title(title) => Value::String(title.clone()),
            FieldEdit::EstimatedDate(date) | FieldEdit::DueDate(date) => date
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        match self {
            FieldEdit::Title(title) => task.title = title.clone(),
            FieldEdit::EstimatedDate(date) => task.estimated_date = *date,
            FieldEdit::DueDate(date) => task.due_date = *date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_from_backend_json() {
        let json = r#"{
            "_id": "t1",
            "title": "Write report",
            "status": { "_id": "s1", "title": "Open", "order": 0 },
            "estimatedDate": "2024-05-01T00:00:00.000Z",
            "dueDate": null,
            "order": 3,
            "subtasks": [{ "_id": "st1", "title": "Outline" }]
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.status.title, "Open");
        assert_eq!(task.estimated_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(task.due_date, None);
        assert_eq!(task.subtasks.len(), 1);
        assert!(!task.subtasks[0].completed);
    }

    #[test]
    fn test_task_missing_optional_fields() {
        let json = r#"{ "_id": "t2", "title": "Bare", "status": { "_id": "s1", "title": "Open" } }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.order, 0);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.estimated_date, None);
    }

    #[test]
    fn test_garbage_date_is_rejected() {
        let json = r#"{ "_id": "t3", "title": "x", "status": { "_id": "s", "title": "s" }, "dueDate": "soon" }"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_parse_title_rejects_blank() {
        assert!(matches!(TaskField::Title.parse("   "), Err(MutationError::Validation(_))));
        assert_eq!(TaskField::Title.parse(" Plan "), Ok(FieldEdit::Title("Plan".to_string())));
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(TaskField::DueDate.parse(""), Ok(FieldEdit::DueDate(None)));
        assert_eq!(
            TaskField::EstimatedDate.parse("2024-02-29"),
            Ok(FieldEdit::EstimatedDate(NaiveDate::from_ymd_opt(2024, 2, 29)))
        );
        assert!(TaskField::DueDate.parse("2023-02-29").is_err());
        assert!(TaskField::DueDate.parse("tomorrow").is_err());
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in TaskField::ALL {
            assert_eq!(field.wire_name().parse::<TaskField>(), Ok(field));
        }
        assert!("status".parse::<TaskField>().is_err());
    }

    #[test]
    fn test_wire_value() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9);
        assert_eq!(FieldEdit::DueDate(date).wire_value(), Value::String("2024-01-09".into()));
        assert_eq!(FieldEdit::DueDate(None).wire_value(), Value::Null);
    }
}
