//! Note Commands
//!
//! Request bodies for note endpoints.

use serde::Serialize;

pub const REORDER_PATH: &str = "notes/reorder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteOrder {
    #[serde(rename = "_id")]
    pub id: String,
    pub order: i32,
}

/// Body for `POST /notes/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderNotesArgs {
    pub notes: Vec<NoteOrder>,
}

impl ReorderNotesArgs {
    /// Position in `ordered_ids` becomes the persisted order
    pub fn from_ids(ordered_ids: &[String]) -> Self {
        Self {
            notes: ordered_ids
                .iter()
                .enumerate()
                .map(|(order, id)| NoteOrder {
                    id: id.clone(),
                    order: order as i32,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reorder_payload_shape() {
        let ids = vec!["C".to_string(), "A".to_string(), "B".to_string()];
        let body = serde_json::to_value(ReorderNotesArgs::from_ids(&ids)).unwrap();
        assert_eq!(
            body,
            json!({ "notes": [
                { "_id": "C", "order": 0 },
                { "_id": "A", "order": 1 },
                { "_id": "B", "order": 2 }
            ]})
        );
    }
}
