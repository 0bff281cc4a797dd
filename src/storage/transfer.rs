//! Import and export of task files
//!
//! An exported file is the JSON array of a list's tasks, indented with two
//! spaces. Import accepts that array, the older ID-less nested array (see
//! [`crate::domain::flatten_nested`]) or the keyed map (see
//! [`crate::domain::flatten_keyed`]) and wraps the tasks in a new list.
//! A failed import never touches the existing lists.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    create_new_list, flatten_keyed, flatten_nested, LegacyTask, List, ListCollection, ListId,
    NestedTask, Task,
};

/// MIME type of exported files
pub const EXPORT_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("File is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("File does not contain a task list: {0}")]
    InvalidShape(String),

    #[error("Failed to serialize tasks")]
    Serialize(#[source] serde_json::Error),
}

/// An export ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Parses task file content
pub fn import_tasks(text: &str) -> Result<Vec<Task>, TransferError> {
    let value: Value = serde_json::from_str(text).map_err(TransferError::InvalidJson)?;

    let nested = matches!(&value, Value::Array(items) if is_nested_format(items));

    match value {
        Value::Array(_) if nested => {
            serde_json::from_value::<Vec<NestedTask>>(value)
                .map(|nested| flatten_nested(&nested))
                .map_err(|e| TransferError::InvalidShape(e.to_string()))
        }
        Value::Array(_) => serde_json::from_value::<Vec<Task>>(value)
            .map_err(|e| TransferError::InvalidShape(e.to_string())),
        Value::Object(_) => serde_json::from_value::<BTreeMap<String, LegacyTask>>(value)
            .map(|legacy| flatten_keyed(&legacy))
            .map_err(|e| TransferError::InvalidShape(e.to_string())),
        other => Err(TransferError::InvalidShape(format!(
            "expected an array or an object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Older exports carry no task IDs
fn is_nested_format(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| item.get("id").is_none())
}

/// Parses task file content into a new list with the default name
pub fn import_list(text: &str, lists: &[List]) -> Result<List, TransferError> {
    let tasks = import_tasks(text)?;
    Ok(List {
        tasks,
        ..create_new_list(lists)
    })
}

/// Imports task file content as a new list of `collection`
///
/// The collection is only touched once parsing has succeeded.
pub fn import_into(text: &str, collection: &mut ListCollection) -> Result<ListId, TransferError> {
    let list = import_list(text, collection.lists())?;
    let id = list.id.clone();
    collection.add(list);
    Ok(id)
}

/// Serializes tasks as indented JSON
pub fn export_tasks(tasks: &[Task]) -> Result<String, TransferError> {
    serde_json::to_string_pretty(tasks).map_err(TransferError::Serialize)
}

/// Serializes a list's tasks as a downloadable JSON file
pub fn export_list(list: &List) -> Result<Export, TransferError> {
    let text = export_tasks(&list.tasks)?;
    Ok(Export {
        file_name: export_file_name(&list.name),
        mime_type: EXPORT_MIME_TYPE,
        bytes: text.into_bytes(),
    })
}

/// File name for a list export: the list name with path-hostile characters
/// replaced
fn export_file_name(list_name: &str) -> String {
    let stem: String = list_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "tasks.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    const SAMPLE: &str = r#"[
        { "id": "PqRsTuVwXyZaBcD", "name": "Caresser le chat", "isCompleted": true,
          "creationDate": 1728055330008, "order": 0 },
        { "id": "XyZ1wV4tYu8QpLm", "name": "Regarder Harry Potter 3", "isCompleted": false,
          "creationDate": 1728055246008, "order": 1 },
        { "id": "MnOpQr2StUvWxYz", "parentId": "XyZ1wV4tYu8QpLm", "name": "Brancher la télé",
          "isCompleted": true, "creationDate": 1728055330008, "order": 0 }
    ]"#;

    #[test]
    fn imports_flat_array() {
        let tasks = import_tasks(SAMPLE).unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[2].parent_id, Some(TaskId::from("XyZ1wV4tYu8QpLm")));
    }

    #[test]
    fn imports_keyed_map() {
        let tasks = import_tasks(
            r#"{ "k": { "name": "Manger de la choucroute", "isCompleted": false,
                        "creationDate": 1 } }"#,
        )
        .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "k");
        assert_eq!(tasks[0].order, 0);
    }

    #[test]
    fn imports_nested_array_without_ids() {
        let tasks = import_tasks(
            r#"[{
                "name": "Regarder Harry Potter 3",
                "isCompleted": false,
                "creationDate": "2024-10-04T15:20:46.008Z",
                "order": 0,
                "subtasks": [
                    { "name": "Brancher la télé", "isCompleted": true,
                      "creationDate": "2024-10-04T15:22:10.008Z", "order": 0 }
                ]
            }]"#,
        )
        .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_str().len(), 15);
        assert_eq!(tasks[1].parent_id.as_ref(), Some(&tasks[0].id));
        assert_eq!(tasks[0].creation_date, 1728055246008);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = import_tasks("{ not json").unwrap_err();
        assert!(matches!(err, TransferError::InvalidJson(_)));
    }

    #[test]
    fn error_chain_names_the_parser_message_once() {
        let err = anyhow::Error::from(import_tasks("{ not json").unwrap_err());
        let rendered = format!("{:#}", err);

        assert!(rendered.starts_with("File is not valid JSON: "));
        let cause = err.chain().nth(1).unwrap().to_string();
        assert_eq!(rendered.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(import_tasks("42"), Err(TransferError::InvalidShape(_))));
        assert!(matches!(
            import_tasks(r#"[{ "name": "missing fields" }]"#),
            Err(TransferError::InvalidShape(_))
        ));
    }

    #[test]
    fn imported_list_gets_default_name() {
        let list = import_list(SAMPLE, &[]).unwrap();

        assert_eq!(list.name, "Nouvelle liste");
        assert_eq!(list.color, "#21c8d8");
        assert_eq!(list.tasks.len(), 3);
    }

    #[test]
    fn failed_import_leaves_lists_untouched() {
        let mut collection = ListCollection::default();
        collection.create();
        let before = collection.clone();

        assert!(import_into("[{ broken", &mut collection).is_err());
        assert!(import_into("\"just text\"", &mut collection).is_err());
        assert_eq!(collection, before);
    }

    #[test]
    fn import_into_adds_and_selects_when_empty() {
        let mut collection = ListCollection::default();

        let id = import_into(SAMPLE, &mut collection).unwrap();
        assert_eq!(collection.current(), Some(&id));
        assert_eq!(collection.get(&id).unwrap().tasks.len(), 3);
    }

    #[test]
    fn export_is_two_space_indented() {
        let tasks = import_tasks(SAMPLE).unwrap();
        let text = export_tasks(&tasks).unwrap();

        assert!(text.starts_with("[\n  {\n    \"id\": \"PqRsTuVwXyZaBcD\""));
        assert_eq!(import_tasks(&text).unwrap(), tasks);
    }

    #[test]
    fn export_list_sets_mime_and_file_name() {
        let mut list = import_list(SAMPLE, &[]).unwrap();
        list.name = "Soirée à thème".to_string();

        let export = export_list(&list).unwrap();
        assert_eq!(export.mime_type, "application/json");
        assert_eq!(export.file_name, "Soirée_à_thème.json");
        assert!(!export.bytes.is_empty());
    }
}
