//! Readers for the older nested task formats
//!
//! The first generation of the app exported an array of tasks without IDs,
//! each carrying its rank and its own `subtasks` array:
//!
//! ```json
//! [
//!   { "name": "Regarder Harry Potter 3", "isCompleted": false,
//!     "creationDate": "2024-10-04T15:20:46.008Z", "order": 0,
//!     "subtasks": [ { "name": "Brancher la télé", ... } ] }
//! ]
//! ```
//!
//! A later one stored an object keyed by task ID. Each task may hold its own
//! `subtasks` object of the same shape, and siblings are chained by
//! `previousTaskId` instead of carrying a rank:
//!
//! ```json
//! {
//!   "k1": { "name": "Brancher la télé", "isCompleted": true,
//!           "creationDate": "2024-10-04T15:22:10.008Z" },
//!   "k2": { "name": "Trouver la télécommande", "isCompleted": false,
//!           "creationDate": 1728062914020, "previousTaskId": "k1",
//!           "subtasks": { ... } }
//! }
//! ```
//!
//! [`flatten_nested`] and [`flatten_keyed`] convert these into the flat model
//! with dense ranks and IDs unique across the whole list. Keyed chains can be
//! broken or cyclic; tasks the chain does not reach are appended by creation
//! date. A key already used elsewhere in the file gets a fresh ID.

use std::collections::{BTreeMap, HashSet};

use chrono::DateTime;
use serde::Deserialize;

use super::id::{generate_id, TaskId};
use super::task::Task;

/// Creation date as written by either generation of the app
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyDate {
    Millis(i64),
    Text(String),
}

impl LegacyDate {
    /// Milliseconds since the epoch; unparseable text maps to 0
    pub fn to_millis(&self) -> i64 {
        match self {
            LegacyDate::Millis(ms) => *ms,
            LegacyDate::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|date| date.timestamp_millis())
                .unwrap_or(0),
        }
    }
}

/// A task in the ID-less array format
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTask {
    pub name: String,
    pub is_completed: bool,
    pub creation_date: LegacyDate,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub subtasks: Vec<NestedTask>,
}

/// A task in the keyed map format
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTask {
    pub name: String,
    pub is_completed: bool,
    pub creation_date: LegacyDate,
    #[serde(default)]
    pub previous_task_id: Option<String>,
    #[serde(default)]
    pub subtasks: Option<BTreeMap<String, LegacyTask>>,
}

/// Converts an ID-less nested array into flat tasks with fresh IDs
pub fn flatten_nested(tasks: &[NestedTask]) -> Vec<Task> {
    let mut flat = Vec::new();
    flatten_nested_level(tasks, None, &mut flat);
    flat
}

fn flatten_nested_level(level: &[NestedTask], parent_id: Option<&TaskId>, out: &mut Vec<Task>) {
    let mut ranked: Vec<&NestedTask> = level.iter().collect();
    ranked.sort_by_key(|task| (task.order, task.creation_date.to_millis()));

    for (order, nested) in ranked.into_iter().enumerate() {
        let id = generate_id(out);
        out.push(Task {
            id: id.clone(),
            parent_id: parent_id.cloned(),
            name: nested.name.clone(),
            is_completed: nested.is_completed,
            creation_date: nested.creation_date.to_millis(),
            order: order as u32,
        });

        flatten_nested_level(&nested.subtasks, Some(&id), out);
    }
}

/// Converts a keyed, nested task map into flat tasks
pub fn flatten_keyed(tasks: &BTreeMap<String, LegacyTask>) -> Vec<Task> {
    let mut flat = Vec::new();
    let mut taken = HashSet::new();
    flatten_keyed_level(tasks, None, &mut taken, &mut flat);
    flat
}

fn flatten_keyed_level(
    level: &BTreeMap<String, LegacyTask>,
    parent_id: Option<&TaskId>,
    taken: &mut HashSet<TaskId>,
    out: &mut Vec<Task>,
) {
    for (order, key) in chain_order(level).into_iter().enumerate() {
        let legacy = &level[key];

        // Keys are only unique within one level
        let mut id = TaskId::from(key.as_str());
        if taken.contains(&id) {
            id = generate_id(out);
        }
        taken.insert(id.clone());

        out.push(Task {
            id: id.clone(),
            parent_id: parent_id.cloned(),
            name: legacy.name.clone(),
            is_completed: legacy.is_completed,
            creation_date: legacy.creation_date.to_millis(),
            order: order as u32,
        });

        if let Some(subtasks) = &legacy.subtasks {
            flatten_keyed_level(subtasks, Some(&id), taken, out);
        }
    }
}

/// Keys of one level in display order
fn chain_order(level: &BTreeMap<String, LegacyTask>) -> Vec<&String> {
    let mut ordered: Vec<&String> = Vec::with_capacity(level.len());
    let mut seen: HashSet<&String> = HashSet::new();

    let head = level.iter().find(|(_, task)| {
        task.previous_task_id
            .as_ref()
            .map_or(true, |previous| !level.contains_key(previous))
    });

    let mut cursor = head.map(|(key, _)| key);
    while let Some(key) = cursor {
        if !seen.insert(key) {
            break;
        }
        ordered.push(key);
        cursor = level
            .iter()
            .find(|(candidate, task)| {
                !seen.contains(candidate) && task.previous_task_id.as_ref() == Some(key)
            })
            .map(|(candidate, _)| candidate);
    }

    let mut stragglers: Vec<&String> = level.keys().filter(|key| !seen.contains(key)).collect();
    stragglers.sort_by_key(|key| (level[*key].creation_date.to_millis(), (*key).clone()));
    ordered.extend(stragglers);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::order_violations;

    fn legacy(json: &str) -> BTreeMap<String, LegacyTask> {
        serde_json::from_str(json).unwrap()
    }

    fn order_of(id: &str, tasks: &[Task]) -> u32 {
        tasks.iter().find(|t| t.id.as_str() == id).unwrap().order
    }

    #[test]
    fn follows_the_previous_task_chain() {
        let tasks = flatten_keyed(&legacy(
            r#"{
                "c": { "name": "third", "isCompleted": false, "creationDate": 1,
                       "previousTaskId": "a" },
                "a": { "name": "second", "isCompleted": false, "creationDate": 2,
                       "previousTaskId": "z" },
                "z": { "name": "first", "isCompleted": true, "creationDate": 3 }
            }"#,
        ));

        assert_eq!(order_of("z", &tasks), 0);
        assert_eq!(order_of("a", &tasks), 1);
        assert_eq!(order_of("c", &tasks), 2);
    }

    #[test]
    fn nests_subtasks_under_their_parent() {
        let tasks = flatten_keyed(&legacy(
            r#"{
                "p": {
                    "name": "Regarder Harry Potter 3",
                    "isCompleted": false,
                    "creationDate": "2024-10-04T15:20:46.008Z",
                    "subtasks": {
                        "s1": { "name": "Brancher la télé", "isCompleted": true,
                                "creationDate": 10 },
                        "s2": { "name": "Allumer les enceintes", "isCompleted": false,
                                "creationDate": 11, "previousTaskId": "s1" }
                    }
                }
            }"#,
        ));

        assert_eq!(tasks.len(), 3);
        let s2 = tasks.iter().find(|t| t.id.as_str() == "s2").unwrap();
        assert_eq!(s2.parent_id, Some(TaskId::from("p")));
        assert_eq!(s2.order, 1);

        let p = tasks.iter().find(|t| t.id.as_str() == "p").unwrap();
        assert_eq!(p.creation_date, 1728055246008);
    }

    #[test]
    fn broken_and_cyclic_chains_still_yield_dense_ranks() {
        let tasks = flatten_keyed(&legacy(
            r#"{
                "a": { "name": "a", "isCompleted": false, "creationDate": 5,
                       "previousTaskId": "b" },
                "b": { "name": "b", "isCompleted": false, "creationDate": 4,
                       "previousTaskId": "a" },
                "c": { "name": "c", "isCompleted": false, "creationDate": 1 }
            }"#,
        ));

        assert!(order_violations(&tasks).is_empty());
        assert_eq!(order_of("c", &tasks), 0);
        // a and b form a loop the head never reaches; oldest first
        assert_eq!(order_of("b", &tasks), 1);
        assert_eq!(order_of("a", &tasks), 2);
    }

    #[test]
    fn repeated_keys_across_levels_get_fresh_ids() {
        let tasks = flatten_keyed(&legacy(
            r#"{
                "a": {
                    "name": "outer", "isCompleted": false, "creationDate": 1,
                    "subtasks": {
                        "a": {
                            "name": "inner", "isCompleted": false, "creationDate": 2,
                            "subtasks": {
                                "a": { "name": "deepest", "isCompleted": false,
                                       "creationDate": 3 }
                            }
                        }
                    }
                }
            }"#,
        ));

        let ids: HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(tasks.iter().all(|t| t.parent_id.as_ref() != Some(&t.id)));

        let inner = tasks.iter().find(|t| t.name == "inner").unwrap();
        let deepest = tasks.iter().find(|t| t.name == "deepest").unwrap();
        assert_eq!(inner.parent_id, Some(TaskId::from("a")));
        assert_eq!(deepest.parent_id.as_ref(), Some(&inner.id));
    }

    #[test]
    fn nested_array_gets_ids_parents_and_dense_ranks() {
        let nested: Vec<NestedTask> = serde_json::from_str(
            r#"[
                { "name": "Caresser le chat", "isCompleted": true,
                  "creationDate": "2024-10-04T15:22:10.008Z", "order": 3 },
                { "name": "Regarder Harry Potter 3", "isCompleted": false,
                  "creationDate": "2024-10-04T15:20:46.008Z", "order": 1,
                  "subtasks": [
                      { "name": "Trouver le DVD", "isCompleted": false,
                        "creationDate": 20, "order": 0 },
                      { "name": "Brancher la télé", "isCompleted": true,
                        "creationDate": 10, "order": 0 }
                  ] }
            ]"#,
        )
        .unwrap();
        let tasks = flatten_nested(&nested);

        assert_eq!(tasks.len(), 4);
        assert!(order_violations(&tasks).is_empty());

        let ids: HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 4);

        let by_name = |name: &str| tasks.iter().find(|t| t.name == name).unwrap();
        let movie = by_name("Regarder Harry Potter 3");
        assert_eq!(movie.order, 0);
        assert_eq!(movie.creation_date, 1728055246008);
        assert_eq!(by_name("Caresser le chat").order, 1);

        // Equal ranks fall back to creation date
        assert_eq!(by_name("Brancher la télé").order, 0);
        assert_eq!(by_name("Trouver le DVD").order, 1);
        assert_eq!(by_name("Trouver le DVD").parent_id.as_ref(), Some(&movie.id));
    }

    #[test]
    fn unparseable_date_falls_back_to_epoch() {
        assert_eq!(LegacyDate::Text("yesterday".to_string()).to_millis(), 0);
        assert_eq!(LegacyDate::Millis(42).to_millis(), 42);
    }
}
