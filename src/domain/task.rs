//! Task domain model
//!
//! Tasks live in a flat collection. The tree shape comes only from
//! `parent_id`, and `order` ranks a task among the tasks sharing its parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::update_item;
use super::id::{Identified, TaskId};

/// Returns the current time as milliseconds since the epoch
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// A task within a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier within the list
    pub id: TaskId,

    /// Parent task, `None` for top-level tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,

    /// Display name
    pub name: String,

    /// Completion flag. Derived from the subtasks when there are any.
    pub is_completed: bool,

    /// Creation time in milliseconds since the epoch
    pub creation_date: i64,

    /// Rank among siblings, dense from 0
    pub order: u32,
}

impl Task {
    /// Creates an incomplete task
    pub fn new(id: TaskId, name: impl Into<String>, parent_id: Option<TaskId>, order: u32) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            is_completed: false,
            creation_date: current_timestamp(),
            order,
        }
    }

    /// Returns true if the task has no parent
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns true if `self` and `other` share the same parent
    pub fn is_sibling_of(&self, other: &Task) -> bool {
        self.parent_id == other.parent_id
    }

    /// Returns true if the task is a direct child of `parent_id`
    pub fn has_parent(&self, parent_id: Option<&TaskId>) -> bool {
        self.parent_id.as_ref() == parent_id
    }

    /// Creation time as a UTC datetime
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.creation_date)
    }
}

impl Identified for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }
}

/// Returns the direct children of `parent_id` (top-level tasks for `None`)
pub fn children_of<'a>(
    parent_id: Option<&'a TaskId>,
    tasks: &'a [Task],
) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |task| task.has_parent(parent_id))
}

/// Returns true if any task has `task_id` as its parent
pub fn has_children(task_id: &TaskId, tasks: &[Task]) -> bool {
    children_of(Some(task_id), tasks).next().is_some()
}

// =============================================================================
// Typed field updates
// =============================================================================

/// Replaces a task's name
pub fn rename_task(task_id: &TaskId, name: impl Into<String>, tasks: &[Task]) -> Vec<Task> {
    let name = name.into();
    update_item(task_id, tasks, |task| task.name = name)
}

/// Replaces a task's completion flag without touching its ancestors
pub fn set_completion(task_id: &TaskId, is_completed: bool, tasks: &[Task]) -> Vec<Task> {
    update_item(task_id, tasks, |task| task.is_completed = is_completed)
}

/// Replaces a task's sibling rank
pub fn set_order(task_id: &TaskId, order: u32, tasks: &[Task]) -> Vec<Task> {
    update_item(task_id, tasks, |task| task.order = order)
}

/// Moves a task under another parent (or to the top level)
pub fn set_parent(task_id: &TaskId, parent_id: Option<TaskId>, tasks: &[Task]) -> Vec<Task> {
    update_item(task_id, tasks, |task| task.parent_id = parent_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, parent: Option<&str>, order: u32) -> Task {
        Task::new(id.into(), format!("Task {}", id), parent.map(TaskId::from), order)
    }

    #[test]
    fn new_task_is_incomplete() {
        let task = make_task("a", None, 0);

        assert!(!task.is_completed);
        assert!(task.is_top_level());
        assert!(task.created_at().is_some());
    }

    #[test]
    fn children_of_filters_by_parent() {
        let tasks = vec![
            make_task("a", None, 0),
            make_task("b", Some("a"), 0),
            make_task("c", Some("a"), 1),
            make_task("d", None, 1),
        ];

        let top: Vec<_> = children_of(None, &tasks).map(|t| t.id.as_str()).collect();
        assert_eq!(top, vec!["a", "d"]);

        let parent = TaskId::from("a");
        let subtasks: Vec<_> = children_of(Some(&parent), &tasks).map(|t| t.id.as_str()).collect();
        assert_eq!(subtasks, vec!["b", "c"]);

        assert!(has_children(&parent, &tasks));
        assert!(!has_children(&TaskId::from("d"), &tasks));
    }

    #[test]
    fn typed_updates_touch_one_field() {
        let tasks = vec![make_task("a", None, 0), make_task("b", None, 1)];
        let id = TaskId::from("b");

        let renamed = rename_task(&id, "Caresser le chat", &tasks);
        assert_eq!(renamed[1].name, "Caresser le chat");
        assert_eq!(renamed[1].order, 1);

        let completed = set_completion(&id, true, &tasks);
        assert!(completed[1].is_completed);
        assert!(!completed[0].is_completed);

        let reordered = set_order(&id, 5, &tasks);
        assert_eq!(reordered[1].order, 5);

        let moved = set_parent(&id, Some("a".into()), &tasks);
        assert_eq!(moved[1].parent_id, Some(TaskId::from("a")));
    }

    #[test]
    fn serde_uses_camel_case_and_omits_missing_parent() {
        let mut task = make_task("MnOpQr2StUvWxYz", None, 2);
        task.creation_date = 1728055330008;

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["creationDate"], 1728055330008_i64);
        assert!(json.get("parentId").is_none());

        let child = make_task("C7D8EfGhIjKlMnO", Some("XyZ1wV4tYu8QpLm"), 0);
        let json = serde_json::to_value(&child).unwrap();
        assert_eq!(json["parentId"], "XyZ1wV4tYu8QpLm");
    }

    #[test]
    fn deserializes_exported_file_shape() {
        let json = r#"{
            "id": "aBcD3FgHiJkLmNo",
            "name": "Manger de la choucroute",
            "isCompleted": false,
            "creationDate": 1727974236002,
            "order": 1
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "aBcD3FgHiJkLmNo");
        assert!(task.parent_id.is_none());
        assert_eq!(task.order, 1);
    }
}
