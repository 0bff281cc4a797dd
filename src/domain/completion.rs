//! Completion propagation
//!
//! A task with subtasks is complete exactly when all of its direct subtasks
//! are. The flag is stored on every task and recomputed eagerly, walking up
//! the parent chain after each change.

use super::entity::find_item;
use super::id::TaskId;
use super::task::{children_of, set_completion, Task};

/// Sets a task's completion flag, then recomputes its ancestors
pub fn update_task_completion(is_completed: bool, task_id: &TaskId, tasks: &[Task]) -> Vec<Task> {
    let updated = set_completion(task_id, is_completed, tasks);

    let parent_id = find_item(task_id, &updated).and_then(|task| task.parent_id.clone());
    match parent_id {
        Some(parent_id) => propagate_completion(&parent_id, &updated),
        None => updated,
    }
}

/// Recomputes `parent_id` from its children and repeats for each ancestor
///
/// An empty child set counts as complete. The walk stops at a top-level
/// task or an unknown ID, and never runs more steps than there are tasks.
pub fn propagate_completion(parent_id: &TaskId, tasks: &[Task]) -> Vec<Task> {
    let mut updated = tasks.to_vec();
    let mut current = Some(parent_id.clone());
    let mut remaining = tasks.len();

    while let Some(id) = current {
        if remaining == 0 {
            break;
        }
        remaining -= 1;

        let Some(parent) = find_item(&id, &updated) else {
            break;
        };
        let next = parent.parent_id.clone();

        let all_done = children_of(Some(&id), &updated).all(|child| child.is_completed);
        updated = set_completion(&id, all_done, &updated);
        current = next;
    }

    updated
}

/// Returns true if the task has at least one incomplete direct subtask
///
/// Callers use this to refuse direct toggling of such a task.
pub fn has_incomplete_children(task_id: &TaskId, tasks: &[Task]) -> bool {
    children_of(Some(task_id), tasks).any(|child| !child.is_completed)
}

/// A task whose flag disagrees with its subtasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionViolation {
    pub task_id: TaskId,
    pub stored: bool,
    pub expected: bool,
}

/// Lists every task with subtasks whose flag is not the AND of theirs
pub fn completion_violations(tasks: &[Task]) -> Vec<CompletionViolation> {
    tasks
        .iter()
        .filter_map(|task| {
            let mut children = children_of(Some(&task.id), tasks).peekable();
            children.peek()?;
            let expected = children.all(|child| child.is_completed);
            (expected != task.is_completed).then(|| CompletionViolation {
                task_id: task.id.clone(),
                stored: task.is_completed,
                expected,
            })
        })
        .collect()
}
