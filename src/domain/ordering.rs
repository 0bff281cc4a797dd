//! Sibling ordering
//!
//! Every sibling group (tasks sharing a `parent_id`, top level included)
//! holds the ranks `0..n` exactly once. Each operation below returns a new
//! collection that keeps that true.
//!
//! ## Operations
//!
//! | Operation | Effect on the group |
//! |-----------|---------------------|
//! | [`create_task`] | picks a rank, mutates nothing |
//! | [`add_task`] | opens a hole at the new rank, inserts |
//! | [`remove_task`] | closes the hole, promotes children one level |
//! | [`swap_order`] | exchanges ranks with the adjacent sibling |
//!
//! Unknown IDs are no-ops: the input comes back unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::completion::propagate_completion;
use super::entity::find_item;
use super::id::{generate_id, TaskId};
use super::task::{children_of, has_children, Task};

/// Direction for [`swap_order`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwapDirection {
    /// Move one rank earlier
    Asc,
    /// Move one rank later
    Desc,
}

/// Builds a new task for `parent_id` without inserting it
///
/// The task goes to the end of its sibling group unless `insert_at` names
/// one of those siblings, in which case it takes that sibling's rank
/// ([`add_task`] then pushes the sibling and everything after it down).
pub fn create_task(
    tasks: &[Task],
    name: impl Into<String>,
    parent_id: Option<&TaskId>,
    insert_at: Option<&TaskId>,
) -> Task {
    let displaced = insert_at
        .and_then(|id| find_item(id, tasks))
        .filter(|sibling| sibling.has_parent(parent_id));

    let order = match displaced {
        Some(sibling) => sibling.order,
        None => children_of(parent_id, tasks).count() as u32,
    };

    Task::new(generate_id(tasks), name, parent_id.cloned(), order)
}

/// Inserts `new_task`, shifting later siblings and reopening its ancestors
pub fn add_task(new_task: Task, tasks: &[Task]) -> Vec<Task> {
    let mut updated: Vec<Task> = tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if task.is_sibling_of(&new_task) && task.order >= new_task.order {
                task.order += 1;
            }
            task
        })
        .collect();

    let parent_id = new_task.parent_id.clone();
    updated.push(new_task);

    match parent_id {
        Some(parent_id) => propagate_completion(&parent_id, &updated),
        None => updated,
    }
}

/// Removes a task, closing the gap it leaves and promoting its children
///
/// Direct children move to the removed task's parent and are appended after
/// the remaining siblings in their previous relative order. Grandchildren
/// stay attached to their (now promoted) parent.
pub fn remove_task(task_id: &TaskId, tasks: &[Task]) -> Vec<Task> {
    let Some(removed) = find_item(task_id, tasks) else {
        return tasks.to_vec();
    };
    let removed = removed.clone();

    let remaining_siblings = children_of(removed.parent_id.as_ref(), tasks)
        .filter(|task| task.id != removed.id)
        .count() as u32;

    let mut promoted: Vec<&Task> = children_of(Some(&removed.id), tasks).collect();
    promoted.sort_by_key(|task| task.order);
    let new_ranks: BTreeMap<&TaskId, u32> = promoted
        .iter()
        .enumerate()
        .map(|(index, task)| (&task.id, remaining_siblings + index as u32))
        .collect();

    let updated: Vec<Task> = tasks
        .iter()
        .filter(|task| task.id != removed.id)
        .map(|task| {
            let mut task = task.clone();
            if let Some(&rank) = new_ranks.get(&task.id) {
                task.parent_id = removed.parent_id.clone();
                task.order = rank;
            } else if task.is_sibling_of(&removed) && task.order > removed.order {
                task.order -= 1;
            }
            task
        })
        .collect();

    match removed.parent_id {
        Some(parent_id) if has_children(&parent_id, &updated) => {
            propagate_completion(&parent_id, &updated)
        }
        _ => updated,
    }
}

/// Exchanges a task's rank with its neighbour in `direction`
///
/// A task already first (`Asc`) or last (`Desc`) is left where it is.
pub fn swap_order(task_id: &TaskId, direction: SwapDirection, tasks: &[Task]) -> Vec<Task> {
    let Some(task) = find_item(task_id, tasks) else {
        return tasks.to_vec();
    };

    let neighbour_order = match direction {
        SwapDirection::Asc => task.order.checked_sub(1),
        SwapDirection::Desc => task.order.checked_add(1),
    };
    let neighbour = neighbour_order.and_then(|order| {
        children_of(task.parent_id.as_ref(), tasks).find(|sibling| sibling.order == order)
    });
    let Some(neighbour) = neighbour else {
        return tasks.to_vec();
    };

    let (first, first_order) = (task.id.clone(), task.order);
    let (second, second_order) = (neighbour.id.clone(), neighbour.order);

    tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if task.id == first {
                task.order = second_order;
            } else if task.id == second {
                task.order = first_order;
            }
            task
        })
        .collect()
}

/// Siblings of `parent_id` sorted by rank
pub fn sorted_children<'a>(parent_id: Option<&TaskId>, tasks: &'a [Task]) -> Vec<&'a Task> {
    let mut children: Vec<&Task> = tasks.iter().filter(|task| task.has_parent(parent_id)).collect();
    children.sort_by_key(|task| task.order);
    children
}

/// A sibling group whose ranks are not exactly `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    pub parent_id: Option<TaskId>,
    pub orders: Vec<u32>,
}

/// Lists every sibling group that breaks rank density
pub fn order_violations(tasks: &[Task]) -> Vec<OrderViolation> {
    let mut groups: BTreeMap<Option<&TaskId>, Vec<u32>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.parent_id.as_ref()).or_default().push(task.order);
    }

    groups
        .into_iter()
        .filter_map(|(parent_id, mut orders)| {
            orders.sort_unstable();
            let dense = orders.iter().enumerate().all(|(rank, &order)| order == rank as u32);
            (!dense).then(|| OrderViolation {
                parent_id: parent_id.cloned(),
                orders,
            })
        })
        .collect()
}
