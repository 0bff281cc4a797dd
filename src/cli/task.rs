//! Task CLI commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tracing::debug;

use super::output::Output;
use super::resolve::{resolve_task, target_list, CliError};
use crate::domain::{
    add_task, completion_violations, create_task, find_item, has_children, order_violations,
    remove_task, rename_task, sorted_children, swap_order, update_task_completion, List,
    ListCollection, ListId, SwapDirection, Task, TaskId,
};
use crate::storage::{ListStore, Workspace};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    ///
    /// Examples:
    ///   tl task add "Caresser le chat"                  # Last top-level task
    ///   tl task add "Brancher la télé" --parent XyZ1    # Last subtask of XyZ1
    ///   tl task add "Manger" --before PqRs              # Takes PqRs's place
    Add {
        /// Task name
        name: String,

        /// Parent task ID or prefix
        #[arg(long, short)]
        parent: Option<String>,

        /// Insert at this sibling's position, pushing it down
        #[arg(long, short)]
        before: Option<String>,
    },

    /// Show the task tree of the list
    Ls,

    /// Rename a task
    Rename {
        /// Task ID or prefix
        id: String,

        /// New name
        name: String,
    },

    /// Mark a task as completed
    Done {
        /// Task ID or prefix
        id: String,
    },

    /// Mark a task as not completed
    Undo {
        /// Task ID or prefix
        id: String,
    },

    /// Delete a task; its subtasks move up one level
    Rm {
        /// Task ID or prefix
        id: String,
    },

    /// Move a task one position earlier among its siblings
    Up {
        /// Task ID or prefix
        id: String,
    },

    /// Move a task one position later among its siblings
    Down {
        /// Task ID or prefix
        id: String,
    },

    /// Verify sibling ranks and completion flags
    Check,
}

pub fn run(
    cmd: TaskCommands,
    output: &Output,
    workspace: &Workspace,
    list: Option<&str>,
) -> Result<()> {
    let store = workspace.list_store();
    let mut collection = store.load_lists()?;
    let list_id = target_list(&collection, list)?;
    debug!(list = %list_id, "task command target");

    match cmd {
        TaskCommands::Ls => show_tree(output, list_of(&collection, &list_id)?, workspace),
        TaskCommands::Check => check(output, list_of(&collection, &list_id)?),
        TaskCommands::Add { name, parent, before } => add(
            output,
            &store,
            &mut collection,
            &list_id,
            &name,
            parent.as_deref(),
            before.as_deref(),
        ),
        TaskCommands::Rename { id, name } => {
            let task_id = resolve_in(&collection, &list_id, &id)?;
            collection.update_tasks(&list_id, |tasks| {
                rename_task(&task_id, name.as_str(), tasks)
            });
            finish(output, &store, &collection, &list_id, &task_id, "Renamed task")
        }
        TaskCommands::Done { id } => {
            set_completed(output, &store, &mut collection, &list_id, &id, true)
        }
        TaskCommands::Undo { id } => {
            set_completed(output, &store, &mut collection, &list_id, &id, false)
        }
        TaskCommands::Rm { id } => {
            let task_id = resolve_in(&collection, &list_id, &id)?;
            collection.update_tasks(&list_id, |tasks| remove_task(&task_id, tasks));
            store.save_lists(&collection)?;

            if output.is_json() {
                output.data(&serde_json::json!({ "removed": task_id }));
            } else {
                output.success(&format!("Removed task: {}", task_id));
            }
            Ok(())
        }
        TaskCommands::Up { id } => {
            let direction = SwapDirection::Asc;
            move_task(output, &store, &mut collection, &list_id, &id, direction)
        }
        TaskCommands::Down { id } => {
            let direction = SwapDirection::Desc;
            move_task(output, &store, &mut collection, &list_id, &id, direction)
        }
    }
}

fn list_of<'a>(collection: &'a ListCollection, list_id: &ListId) -> Result<&'a List, CliError> {
    collection
        .get(list_id)
        .ok_or_else(|| CliError::ListNotFound(list_id.to_string()))
}

fn resolve_in(
    collection: &ListCollection,
    list_id: &ListId,
    query: &str,
) -> Result<TaskId, CliError> {
    resolve_task(&list_of(collection, list_id)?.tasks, query)
}

/// Saves and reports the task after a change
fn finish(
    output: &Output,
    store: &ListStore,
    collection: &ListCollection,
    list_id: &ListId,
    task_id: &TaskId,
    verb: &str,
) -> Result<()> {
    store.save_lists(collection)?;

    let list = list_of(collection, list_id)?;
    let task = find_item(task_id, &list.tasks)
        .ok_or_else(|| CliError::TaskNotFound(task_id.to_string()))?;

    if output.is_json() {
        output.data(task);
    } else {
        output.success(&format!("{}: {} - {}", verb, task.id, task.name));
    }
    Ok(())
}

fn add(
    output: &Output,
    store: &ListStore,
    collection: &mut ListCollection,
    list_id: &ListId,
    name: &str,
    parent: Option<&str>,
    before: Option<&str>,
) -> Result<()> {
    let tasks = &list_of(collection, list_id)?.tasks;

    let parent_id = parent.map(|query| resolve_task(tasks, query)).transpose()?;
    let before_id = before.map(|query| resolve_task(tasks, query)).transpose()?;

    // Without --parent, a task inserted before another joins that task's group
    let parent_id = parent_id.or_else(|| {
        before_id
            .as_ref()
            .and_then(|id| find_item(id, tasks))
            .and_then(|task| task.parent_id.clone())
    });

    let task = create_task(tasks, name, parent_id.as_ref(), before_id.as_ref());
    let task_id = task.id.clone();
    debug!(task = %task_id, order = task.order, "adding task");

    collection.update_tasks(list_id, |tasks| add_task(task, tasks));
    finish(output, store, collection, list_id, &task_id, "Created task")
}

fn set_completed(
    output: &Output,
    store: &ListStore,
    collection: &mut ListCollection,
    list_id: &ListId,
    query: &str,
    is_completed: bool,
) -> Result<()> {
    let tasks = &list_of(collection, list_id)?.tasks;
    let task_id = resolve_task(tasks, query)?;

    if has_children(&task_id, tasks) {
        return Err(CliError::DerivedCompletion(task_id).into());
    }

    collection.update_tasks(list_id, |tasks| update_task_completion(is_completed, &task_id, tasks));
    let verb = if is_completed { "Completed task" } else { "Reopened task" };
    finish(output, store, collection, list_id, &task_id, verb)
}

fn move_task(
    output: &Output,
    store: &ListStore,
    collection: &mut ListCollection,
    list_id: &ListId,
    query: &str,
    direction: SwapDirection,
) -> Result<()> {
    let task_id = resolve_in(collection, list_id, query)?;
    collection.update_tasks(list_id, |tasks| swap_order(&task_id, direction, tasks));
    finish(output, store, collection, list_id, &task_id, "Moved task")
}

/// A task with its subtasks, for JSON output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskNode<'a> {
    #[serde(flatten)]
    task: &'a Task,
    subtasks: Vec<TaskNode<'a>>,
}

fn build_nodes<'a>(
    parent_id: Option<&TaskId>,
    tasks: &'a [Task],
    depth: usize,
) -> Vec<TaskNode<'a>> {
    // Guards against parentId cycles in hand-edited files
    if depth > tasks.len() {
        return Vec::new();
    }

    sorted_children(parent_id, tasks)
        .into_iter()
        .map(|task| TaskNode {
            task,
            subtasks: build_nodes(Some(&task.id), tasks, depth + 1),
        })
        .collect()
}

fn print_nodes(output: &Output, nodes: &[TaskNode], depth: usize, show_dates: bool) {
    for node in nodes {
        let check = if node.task.is_completed { "[x]" } else { "[ ]" };
        let indent = "    ".repeat(depth);
        if show_dates {
            println!(
                "{:<16} {}{} {}  ({})",
                node.task.id,
                indent,
                check,
                node.task.name,
                output.date(node.task.creation_date)
            );
        } else {
            println!("{:<16} {}{} {}", node.task.id, indent, check, node.task.name);
        }
        print_nodes(output, &node.subtasks, depth + 1, show_dates);
    }
}

fn show_tree(output: &Output, list: &List, workspace: &Workspace) -> Result<()> {
    let nodes = build_nodes(None, &list.tasks, 0);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": list.id,
            "name": list.name,
            "color": list.color,
            "tasks": nodes,
        }));
        return Ok(());
    }

    let (done, total) = list.progress();
    println!("{} ({})  {}/{} done", list.name, list.color, done, total);
    println!("{}", "-".repeat(60));

    if nodes.is_empty() {
        println!("No tasks");
    } else {
        print_nodes(output, &nodes, 0, workspace.config().workspace.show_dates);
    }

    Ok(())
}

fn check(output: &Output, list: &List) -> Result<()> {
    let order = order_violations(&list.tasks);
    let completion = completion_violations(&list.tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "list": list.id,
            "ok": order.is_empty() && completion.is_empty(),
            "order": order.iter().map(|v| serde_json::json!({
                "parentId": v.parent_id,
                "orders": v.orders,
            })).collect::<Vec<_>>(),
            "completion": completion.iter().map(|v| serde_json::json!({
                "id": v.task_id,
                "stored": v.stored,
                "expected": v.expected,
            })).collect::<Vec<_>>(),
        }));
    } else {
        for violation in &order {
            let group = violation
                .parent_id
                .as_ref()
                .map_or_else(|| "top level".to_string(), |id| format!("subtasks of {}", id));
            println!(
                "Ranks of {} are {:?}, expected 0..{}",
                group,
                violation.orders,
                violation.orders.len()
            );
        }
        for violation in &completion {
            println!(
                "Task {} is marked {} but its subtasks say {}",
                violation.task_id,
                if violation.stored { "done" } else { "not done" },
                if violation.expected { "done" } else { "not done" },
            );
        }
    }

    if order.is_empty() && completion.is_empty() {
        if !output.is_json() {
            output.success(&format!("List {} is consistent", list.id));
        }
        Ok(())
    } else {
        anyhow::bail!(
            "{} rank problem(s), {} completion problem(s)",
            order.len(),
            completion.len()
        )
    }
}
