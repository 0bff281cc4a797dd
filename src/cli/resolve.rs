//! Resolution of user-typed IDs
//!
//! IDs can be abbreviated to any unique prefix, like git hashes. The target
//! list is the one named with `--list`, or else the selected list.

use thiserror::Error;

use crate::domain::{ListCollection, ListId, Task, TaskId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("No list selected. Use 'tl list select <id>' or pass --list.")]
    NoListSelected,

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("'{0}' matches several IDs: {1}")]
    Ambiguous(String, String),

    #[error("Completion of {0} follows its subtasks; complete or reopen those instead")]
    DerivedCompletion(TaskId),

    #[error("Invalid color '{0}': expected a hex color like #21c8d8")]
    InvalidColor(String),
}

/// Picks the unique ID equal to or starting with `query`
fn resolve<'a, I>(query: &str, ids: I) -> Result<Option<&'a str>, CliError>
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.into_iter().collect();

    if let Some(exact) = ids.iter().find(|id| **id == query) {
        return Ok(Some(*exact));
    }

    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(query)).collect();
    match matches.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(*single)),
        several => Err(CliError::Ambiguous(query.to_string(), several.join(", "))),
    }
}

/// Resolves a list ID or prefix
pub fn resolve_list(collection: &ListCollection, query: &str) -> Result<ListId, CliError> {
    let ids = collection.lists().iter().map(|list| list.id.as_str());
    resolve(query, ids)?
        .map(ListId::from)
        .ok_or_else(|| CliError::ListNotFound(query.to_string()))
}

/// Resolves the list a task command works on
pub fn target_list(
    collection: &ListCollection,
    explicit: Option<&str>,
) -> Result<ListId, CliError> {
    match explicit {
        Some(query) => resolve_list(collection, query),
        None => collection
            .current_list()
            .map(|list| list.id.clone())
            .ok_or(CliError::NoListSelected),
    }
}

/// Resolves a task ID or prefix within one list
pub fn resolve_task(tasks: &[Task], query: &str) -> Result<TaskId, CliError> {
    let ids = tasks.iter().map(|task| task.id.as_str());
    resolve(query, ids)?
        .map(TaskId::from)
        .ok_or_else(|| CliError::TaskNotFound(query.to_string()))
}
