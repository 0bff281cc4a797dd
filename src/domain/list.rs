//! Lists and the list collection
//!
//! A list owns a flat task collection plus its display metadata. The
//! [`ListCollection`] owns every list and remembers which one is selected.

use serde::{Deserialize, Serialize};

use super::entity::{find_item, find_item_index, update_item};
use super::id::{generate_id, Identified, ListId};
use super::task::Task;

/// Name given to new and imported lists
pub const DEFAULT_LIST_NAME: &str = "Nouvelle liste";

/// Color given to new and imported lists
pub const DEFAULT_LIST_COLOR: &str = "#21c8d8";

/// A named, colored task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    /// Hex color, e.g. `#b83aa0`
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl List {
    /// Returns (completed, total) over every task of the list
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|task| task.is_completed).count();
        (done, self.tasks.len())
    }
}

impl Identified for List {
    type Id = ListId;

    fn id(&self) -> &ListId {
        &self.id
    }
}

/// Builds an empty list with a fresh ID and the default name and color
pub fn create_new_list(lists: &[List]) -> List {
    List {
        id: generate_id(lists),
        name: DEFAULT_LIST_NAME.to_string(),
        color: DEFAULT_LIST_COLOR.to_string(),
        tasks: Vec::new(),
    }
}

/// Appends a list
pub fn add_list(list: List, lists: &[List]) -> Vec<List> {
    let mut updated = lists.to_vec();
    updated.push(list);
    updated
}

/// Removes a list, discarding its tasks
pub fn remove_list(list_id: &ListId, lists: &[List]) -> Vec<List> {
    let mut updated = lists.to_vec();
    if let Some(index) = find_item_index(list_id, &updated) {
        updated.remove(index);
    }
    updated
}

/// Replaces a list's name
pub fn rename_list(list_id: &ListId, name: impl Into<String>, lists: &[List]) -> Vec<List> {
    let name = name.into();
    update_item(list_id, lists, |list| list.name = name)
}

/// Replaces a list's color
pub fn recolor_list(list_id: &ListId, color: impl Into<String>, lists: &[List]) -> Vec<List> {
    let color = color.into();
    update_item(list_id, lists, |list| list.color = color)
}

/// Replaces a list's whole task collection
pub fn replace_tasks(list_id: &ListId, tasks: Vec<Task>, lists: &[List]) -> Vec<List> {
    update_item(list_id, lists, |list| list.tasks = tasks)
}

/// Every list plus the current selection
///
/// Each method swaps in the result of the pure functions above, so a caller
/// holding a clone never sees a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCollection {
    #[serde(default)]
    current: Option<ListId>,
    #[serde(default)]
    lists: Vec<List>,
}

impl ListCollection {
    /// Wraps `lists`, selecting the first one
    pub fn new(lists: Vec<List>) -> Self {
        let current = lists.first().map(|list| list.id.clone());
        Self { current, lists }
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// The selected list ID, if any
    pub fn current(&self) -> Option<&ListId> {
        self.current.as_ref()
    }

    /// The selected list, if any
    pub fn current_list(&self) -> Option<&List> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, list_id: &ListId) -> Option<&List> {
        find_item(list_id, &self.lists)
    }

    /// Selects a list. Unknown IDs leave the selection as it was.
    pub fn select(&mut self, list_id: &ListId) -> bool {
        if self.get(list_id).is_none() {
            return false;
        }
        self.current = Some(list_id.clone());
        true
    }

    /// Creates an empty list and adds it
    pub fn create(&mut self) -> ListId {
        let list = create_new_list(&self.lists);
        let id = list.id.clone();
        self.add(list);
        id
    }

    /// Adds a list, selecting it when nothing is selected yet
    pub fn add(&mut self, list: List) {
        if self.current.is_none() {
            self.current = Some(list.id.clone());
        }
        self.lists = add_list(list, &self.lists);
    }

    /// Removes a list; the selection is cleared if it pointed there
    pub fn remove(&mut self, list_id: &ListId) -> bool {
        let before = self.lists.len();
        self.lists = remove_list(list_id, &self.lists);
        if self.current.as_ref() == Some(list_id) {
            self.current = None;
        }
        self.lists.len() != before
    }

    pub fn rename(&mut self, list_id: &ListId, name: impl Into<String>) {
        self.lists = rename_list(list_id, name, &self.lists);
    }

    pub fn recolor(&mut self, list_id: &ListId, color: impl Into<String>) {
        self.lists = recolor_list(list_id, color, &self.lists);
    }

    /// Runs an engine call over a list's tasks and stores the result
    pub fn update_tasks<F>(&mut self, list_id: &ListId, update: F)
    where
        F: FnOnce(&[Task]) -> Vec<Task>,
    {
        let Some(list) = self.get(list_id) else {
            return;
        };
        let tasks = update(&list.tasks);
        self.lists = replace_tasks(list_id, tasks, &self.lists);
    }
}
