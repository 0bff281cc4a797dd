//! Domain models for tasklists
//!
//! Contains the list and task engines without any I/O concerns. Every
//! operation takes the current collection by reference and returns a new
//! one.

mod completion;
mod entity;
mod id;
mod legacy;
mod list;
mod ordering;
mod task;

pub use completion::{
    completion_violations, has_incomplete_children, propagate_completion, update_task_completion,
    CompletionViolation,
};
pub use entity::{find_item, find_item_index, update_item};
pub use id::{generate_id, generate_id_with, Identified, ListId, TaskId, ID_LENGTH};
pub use legacy::{flatten_keyed, flatten_nested, LegacyDate, LegacyTask, NestedTask};
pub use list::{
    add_list, create_new_list, recolor_list, remove_list, rename_list, replace_tasks, List,
    ListCollection, DEFAULT_LIST_COLOR, DEFAULT_LIST_NAME,
};
pub use ordering::{
    add_task, create_task, order_violations, remove_task, sorted_children, swap_order,
    OrderViolation, SwapDirection,
};
pub use task::{
    children_of, current_timestamp, has_children, rename_task, set_completion, set_order,
    set_parent, Task,
};
