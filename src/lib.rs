//! tasklists - nested task lists with automatic completion
//!
//! A workspace holds several lists. Each list owns a flat collection of
//! tasks linked by `parent_id` and ranked among their siblings. A task with
//! subtasks is completed exactly when all of its subtasks are.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{List, ListCollection, ListId, Task, TaskId};
