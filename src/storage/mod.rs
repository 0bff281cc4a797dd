//! # Storage Layer
//!
//! Everything that touches the filesystem: the list store, configuration,
//! workspace discovery, and task file import/export.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Lists + selection | JSON | `.tasklists/lists.json` |
//! | Config | TOML | `.tasklists/config.toml` |
//! | Exported tasks | JSON array, 2-space indent | anywhere |
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a tasklists workspace
//! - [`ListStore`] - `load_lists` / `save_lists` over the JSON file
//! - [`Config`] - Workspace and global configuration

mod config;
mod store;
mod transfer;
mod workspace;

pub use config::{is_hex_color, Config, ConfigError, GlobalConfig, OutputFormat, WorkspaceConfig};
pub use store::ListStore;
pub use transfer::{
    export_list, export_tasks, import_into, import_list, import_tasks, Export, TransferError,
    EXPORT_MIME_TYPE,
};
pub use workspace::{Workspace, WorkspaceError};
