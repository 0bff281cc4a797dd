//! Workspace management
//!
//! Handles workspace initialization and provides access to the store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use super::{Config, ListStore};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a tasklists workspace. Run 'tl init' first.")]
    NotInWorkspace,
}

/// A directory holding a `.tasklists/` folder
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".tasklists").is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = Config::for_workspace(&root)?;
        debug!(root = %root.display(), "opened workspace");

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_workspace_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a workspace at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".tasklists");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create .tasklists directory: {}", data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r##"# tasklists configuration

# Name and color given to lists created with 'tl list new'
default_list_name = "Nouvelle liste"
default_list_color = "#21c8d8"

# Show creation dates in task trees
show_dates = false
"##;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let workspace = Self::open(root)?;
        let store = workspace.list_store();
        if !store.path().exists() {
            store.save_lists(&Default::default())?;
        }

        Ok(workspace)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .tasklists directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".tasklists")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the list store
    pub fn list_store(&self) -> ListStore {
        ListStore::for_workspace(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        assert!(workspace.data_dir().is_dir());
        assert!(workspace.data_dir().join("config.toml").is_file());
        assert!(workspace.data_dir().join("lists.json").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Workspace::init(dir.path()).unwrap();
        Workspace::init(dir.path()).unwrap();

        assert!(dir.path().join(".tasklists").is_dir());
    }

    #[test]
    fn init_keeps_existing_lists() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        let store = workspace.list_store();
        let mut collection = store.load_lists().unwrap();
        collection.create();
        store.save_lists(&collection).unwrap();

        let workspace = Workspace::init(dir.path()).unwrap();
        assert_eq!(workspace.list_store().load_lists().unwrap().lists().len(), 1);
    }

    #[test]
    fn open_existing_workspace() {
        let dir = TempDir::new().unwrap();
        Workspace::init(dir.path()).unwrap();

        let workspace = Workspace::open(dir.path()).unwrap();
        assert_eq!(workspace.root(), dir.path());
        assert_eq!(workspace.config().workspace.default_list_color, "#21c8d8");
    }

    #[test]
    fn open_non_workspace_fails() {
        let dir = TempDir::new().unwrap();
        let result = Workspace::open(dir.path());

        assert!(result.is_err());
    }
}
