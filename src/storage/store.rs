//! JSON storage for lists
//!
//! All lists live in `.tasklists/lists.json` together with the current
//! selection. Reads take a shared lock, writes go through a locked temp file
//! and an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::debug;

use crate::domain::ListCollection;

/// Store for the list collection
pub struct ListStore {
    path: PathBuf,
}

impl ListStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a workspace
    pub fn for_workspace(root: &Path) -> Self {
        Self::new(root.join(".tasklists").join("lists.json"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every list; a missing file is an empty collection
    pub fn load_lists(&self) -> Result<ListCollection> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no list store yet");
            return Ok(ListCollection::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open list store: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on list store")?;

        let collection: ListCollection = serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse list store: {}", self.path.display()))?;

        debug!(lists = collection.lists().len(), "loaded lists");
        Ok(collection)
    }

    /// Writes every list (full rewrite)
    pub fn save_lists(&self, collection: &ListCollection) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on list store")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, collection)
                .context("Failed to serialize lists")?;
            writeln!(writer).context("Failed to write list store")?;
            writer.flush().context("Failed to flush list store")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        debug!(lists = collection.lists().len(), path = %self.path.display(), "saved lists");
        Ok(())
    }
}
