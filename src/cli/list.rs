//! List CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::debug;

use super::output::Output;
use super::resolve::{resolve_list, target_list, CliError};
use crate::domain::{create_new_list, List};
use crate::storage::{export_list, import_into, is_hex_color, Workspace};

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a new empty list
    New {
        /// List name (defaults to the configured name)
        #[arg(long, short)]
        name: Option<String>,

        /// Hex color, e.g. #b83aa0
        #[arg(long, short)]
        color: Option<String>,
    },

    /// Show all lists
    Ls,

    /// Select the list task commands work on
    Select {
        /// List ID or unique prefix
        id: String,
    },

    /// Change a list's name or color
    Edit {
        /// List ID or unique prefix
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long, short)]
        color: Option<String>,
    },

    /// Delete a list and all of its tasks
    Rm {
        /// List ID or unique prefix
        id: String,
    },

    /// Create a list from an exported JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Export a list's tasks as JSON
    ///
    /// Without --output the JSON is written to stdout.
    Export {
        /// List ID or unique prefix (defaults to the selected list)
        id: Option<String>,

        /// File or directory to write to
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run(cmd: ListCommands, output: &Output, workspace: &Workspace) -> Result<()> {
    match cmd {
        ListCommands::New { name, color } => new_list(output, workspace, name, color),
        ListCommands::Ls => list_lists(output, workspace),
        ListCommands::Select { id } => select_list(output, workspace, &id),
        ListCommands::Edit { id, name, color } => edit_list(output, workspace, &id, name, color),
        ListCommands::Rm { id } => remove(output, workspace, &id),
        ListCommands::Import { file } => import(output, workspace, &file),
        ListCommands::Export { id, output: path } => export(output, workspace, id.as_deref(), path),
    }
}

fn check_color(color: &str) -> Result<(), CliError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(CliError::InvalidColor(color.to_string()))
    }
}

fn list_summary(list: &List, is_current: bool) -> serde_json::Value {
    let (done, total) = list.progress();
    serde_json::json!({
        "id": list.id,
        "name": list.name,
        "color": list.color,
        "completed": done,
        "total": total,
        "current": is_current,
    })
}

fn new_list(
    output: &Output,
    workspace: &Workspace,
    name: Option<String>,
    color: Option<String>,
) -> Result<()> {
    if let Some(color) = &color {
        check_color(color)?;
    }

    let defaults = &workspace.config().workspace;
    let store = workspace.list_store();
    let mut collection = store.load_lists()?;

    let list = List {
        name: name.unwrap_or_else(|| defaults.default_list_name.clone()),
        color: color.unwrap_or_else(|| defaults.default_list_color.clone()),
        ..create_new_list(collection.lists())
    };
    let summary = list_summary(&list, collection.current().is_none());
    let (id, name) = (list.id.clone(), list.name.clone());

    collection.add(list);
    store.save_lists(&collection)?;
    debug!(list = %id, "created list");

    if output.is_json() {
        output.data(&summary);
    } else {
        output.success(&format!("Created list: {} - {}", id, name));
    }

    Ok(())
}

fn list_lists(output: &Output, workspace: &Workspace) -> Result<()> {
    let collection = workspace.list_store().load_lists()?;
    let current = collection.current();

    if output.is_json() {
        let items: Vec<_> = collection
            .lists()
            .iter()
            .map(|list| list_summary(list, Some(&list.id) == current))
            .collect();
        output.data(&items);
    } else if collection.is_empty() {
        println!("No lists");
    } else {
        println!("  {:<16} {:<8} {:<8} NAME", "ID", "COLOR", "DONE");
        println!("{}", "-".repeat(60));

        for list in collection.lists() {
            let marker = if Some(&list.id) == current { "*" } else { " " };
            let (done, total) = list.progress();
            println!(
                "{} {:<16} {:<8} {:<8} {}",
                marker,
                list.id,
                list.color,
                format!("{}/{}", done, total),
                list.name
            );
        }
    }

    Ok(())
}

fn select_list(output: &Output, workspace: &Workspace, query: &str) -> Result<()> {
    let store = workspace.list_store();
    let mut collection = store.load_lists()?;

    let id = resolve_list(&collection, query)?;
    collection.select(&id);
    store.save_lists(&collection)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "current": id }));
    } else {
        output.success(&format!("Selected list: {}", id));
    }

    Ok(())
}

fn edit_list(
    output: &Output,
    workspace: &Workspace,
    query: &str,
    name: Option<String>,
    color: Option<String>,
) -> Result<()> {
    if let Some(color) = &color {
        check_color(color)?;
    }

    let store = workspace.list_store();
    let mut collection = store.load_lists()?;
    let id = resolve_list(&collection, query)?;

    if let Some(name) = name {
        collection.rename(&id, name);
    }
    if let Some(color) = color {
        collection.recolor(&id, color);
    }
    store.save_lists(&collection)?;

    let list = collection
        .get(&id)
        .ok_or_else(|| CliError::ListNotFound(id.to_string()))?;

    if output.is_json() {
        output.data(&list_summary(list, collection.current() == Some(&id)));
    } else {
        output.success(&format!("Updated list: {} - {} ({})", list.id, list.name, list.color));
    }

    Ok(())
}

fn remove(output: &Output, workspace: &Workspace, query: &str) -> Result<()> {
    let store = workspace.list_store();
    let mut collection = store.load_lists()?;

    let id = resolve_list(&collection, query)?;
    collection.remove(&id);
    store.save_lists(&collection)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "removed": id }));
    } else {
        output.success(&format!("Removed list: {}", id));
    }

    Ok(())
}

fn import(output: &Output, workspace: &Workspace, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = workspace.list_store();
    let mut collection = store.load_lists()?;

    let id = import_into(&text, &mut collection)
        .with_context(|| format!("The file {} does not have the expected format", file.display()))?;
    let list = collection
        .get(&id)
        .ok_or_else(|| CliError::ListNotFound(id.to_string()))?;
    let summary = list_summary(list, collection.current() == Some(&id));
    let count = list.tasks.len();

    store.save_lists(&collection)?;
    debug!(list = %id, tasks = count, "imported list");

    if output.is_json() {
        output.data(&summary);
    } else {
        output.success(&format!("Imported {} task(s) into list {}", count, id));
    }

    Ok(())
}

fn export(
    output: &Output,
    workspace: &Workspace,
    query: Option<&str>,
    path: Option<PathBuf>,
) -> Result<()> {
    let collection = workspace.list_store().load_lists()?;
    let id = target_list(&collection, query)?;
    let list = collection
        .get(&id)
        .ok_or_else(|| CliError::ListNotFound(id.to_string()))?;

    let export = export_list(list)?;
    debug!(list = %id, mime = export.mime_type, bytes = export.bytes.len(), "exporting list");

    let Some(path) = path else {
        // Raw file content regardless of --format
        println!("{}", String::from_utf8_lossy(&export.bytes));
        return Ok(());
    };

    let path = if path.is_dir() { path.join(&export.file_name) } else { path };
    fs::write(&path, &export.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "list": id,
            "path": path.display().to_string(),
            "mime_type": export.mime_type,
        }));
    } else {
        output.success(&format!("Exported list {} to {}", id, path.display()));
    }

    Ok(())
}
