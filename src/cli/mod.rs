//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup | `init` |
//! | List | Lists and selection | `list new`, `list select`, `list export` |
//! | Task | Tasks of one list | `task add`, `task done`, `task up` |
//!
//! Task commands work on the selected list unless `--list <id>` is given.
//! IDs may be shortened to any unique prefix.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr, or set
//! `TASKLISTS_LOG` to any tracing filter:
//! ```bash
//! TASKLISTS_LOG=tasklists=trace tl task ls
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod list;
mod output;
mod resolve;
mod task;

pub use app::{run, Cli, Commands, LOG_ENV};
pub use output::{Output, OutputFormat};
pub use resolve::CliError;
