//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{list, task};
use crate::storage::{GlobalConfig, Workspace};

/// Environment variable holding a tracing filter, e.g. `tasklists=trace`
pub const LOG_ENV: &str = "TASKLISTS_LOG";

#[derive(Parser)]
#[command(name = "tl")]
#[command(author, version, about = "Nested task lists with automatic completion")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// List to work on instead of the selected one (ID or prefix)
    #[arg(long, short = 'l', global = true, env = "TASKLISTS_LIST")]
    pub list: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a tasklists workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage lists
    #[command(subcommand)]
    List(list::ListCommands),

    /// Manage the tasks of a list
    #[command(subcommand)]
    Task(task::TaskCommands),
}

/// Installs the stderr subscriber
///
/// `TASKLISTS_LOG` wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be set when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn output_for(cli_format: Option<OutputFormat>, global: &GlobalConfig) -> Output {
    let format = cli_format.unwrap_or_else(|| global.default_format.into());
    Output::new(format, global.date_format.clone())
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!("tasklists starting");

    match cli.command {
        Commands::Init { path } => {
            debug!(path = %path, "initializing workspace");
            let workspace = Workspace::init(&path)?;
            let output = output_for(cli.format, &workspace.config().global);
            debug!(data_dir = %workspace.data_dir().display(), "created data directory");

            if output.is_json() {
                output.data(&serde_json::json!({
                    "root": workspace.root().display().to_string(),
                    "lists": workspace.list_store().path().display().to_string(),
                }));
            } else {
                output.success(&format!(
                    "Initialized tasklists workspace at {}",
                    workspace.root().display()
                ));
            }
        }

        Commands::List(cmd) => {
            let workspace = Workspace::open_current()?;
            let output = output_for(cli.format, &workspace.config().global);
            list::run(cmd, &output, &workspace)?
        }

        Commands::Task(cmd) => {
            let workspace = Workspace::open_current()?;
            let output = output_for(cli.format, &workspace.config().global);
            task::run(cmd, &output, &workspace, cli.list.as_deref())?
        }
    }

    debug!("command completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_format_overrides_config() {
        let global = GlobalConfig::default();
        assert!(output_for(Some(OutputFormat::Json), &global).is_json());
        assert!(!output_for(None, &global).is_json());
    }

    #[test]
    fn list_flag_is_global() {
        let cli = Cli::try_parse_from(["tl", "task", "ls", "--list", "abc"]).unwrap();
        assert_eq!(cli.list.as_deref(), Some("abc"));
    }
}
