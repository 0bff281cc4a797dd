//! tl - nested task lists from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tasklists::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
