//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string used in log fields (e.g. "estimate", "export").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Estimate { .. } => "estimate",
        Commands::Plan { .. } => "plan",
        Commands::Export { .. } => "export",
    }
}
