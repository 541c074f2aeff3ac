//! CLI parse: clap types for SlothFrame. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SlothFrame CLI - lazy frames behind a credential-gated execution engine
#[derive(Parser, Debug)]
#[command(name = "slothframe")]
#[command(about = "Lazy tabular frames with credential-gated execution")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (added on top of the user config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Input rows plus the operations to queue on them.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding an array of row objects
    #[arg(long)]
    pub input: PathBuf,

    /// Filter as COLUMN<op>VALUE, e.g. `status==active`; repeatable
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Comma-separated columns to keep
    #[arg(long)]
    pub select: Option<String>,

    /// Queue the select before the filters instead of after
    #[arg(long)]
    pub select_first: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report the cost of the queued plan without running it
    Estimate {
        #[command(flatten)]
        query: QueryArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the queued plan
    Plan {
        #[command(flatten)]
        query: QueryArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Unlock (when a token is given) and export the frame as CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,
        /// Destination file
        #[arg(long)]
        output: PathBuf,
        /// Credential; falls back to SLOTHFRAME_TOKEN
        #[arg(long)]
        token: Option<String>,
    },
}
