//! CLI domain: parse, route, help, output, and presentation only.
//! Frame semantics live in the library; the route table only wires them to commands.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, QueryArgs};
pub use presentation::{format_estimate, format_export_summary, format_plan};
pub use route::{load_rows, parse_filter, parse_select, RunContext, TOKEN_ENV};
