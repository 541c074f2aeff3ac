//! CLI presentation: text and json formatters per command family.

mod estimate;
mod export;

pub use estimate::{format_estimate, format_plan};
pub use export::format_export_summary;
