//! Estimate and plan presentation.

use crate::error::FrameError;
use crate::estimate::CostEstimate;
use crate::plan::{Plan, PlanOperation};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

pub fn format_estimate(estimate: &CostEstimate, format: &str) -> Result<String, FrameError> {
    if format == "json" {
        return serde_json::to_string_pretty(estimate)
            .map_err(|e| FrameError::InvalidInput(e.to_string()));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Estimated rows", "Complexity", "Status"]);
    table.add_row(vec![
        estimate.estimated_rows.to_string(),
        format!("{:.1}", estimate.complexity),
        estimate.status.to_string(),
    ]);
    Ok(table.to_string())
}

pub fn format_plan(plan: &Plan, format: &str) -> Result<String, FrameError> {
    if format == "json" {
        return serde_json::to_string_pretty(plan)
            .map_err(|e| FrameError::InvalidInput(e.to_string()));
    }

    if plan.is_empty() {
        return Ok("Plan is empty.".to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Operation", "Detail"]);
    for (index, operation) in plan.iter().enumerate() {
        let detail = match operation {
            PlanOperation::Filter {
                column,
                operator,
                value,
            } => format!("{} {} {}", column, operator, value),
            PlanOperation::Select { columns } => columns.join(", "),
        };
        table.add_row(vec![
            (index + 1).to_string(),
            operation.kind().to_string(),
            detail,
        ]);
    }
    Ok(table.to_string())
}
