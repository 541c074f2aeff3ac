//! Execution engine: applies a plan to a row set.
//!
//! Operations run strictly in queue order. The engine is pure: input rows are
//! never touched and an error discards the whole run.

use crate::error::FrameError;
use crate::plan::{FilterOperator, Plan, PlanOperation};
use crate::types::{scalar_eq, Row};
use serde_json::Value;
use tracing::debug;

/// Apply every operation in `plan` to `rows` and return the resulting rows.
pub fn materialize(rows: &[Row], plan: &Plan) -> Result<Vec<Row>, FrameError> {
    let mut result: Vec<Row> = rows.to_vec();

    for (index, operation) in plan.iter().enumerate() {
        let before = result.len();
        result = apply(result, operation)?;
        debug!(
            step = index,
            op = operation.kind(),
            rows_in = before,
            rows_out = result.len(),
            "Applied plan operation"
        );
    }

    Ok(result)
}

fn apply(rows: Vec<Row>, operation: &PlanOperation) -> Result<Vec<Row>, FrameError> {
    match operation {
        PlanOperation::Filter {
            column,
            operator,
            value,
        } => {
            let operator = FilterOperator::parse(operator)?;
            Ok(rows
                .into_iter()
                .filter(|row| matches_filter(row, column, operator, value))
                .collect())
        }
        PlanOperation::Select { columns } => {
            Ok(rows.iter().map(|row| row.project(columns)).collect())
        }
    }
}

// A row without the column never matches.
fn matches_filter(row: &Row, column: &str, operator: FilterOperator, value: &Value) -> bool {
    match (operator, row.get(column)) {
        (FilterOperator::Eq, Some(cell)) => scalar_eq(cell, value),
        (FilterOperator::Eq, None) => false,
    }
}
