//! Metadata estimator: plan cost without execution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::Plan;

/// Cost weight applied per queued operation.
pub const COMPLEXITY_PER_OPERATION: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateStatus {
    /// The plan has been inspected and is queued for execution.
    PlanValidated,
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateStatus::PlanValidated => f.write_str("Plan Validated - Ready for Execution"),
        }
    }
}

/// Cost report for a frame's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub estimated_rows: usize,
    pub complexity: f64,
    pub status: EstimateStatus,
}

/// Estimate the cost of running `plan` over `row_count` rows.
///
/// Reads only counts: never row contents, never gate state.
pub fn estimate(row_count: usize, plan: &Plan) -> CostEstimate {
    CostEstimate {
        estimated_rows: row_count,
        complexity: plan.len() as f64 * COMPLEXITY_PER_OPERATION,
        status: EstimateStatus::PlanValidated,
    }
}
