//! Deferred operation plan
//!
//! A plan is an append-only queue of declarative operations. Nothing is
//! validated when an operation is queued; the execution engine rejects
//! what it cannot apply.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::FrameError;

/// A queued operation over the frame's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanOperation {
    /// Keep rows where `column <operator> value` holds.
    Filter {
        column: String,
        operator: String,
        value: Value,
    },
    /// Keep only the listed columns.
    Select { columns: Vec<String> },
}

impl PlanOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            PlanOperation::Filter { .. } => "filter",
            PlanOperation::Select { .. } => "select",
        }
    }
}

impl fmt::Display for PlanOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOperation::Filter {
                column,
                operator,
                value,
            } => write!(f, "filter {} {} {}", column, operator, value),
            PlanOperation::Select { columns } => write!(f, "select {}", columns.join(", ")),
        }
    }
}

/// Filter operators the engine knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
}

impl FilterOperator {
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        match raw {
            "==" => Ok(FilterOperator::Eq),
            other => Err(FrameError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Ordered sequence of queued operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    operations: Vec<PlanOperation>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: PlanOperation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanOperation> {
        self.operations.iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanOperation;
    type IntoIter = std::slice::Iter<'a, PlanOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
