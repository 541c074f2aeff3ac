//! Lazy Frames
//!
//! A frame holds an immutable row set and a queue of deferred operations. The
//! queue can be costed at any time; it only runs once the frame's gate has been
//! unlocked, and then only as part of an export.

use crate::engine;
use crate::error::FrameError;
use crate::estimate::{self, CostEstimate};
use crate::export::{write_rows, DelimitedSink, ExportReport, ExportStatus, RowSink};
use crate::gate::{Authority, AuthorizationGate, GateState};
use crate::plan::{Plan, PlanOperation};
use crate::types::Row;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Tabular data container with a credential-gated execution engine.
pub struct Frame {
    rows: Vec<Row>,
    plan: Plan,
    gate: AuthorizationGate,
    metadata_ready: bool,
    materialized: Vec<Row>,
    authority: Arc<Authority>,
}

impl Frame {
    /// Create a locked frame over `rows`.
    pub fn new(rows: Vec<Row>, authority: Arc<Authority>) -> Self {
        Self {
            rows,
            plan: Plan::new(),
            gate: AuthorizationGate::new(),
            metadata_ready: false,
            materialized: Vec::new(),
            authority,
        }
    }

    pub fn empty(authority: Arc<Authority>) -> Self {
        Self::new(Vec::new(), authority)
    }

    /// Queue an equality-style filter. The operator is checked at execution time.
    pub fn filter_rows(
        &mut self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.plan.push(PlanOperation::Filter {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a column selection.
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plan.push(PlanOperation::Select {
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Queue an already-built operation.
    pub fn queue(&mut self, operation: PlanOperation) -> &mut Self {
        self.plan.push(operation);
        self
    }

    /// Cost of the queued plan. Available in both gate states.
    pub fn estimate(&mut self) -> CostEstimate {
        self.metadata_ready = true;
        estimate::estimate(self.rows.len(), &self.plan)
    }

    /// Attempt to unlock execution with a raw credential.
    pub async fn unlock(&mut self, token: &str) -> Result<(), FrameError> {
        let authority = Arc::clone(&self.authority);
        self.gate.unlock(&authority, token).await
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn metadata_ready(&self) -> bool {
        self.metadata_ready
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows produced by the last successful export while unlocked.
    pub fn materialized(&self) -> &[Row] {
        &self.materialized
    }

    /// Column names of the first original row.
    pub fn header(&self) -> Vec<String> {
        self.rows.first().map(Row::columns).unwrap_or_default()
    }

    /// Write the frame into `sink`.
    ///
    /// Unlocked frames run the plan and write the result under the original
    /// header, even when a select dropped some of its columns. Locked frames
    /// write the header alone.
    pub fn export<S: RowSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExportReport, FrameError> {
        let status = self.prepare()?;
        self.write_prepared(status, sink)
    }

    /// Export to a comma-separated file at `path`, replacing any existing file.
    ///
    /// The plan runs before the file is opened, so a failing plan leaves an
    /// existing file as it was.
    pub fn save_csv(&mut self, path: impl AsRef<Path>) -> Result<ExportReport, FrameError> {
        let path = path.as_ref();
        let status = self.prepare()?;
        let file = File::create(path)?;
        let mut sink = DelimitedSink::new(BufWriter::new(file));
        let report = self.write_prepared(status, &mut sink)?;
        info!(path = %path.display(), status = %report.status, rows = report.rows_written, "Export completed");
        Ok(report)
    }

    /// Run the plan when unlocked. Writes nothing.
    fn prepare(&mut self) -> Result<ExportStatus, FrameError> {
        if self.is_unlocked() {
            self.materialized = engine::materialize(&self.rows, &self.plan)?;
            Ok(ExportStatus::Success)
        } else {
            warn!(ops = self.plan.len(), "Frame is locked; exporting header only");
            Ok(ExportStatus::SafeMode)
        }
    }

    fn write_prepared<S: RowSink + ?Sized>(
        &self,
        status: ExportStatus,
        sink: &mut S,
    ) -> Result<ExportReport, FrameError> {
        let header = self.header();
        let data: &[Row] = match status {
            ExportStatus::Success => &self.materialized,
            ExportStatus::SafeMode => &[],
        };
        let rows_written = write_rows(sink, &header, data)?;

        Ok(ExportReport {
            status,
            header,
            rows_written,
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SlothFrame: {} ops | {}>", self.plan.len(), self.state())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("rows", &self.rows.len())
            .field("plan", &self.plan)
            .field("state", &self.state())
            .field("metadata_ready", &self.metadata_ready)
            .finish()
    }
}
