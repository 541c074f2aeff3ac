//! CLI route: single route table and run context. Dispatches to the frame and presentation.

use crate::cli::command_name;
use crate::cli::map_error;
use crate::cli::parse::{Commands, QueryArgs};
use crate::cli::presentation::{format_estimate, format_export_summary, format_plan};
use crate::config::{ConfigLoader, SlothConfig};
use crate::error::FrameError;
use crate::frame::Frame;
use crate::gate::Authority;
use crate::plan::PlanOperation;
use crate::types::Row;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Environment variable consulted when `export` is run without `--token`.
pub const TOKEN_ENV: &str = "SLOTHFRAME_TOKEN";

/// Operators recognised when splitting a `--filter` argument. Only `==` is
/// executable; the rest are queued and rejected by the engine.
const FILTER_OPERATORS: [&str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

/// Runtime context for CLI execution: loaded config and the shared authority.
pub struct RunContext {
    config: SlothConfig,
    authority: Arc<Authority>,
}

impl RunContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, FrameError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::with_config(config)
    }

    pub fn with_config(config: SlothConfig) -> Result<Self, FrameError> {
        let authority = Arc::new(Authority::from_config(&config)?);
        Ok(Self { config, authority })
    }

    pub fn with_authority(config: SlothConfig, authority: Arc<Authority>) -> Self {
        Self { config, authority }
    }

    pub fn config(&self) -> &SlothConfig {
        &self.config
    }

    /// Execute a command and return the text to print.
    pub async fn execute(&self, command: &Commands) -> Result<String, FrameError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Estimate { query, format } => {
                let mut frame = self.build_frame(query)?;
                format_estimate(&frame.estimate(), format)
            }
            Commands::Plan { query, format } => {
                let frame = self.build_frame(query)?;
                format_plan(frame.plan(), format)
            }
            Commands::Export {
                query,
                output,
                token,
            } => {
                let mut frame = self.build_frame(query)?;
                let token = token.clone().or_else(|| std::env::var(TOKEN_ENV).ok());
                match token {
                    Some(token) => {
                        // A refused unlock still exports, in safe mode.
                        if let Err(e) = frame.unlock(&token).await {
                            if !e.is_authorization_failure() {
                                return Err(e);
                            }
                            error!(error = %map_error(&e), "Unlock failed; exporting in safe mode");
                        }
                    }
                    None => warn!("No token supplied; exporting in safe mode"),
                }
                let report = frame.save_csv(output)?;
                Ok(format_export_summary(&report, &output.display().to_string()))
            }
        }
    }

    fn build_frame(&self, query: &QueryArgs) -> Result<Frame, FrameError> {
        let rows = load_rows(&query.input)?;
        let mut frame = Frame::new(rows, Arc::clone(&self.authority));

        let filters = query
            .filters
            .iter()
            .map(|spec| parse_filter(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let select = query.select.as_deref().map(parse_select);

        if query.select_first {
            if let Some(select) = select.clone() {
                frame.queue(select);
            }
        }
        for filter in filters {
            frame.queue(filter);
        }
        if !query.select_first {
            if let Some(select) = select {
                frame.queue(select);
            }
        }

        Ok(frame)
    }
}

/// Read a JSON array of row objects.
pub fn load_rows(path: &Path) -> Result<Vec<Row>, FrameError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        FrameError::InvalidInput(format!(
            "{}: expected a JSON array of objects ({})",
            path.display(),
            e
        ))
    })
}

/// Parse `COLUMN<op>VALUE`. VALUE is read as JSON when it parses, else as a plain string.
pub fn parse_filter(spec: &str) -> Result<PlanOperation, FrameError> {
    let (index, operator) = FILTER_OPERATORS
        .iter()
        .filter_map(|op| spec.find(op).map(|i| (i, *op)))
        .min_by_key(|(i, op)| (*i, std::cmp::Reverse(op.len())))
        .ok_or_else(|| {
            FrameError::InvalidInput(format!("filter '{}' has no operator", spec))
        })?;

    let column = spec[..index].trim();
    if column.is_empty() {
        return Err(FrameError::InvalidInput(format!(
            "filter '{}' has no column",
            spec
        )));
    }
    let raw_value = spec[index + operator.len()..].trim();
    let value = serde_json::from_str::<Value>(raw_value)
        .unwrap_or_else(|_| Value::String(raw_value.to_string()));

    Ok(PlanOperation::Filter {
        column: column.to_string(),
        operator: operator.to_string(),
        value,
    })
}

pub fn parse_select(spec: &str) -> PlanOperation {
    PlanOperation::Select {
        columns: spec
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
