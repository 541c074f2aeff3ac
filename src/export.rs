//! Export sinks: row-oriented delimited text output.

use crate::error::FrameError;
use crate::types::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Write;

/// How an export run was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportStatus {
    /// Gate unlocked; the plan ran and data rows were written.
    Success,
    /// Gate locked; only the header was written.
    SafeMode,
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::Success => f.write_str("Success"),
            ExportStatus::SafeMode => f.write_str("SafeMode (Metadata Only)"),
        }
    }
}

/// Summary of an export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub status: ExportStatus,
    pub header: Vec<String>,
    pub rows_written: usize,
}

impl ExportReport {
    /// Human-readable completion line for a named target.
    pub fn summary(&self, target: &str) -> String {
        format!("Export completed: {} [{}]", target, self.status)
    }
}

/// Destination for exported rows.
pub trait RowSink {
    fn write_header(&mut self, header: &[String]) -> Result<(), FrameError>;

    /// Write one row laid out against `header`. Columns missing from the row are empty.
    fn write_row(&mut self, header: &[String], row: &Row) -> Result<(), FrameError>;

    fn finish(&mut self) -> Result<(), FrameError> {
        Ok(())
    }
}

/// Write `header` and then `rows` into `sink`.
///
/// An empty header means the frame had no rows; nothing is written at all.
pub fn write_rows<S: RowSink + ?Sized>(
    sink: &mut S,
    header: &[String],
    rows: &[Row],
) -> Result<usize, FrameError> {
    if header.is_empty() {
        sink.finish()?;
        return Ok(0);
    }

    sink.write_header(header)?;
    for row in rows {
        sink.write_row(header, row)?;
    }
    sink.finish()?;
    Ok(rows.len())
}

/// Delimited text sink (comma-separated by default) over any writer.
pub struct DelimitedSink<W: Write> {
    writer: W,
    delimiter: char,
}

impl<W: Write> DelimitedSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<'a, I>(&mut self, fields: I) -> Result<(), FrameError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let line = fields
            .into_iter()
            .map(|field| quote_field(field, self.delimiter))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string());
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        Ok(())
    }
}

impl<W: Write> RowSink for DelimitedSink<W> {
    fn write_header(&mut self, header: &[String]) -> Result<(), FrameError> {
        self.write_record(header.iter().map(String::as_str))
    }

    fn write_row(&mut self, header: &[String], row: &Row) -> Result<(), FrameError> {
        let cells: Vec<String> = header
            .iter()
            .map(|column| row.get(column).map(format_cell).unwrap_or_default())
            .collect();
        self.write_record(cells.iter().map(String::as_str))
    }

    fn finish(&mut self) -> Result<(), FrameError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Render a scalar as a text cell. Null is empty; strings are written unquoted.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
