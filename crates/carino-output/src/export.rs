//! Export functionality for smoothed returns tables.
//!
//! CSV keeps the table wide, exactly as it flows out of the engine: a
//! `FACTOR` column, the original period columns in order, then the appended
//! smoothing columns. JSON flattens the same table into one record per
//! cell so downstream consumers do not have to parse positional columns.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use carino_data::ReturnsTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Json => f.write_str("json"),
            Self::PrettyJson => f.write_str("pretty-json"),
        }
    }
}

/// One table cell in flat form, for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellRecord {
    /// Factor (row) the cell belongs to.
    pub factor: String,

    /// Column label: an ISO period date or an appended bucket label.
    pub column: String,

    /// Cell value; `null` for undefined/missing cells.
    pub value: Option<f64>,
}

/// Flatten a table into one record per cell, row-major, original period
/// columns before appended smoothing columns.
pub fn to_records(table: &ReturnsTable) -> Vec<CellRecord> {
    let mut records = Vec::with_capacity(
        table.n_rows() * (table.n_periods() + table.smoothed_columns().len()),
    );
    for (row_index, factor) in table.factors().iter().enumerate() {
        let row = table.row(row_index);
        for (period, value) in table.periods().iter().zip(row) {
            records.push(CellRecord {
                factor: factor.clone(),
                column: period.to_string(),
                value: *value,
            });
        }
        for column in table.smoothed_columns() {
            records.push(CellRecord {
                factor: factor.clone(),
                column: column.label.clone(),
                value: column.values[row_index],
            });
        }
    }
    records
}

/// Render the table as wide CSV. Missing cells render as empty fields.
pub fn to_csv_string(table: &ReturnsTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_table(&mut writer, table)?;
    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Write the table as wide CSV to `path`.
pub fn write_csv(table: &ReturnsTable, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_table(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut csv::Writer<W>, table: &ReturnsTable) -> Result<()> {
    let mut header = Vec::with_capacity(1 + table.n_periods() + table.smoothed_columns().len());
    header.push("FACTOR".to_string());
    header.extend(table.periods().iter().map(ToString::to_string));
    header.extend(table.smoothed_columns().iter().map(|c| c.label.clone()));
    writer.write_record(&header)?;

    for (row_index, factor) in table.factors().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(factor.clone());
        record.extend(table.row(row_index).iter().map(format_cell));
        record.extend(
            table
                .smoothed_columns()
                .iter()
                .map(|c| format_cell(&c.values[row_index])),
        );
        writer.write_record(&record)?;
    }
    Ok(())
}

fn format_cell(value: &Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render the table as JSON cell records.
pub fn to_json_string(table: &ReturnsTable, pretty: bool) -> Result<String> {
    let records = to_records(table);
    let json = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    Ok(json)
}

/// Write the table to `path` in the requested format.
pub fn export(table: &ReturnsTable, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(table, path),
        ExportFormat::Json | ExportFormat::PrettyJson => {
            let json = to_json_string(table, format == ExportFormat::PrettyJson)?;
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
            Ok(())
        }
    }
}
