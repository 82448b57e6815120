//! Export files
//!
//! Picks the output name for an export, renders the records in the chosen
//! format and writes the file atomically. Either a complete file exists at
//! the returned path or the call fails with an export error.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::ValueEnum;
use tracing::{error, info};

use super::{csv, pdf};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::storage::write_bytes_atomic;

/// Timestamp part of generated file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated text, one line per expense
    Csv,
    /// Paginated printable report
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type handed to whatever shares the file
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
        }
    }

    /// Name used in messages ("Failed to export CSV")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Pdf => "PDF",
        }
    }

    /// Render `records` in this format
    pub fn render(
        &self,
        records: &[Expense],
        now: NaiveDateTime,
        currency: &str,
    ) -> ExpenseResult<Vec<u8>> {
        match self {
            Self::Csv => csv::expenses_to_csv(records).map(String::into_bytes),
            Self::Pdf => pdf::expenses_to_pdf(records, now.date(), currency),
        }
    }
}

/// File name for an export started at `now`, e.g. `expenses_20240115_093000.csv`
pub fn export_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!(
        "expenses_{}.{}",
        now.format(FILE_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Write `records` to `path`
pub fn export_to_path(
    path: &Path,
    format: ExportFormat,
    records: &[Expense],
    now: NaiveDateTime,
    currency: &str,
) -> ExpenseResult<()> {
    let result = format
        .render(records, now, currency)
        .and_then(|bytes| write_bytes_atomic(path, &bytes));

    match result {
        Ok(()) => {
            info!(
                format = format.label(),
                count = records.len(),
                path = %path.display(),
                "export written"
            );
            Ok(())
        }
        Err(e) => {
            error!(format = format.label(), path = %path.display(), "export failed: {}", e);
            Err(match e {
                ExpenseError::Export { .. } => e,
                other => ExpenseError::export(format.label(), other.to_string()),
            })
        }
    }
}

/// Write `records` into `dir` under a timestamped name, returning the path
pub fn export_to_dir(
    dir: &Path,
    format: ExportFormat,
    records: &[Expense],
    now: NaiveDateTime,
    currency: &str,
) -> ExpenseResult<PathBuf> {
    let path = dir.join(export_file_name(format, now));
    export_to_path(&path, format, records, now, currency)?;
    Ok(path)
}
