//! Result export.
//!
//! Comparison results can be written as a CSV matrix (term rows, file
//! columns, `Found` / `Not Found` cells) or as a JSON report that also
//! carries every match with its line context.

mod csv;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

pub use csv::{to_csv_string, write_csv};

use crate::models::ComparisonResult;

/// Default CSV file name.
pub const DEFAULT_CSV_FILENAME: &str = "lexicompare_results.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export format. The file name never changes the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Write the JSON report of a result.
pub fn write_json<W: Write>(result: &ComparisonResult, mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, &result.to_report())?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write a result to a file in the given format.
pub fn export_to_path(
    result: &ComparisonResult,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let out = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(result, out)?,
        ExportFormat::Json => write_json(result, out)?,
    }
    tracing::info!("Exported {} terms to {}", result.terms().len(), path.display());
    Ok(())
}
