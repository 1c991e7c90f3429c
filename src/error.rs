use std::io;

use thiserror::Error;

/// Data-format and I/O failures while reading or writing sales tables.
///
/// Any of these aborts the run; no partial table is produced.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },
    #[error("invalid date '{value}' at line {line} (expected YYYY-MM-DD)")]
    InvalidDate { line: u64, value: String },
    #[error("malformed record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
