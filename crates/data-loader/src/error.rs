//! Error types for the data-loader crate.
//!
//! Only structural problems with the input tables are errors. A malformed
//! attribute column (genres, keywords, cast, crew) is never an error: the
//! parser degrades it to an empty list.

use thiserror::Error;

/// Errors that can occur while reading and joining the raw tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A row in a table couldn't be decoded
    ///
    /// `line` is the 1-based line number reported by the CSV reader.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// The table header lacks a column the pipeline needs
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Writing the cleaned table failed
    #[error("Failed to write {path}: {reason}")]
    WriteError { path: String, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
