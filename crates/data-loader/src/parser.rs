//! Parsers for the TMDB tables and their attribute columns.
//!
//! The movie and credits tables are CSV files. Four of their columns
//! (`genres`, `keywords`, `cast`, `crew`) hold a serialized list of objects:
//!
//! ```text
//! [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]
//! [{"credit_id": "52fe...", "job": "Director", "name": "James Cameron"}]
//! ```
//!
//! Those columns go through a strict sub-schema parser. The public
//! extraction helpers fold any parse failure into an empty list so a bad
//! cell only costs that movie its tags, never the whole build.

use crate::error::{DataLoadError, Result};
use crate::types::{MovieRecord, RawCreditsRow, RawMovieRow};
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Attribute Columns
// =============================================================================

/// Crew job that marks a director entry (matched exactly, case-sensitive)
pub const DIRECTOR_JOB: &str = "Director";

/// One object of a serialized attribute list.
///
/// `name` is mandatory; `job` only exists on crew entries. Every other key
/// (`id`, `character`, `credit_id`, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

/// Why an attribute column could not be parsed
#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("attribute column is empty")]
    Empty,

    #[error("malformed attribute list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a serialized attribute list into typed entries.
///
/// This is the strict form: callers that want the "degrade to nothing"
/// behaviour use [`extract_names`], [`top_k_cast`] or [`extract_director`].
pub fn parse_attributes(raw: &str) -> std::result::Result<Vec<Attribute>, AttributeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AttributeError::Empty);
    }
    Ok(serde_json::from_str(raw)?)
}

/// Parse, logging and swallowing the error.
fn attributes_or_empty(raw: &str) -> Vec<Attribute> {
    match parse_attributes(raw) {
        Ok(attributes) => attributes,
        Err(e) => {
            debug!("Treating attribute column as empty: {}", e);
            Vec::new()
        }
    }
}

/// Names of every entry in a serialized attribute list.
///
/// Example: `[{"id": 28, "name": "Action"}]` -> `["Action"]`
///          `not a list` -> `[]`
pub fn extract_names(raw: &str) -> Vec<String> {
    attributes_or_empty(raw)
        .into_iter()
        .map(|a| a.name)
        .collect()
}

/// Names of the first `k` billed cast members, in billing order.
pub fn top_k_cast(raw: &str, k: usize) -> Vec<String> {
    attributes_or_empty(raw)
        .into_iter()
        .take(k)
        .map(|a| a.name)
        .collect()
}

/// Names of every crew entry whose job is exactly "Director".
pub fn extract_director(raw: &str) -> Vec<String> {
    attributes_or_empty(raw)
        .into_iter()
        .filter(|a| a.job.as_deref() == Some(DIRECTOR_JOB))
        .map(|a| a.name)
        .collect()
}

// =============================================================================
// CSV Tables
// =============================================================================

/// Columns the movie table must provide
const MOVIE_COLUMNS: &[&str] = &["id", "title", "overview", "genres", "keywords"];

/// Columns the credits table must provide
const CREDITS_COLUMNS: &[&str] = &["movie_id", "cast", "crew"];

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Open a CSV file and make sure its header carries `required` columns.
fn open_table(path: &Path, required: &[&str]) -> Result<csv::Reader<std::fs::File>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        }
        _ => DataLoadError::ParseError {
            file: file_label(path),
            line: 1,
            reason: e.to_string(),
        },
    })?;

    let headers = reader.headers().map_err(|e| DataLoadError::ParseError {
        file: file_label(path),
        line: 1,
        reason: format!("Unreadable header: {}", e),
    })?;

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                file: file_label(path),
                column: column.to_string(),
            });
        }
    }

    Ok(reader)
}

/// Decode every row of a table into `T`.
fn read_rows<T>(path: &Path, required: &[&str]) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = open_table(path, required)?;
    let mut rows = Vec::new();

    for result in reader.deserialize::<T>() {
        let row = result.map_err(|e| DataLoadError::ParseError {
            file: file_label(path),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse the movie metadata table.
///
/// Format: CSV with at least `id,title,overview,genres,keywords`.
pub fn parse_movies_table(path: &Path) -> Result<Vec<RawMovieRow>> {
    read_rows(path, MOVIE_COLUMNS)
}

/// Parse the credits table.
///
/// Format: CSV with at least `movie_id,cast,crew`.
pub fn parse_credits_table(path: &Path) -> Result<Vec<RawCreditsRow>> {
    read_rows(path, CREDITS_COLUMNS)
}

/// Write normalized records back out as a flat CSV.
///
/// List columns are space-joined, the same shape the cleaned `movies.csv`
/// had in the original data-preparation step.
pub fn write_movies_csv(records: &[MovieRecord], path: &Path) -> Result<()> {
    let to_write_error = |e: csv::Error| DataLoadError::WriteError {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(to_write_error)?;
    writer
        .write_record([
            "id", "title", "overview", "genres", "keywords", "cast", "director",
        ])
        .map_err(to_write_error)?;

    for record in records {
        writer
            .write_record([
                record.id.to_string().as_str(),
                record.title.as_str(),
                record.overview.as_str(),
                record.genres.join(" ").as_str(),
                record.keywords.join(" ").as_str(),
                record.cast.join(" ").as_str(),
                record.director.join(" ").as_str(),
            ])
            .map_err(to_write_error)?;
    }

    writer.flush()?;
    Ok(())
}
