//! Error types for the index-store crate.
//!
//! Every variant is fatal for the query path: a caller that gets one of
//! these back from `load` must not serve recommendations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexStoreError {
    /// One of the artifact files does not exist
    #[error("Missing artifact file: {path}")]
    Missing { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file exists but could not be decoded (truncated, garbage, ...)
    #[error("Corrupt artifact file {file}: {reason}")]
    Corrupt { file: String, reason: String },

    #[error("Unsupported artifact version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The files come from different builds
    #[error("Artifact files belong to different builds (meta {meta:#x}, movies {movies:#x}, matrix {matrix:#x})")]
    BuildMismatch { meta: u64, movies: u64, matrix: u64 },

    /// Movie table rows and matrix dimension disagree
    #[error("Movie table has {movies} rows but similarity matrix is {dimension}x{dimension}")]
    DimensionMismatch { movies: usize, dimension: usize },

    /// Matrix data is not dimension² long
    #[error("Similarity matrix of dimension {dimension} holds {len} values")]
    MalformedMatrix { dimension: usize, len: usize },

    /// `meta.json` disagrees with the blobs it describes
    #[error("Metadata says {field} = {expected}, artifact has {actual}")]
    MetaMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, IndexStoreError>;
