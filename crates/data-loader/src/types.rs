//! Core domain types for the TMDB movie tables.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (MovieId)
//! - Structs with public fields
//! - serde derives so rows can be read straight out of CSV files
//! - Builder-style configuration structs

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the TMDB id shared by both tables)
pub type MovieId = u32;

// =============================================================================
// Raw Table Rows
// =============================================================================

/// One row of the movie metadata table (`tmdb_5000_movies.csv`).
///
/// Only the columns the pipeline uses are declared; serde ignores the rest.
/// Attribute columns (`genres`, `keywords`) stay as their serialized text
/// here and are normalized later by the parser.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovieRow {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub keywords: String,
}

/// One row of the credits table (`tmdb_5000_credits.csv`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawCreditsRow {
    pub movie_id: MovieId,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub crew: String,
}

// =============================================================================
// Normalized Records
// =============================================================================

/// A movie after both tables have been joined and every attribute column
/// has been reduced to a flat list of names.
///
/// Records are immutable once built; their order is the order of the
/// movie table and every downstream structure is aligned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Plot overview; an empty string when the source row had none
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Top-billed cast, truncated at ingestion
    pub cast: Vec<String>,
    /// Usually zero or one entry
    pub director: Vec<String>,
}

// =============================================================================
// Configuration
// =============================================================================

/// Default number of billed cast members kept per movie
pub const DEFAULT_TOP_CAST: usize = 3;

/// Settings for turning the raw tables into `MovieRecord`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// How many billed cast members to keep per movie
    pub top_cast: usize,
}

impl IngestConfig {
    pub fn new() -> Self {
        Self {
            top_cast: DEFAULT_TOP_CAST,
        }
    }

    /// Configure how many cast members are kept (default: 3)
    pub fn with_top_cast(mut self, top_cast: usize) -> Self {
        self.top_cast = top_cast;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new()
    }
}
