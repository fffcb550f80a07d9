//! # Data Loader Crate
//!
//! This crate reads the TMDB movie and credits tables and turns them into
//! normalized `MovieRecord`s.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, raw table rows, IngestConfig)
//! - **parser**: CSV table parsing and attribute-list normalization
//! - **index**: Joining the two tables into ordered records
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_from_files, IngestConfig};
//! use std::path::Path;
//!
//! let records = load_from_files(
//!     Path::new("data/tmdb_5000_movies.csv"),
//!     Path::new("data/tmdb_5000_credits.csv"),
//!     &IngestConfig::default(),
//! )?;
//!
//! println!("Loaded {} movies", records.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{export_movies_csv, join_tables, load_from_files};
pub use parser::{extract_director, extract_names, top_k_cast};
pub use types::{
    DEFAULT_TOP_CAST,
    IngestConfig,
    MovieId,
    MovieRecord,
    RawCreditsRow,
    RawMovieRow,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_config_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.top_cast, DEFAULT_TOP_CAST);
        assert_eq!(config.with_top_cast(5).top_cast, 5);
    }

    #[test]
    fn test_record_serde() {
        let record = MovieRecord {
            id: 1,
            title: "Toy Story".to_string(),
            overview: String::new(),
            genres: vec!["Animation".to_string()],
            keywords: vec![],
            cast: vec!["Tom Hanks".to_string()],
            director: vec!["John Lasseter".to_string()],
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: MovieRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
