//! # Index Store Crate
//!
//! Persistence for the `IndexArtifact`: the movie table `{id, title}` and the
//! N×N similarity matrix built from it. The two halves are saved and loaded
//! together and checked against each other on every load.
//!
//! ## Example Usage
//!
//! ```ignore
//! use index_store::{load, save};
//!
//! save(&artifact, Path::new("data/index"))?;
//! let artifact = load(Path::new("data/index"))?;
//! ```

pub mod error;
pub mod types;
pub mod persist;

pub use error::{IndexStoreError, Result};
pub use persist::{load, load_meta, save, IndexPaths, MetaFile, FORMAT_VERSION};
pub use types::{BuildInfo, IndexArtifact, IndexedMovie, SimilarityMatrix};
