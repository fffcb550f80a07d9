//! Offline feature engineering and similarity computation.
//!
//! This crate provides:
//! - Tag composition: one lowercase text document per movie
//! - CountVectorizer: frequency-capped vocabulary and term-count vectors
//! - Cosine similarity over all pairs of vectors
//! - `build_index`: the whole chain, producing an `IndexArtifact`
//!
//! ## Architecture
//! The pipeline processes records in stages:
//! 1. Records are turned into tag documents
//! 2. The vectorizer fits a vocabulary and encodes every document
//! 3. The similarity engine computes the N×N cosine matrix
//! 4. The matrix and the {id, title} table become the artifact
//!
//! Every stage preserves record order.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{build_from_files, BuildConfig};
//!
//! let output = build_from_files(movies, credits, &BuildConfig::default())?;
//! index_store::save(&output.artifact, Path::new("data/index"))?;
//! ```

pub mod builder;
pub mod similarity;
pub mod stopwords;
pub mod tags;
pub mod vectorizer;

// Re-export main types
pub use builder::{build_from_files, build_index, BuildConfig, BuildOutput};
pub use similarity::{cosine, cosine_similarity_matrix};
pub use tags::{compose_corpus, compose_tags, TagDocument};
pub use vectorizer::{tokenize, CountVectorizer, TermVector, Vocabulary, DEFAULT_MAX_FEATURES};
