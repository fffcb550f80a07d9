//! Offline build: records → tags → vectors → similarity → artifact.

use crate::similarity::cosine_similarity_matrix;
use crate::tags::compose_corpus;
use crate::vectorizer::{CountVectorizer, DEFAULT_MAX_FEATURES, TermVector, Vocabulary};
use anyhow::{Context, Result};
use data_loader::{IngestConfig, MovieRecord};
use index_store::{BuildInfo, IndexArtifact, IndexedMovie, SimilarityMatrix};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

/// Parameters for one index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Vocabulary cap
    pub max_features: usize,
    pub ingest: IngestConfig,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            ingest: IngestConfig::default(),
        }
    }

    /// Configure the vocabulary size cap (default: 5000)
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Configure how many cast members are kept per movie (default: 3)
    pub fn with_top_cast(mut self, top_cast: usize) -> Self {
        self.ingest = self.ingest.with_top_cast(top_cast);
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a build produces.
///
/// Only `artifact` is persisted; the vocabulary and vectors are kept for
/// inspection and tests.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifact: IndexArtifact,
    pub vocabulary: Vocabulary,
    pub vectors: Vec<TermVector>,
}

/// Build the similarity index for an ordered set of records.
///
/// Row `i` of the resulting artifact is `records[i]`.
#[instrument(skip(records, config), fields(records = records.len()))]
pub fn build_index(records: &[MovieRecord], config: &BuildConfig) -> Result<BuildOutput> {
    let start = Instant::now();

    let documents = compose_corpus(records);

    let vectorizer = CountVectorizer::new(config.max_features);
    let (vocabulary, vectors) = vectorizer.fit_transform(&documents);
    info!(
        "Vectorized {} documents over {} terms",
        vectors.len(),
        vocabulary.len()
    );

    let data = cosine_similarity_matrix(&vectors);
    let similarity = SimilarityMatrix::new(records.len(), data)
        .context("Similarity matrix has the wrong shape")?;

    let movies = records
        .iter()
        .map(|r| IndexedMovie {
            id: r.id,
            title: r.title.clone(),
        })
        .collect();
    let info = BuildInfo {
        vocabulary_size: vocabulary.len(),
        max_features: config.max_features,
        top_cast: config.ingest.top_cast,
    };
    let artifact = IndexArtifact::new(movies, similarity, info)
        .context("Movie table and similarity matrix disagree")?;

    info!(
        "Built index for {} movies in {:.2?}",
        artifact.len(),
        start.elapsed()
    );

    Ok(BuildOutput {
        artifact,
        vocabulary,
        vectors,
    })
}

/// Load both raw tables and build the index from them.
pub fn build_from_files(
    movies_path: &Path,
    credits_path: &Path,
    config: &BuildConfig,
) -> Result<BuildOutput> {
    let records = data_loader::load_from_files(movies_path, credits_path, &config.ingest)
        .context("Failed to load TMDB tables")?;
    build_index(&records, config)
}
