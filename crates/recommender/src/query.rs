//! # Recommender Query
//!
//! Answers "movies similar to this title" from a loaded `IndexArtifact`:
//! 1. Resolve the title to a row (trimmed, case-insensitive, first match)
//! 2. Read that row of the similarity matrix
//! 3. Rank every other movie by similarity, ties in table order
//! 4. Return the top N
//!
//! The artifact is passed in explicitly and never mutated, so one
//! `Recommender` can be cloned across threads and shared by concurrent
//! queries.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use index_store::IndexArtifact;

use crate::types::{Recommendations, ScoredMovie};

/// Read-only query handle over a loaded index.
#[derive(Debug, Clone)]
pub struct Recommender {
    artifact: Arc<IndexArtifact>,
}

impl Recommender {
    pub fn new(artifact: Arc<IndexArtifact>) -> Self {
        Self { artifact }
    }

    /// Load the index stored in `dir` and wrap it.
    pub fn open(dir: &Path) -> Result<Self> {
        let artifact = index_store::load(dir)
            .with_context(|| format!("Failed to load index from {}", dir.display()))?;
        info!("Loaded index with {} movies", artifact.len());
        Ok(Self::new(Arc::new(artifact)))
    }

    pub fn artifact(&self) -> &IndexArtifact {
        &self.artifact
    }

    /// Number of movies in the index
    pub fn len(&self) -> usize {
        self.artifact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifact.is_empty()
    }

    /// Row index of `title`, or `None` if no movie carries it.
    ///
    /// Matching is exact after trimming and ignoring case. With duplicate
    /// titles the first row in table order wins.
    pub fn find_index(&self, title: &str) -> Option<usize> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.artifact
            .movies()
            .iter()
            .position(|m| m.title.to_lowercase() == wanted)
    }

    /// Up to `n` movies most similar to `title`.
    ///
    /// An unknown title yields empty lists rather than an error.
    pub fn recommend(&self, title: &str, n: usize) -> Recommendations {
        self.scored_recommendations(title, n).into()
    }

    /// Like [`recommend`](Self::recommend), keeping the similarity scores.
    #[instrument(skip(self))]
    pub fn scored_recommendations(&self, title: &str, n: usize) -> Vec<ScoredMovie> {
        let Some(query) = self.find_index(title) else {
            debug!("No movie titled {:?}", title);
            return Vec::new();
        };

        let row = self.artifact.similarity().row(query);
        let mut ranked: Vec<usize> = (0..row.len()).collect();
        // Stable: equal scores keep table order
        ranked.sort_by(|&a, &b| row[b].total_cmp(&row[a]));

        let movies = self.artifact.movies();
        let results: Vec<ScoredMovie> = ranked
            .into_iter()
            .filter(|&j| j != query)
            .take(n)
            .map(|j| ScoredMovie {
                id: movies[j].id,
                title: movies[j].title.clone(),
                score: row[j],
            })
            .collect();

        debug!(
            "Ranked {} neighbours of {:?}, returning {}",
            row.len().saturating_sub(1),
            movies[query].title,
            results.len()
        );
        results
    }

    /// Titles containing `query` (case-insensitive), exact matches first,
    /// then table order. At most `limit` results.
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(bool, &str)> = self
            .artifact
            .movies()
            .iter()
            .filter_map(|m| {
                let lowered = m.title.to_lowercase();
                lowered
                    .contains(&needle)
                    .then(|| (lowered != needle, m.title.as_str()))
            })
            .collect();
        hits.sort_by_key(|&(inexact, _)| inexact);

        hits.into_iter()
            .take(limit)
            .map(|(_, title)| title.to_string())
            .collect()
    }
}
