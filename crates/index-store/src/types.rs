//! The queryable artifact: the movie table and its similarity matrix.

use crate::error::{IndexStoreError, Result};
use data_loader::MovieId;
use serde::{Deserialize, Serialize};

/// One row of the persisted movie table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedMovie {
    pub id: MovieId,
    pub title: String,
}

/// Dense, row-major N×N cosine similarity matrix.
///
/// Row and column `i` both refer to row `i` of the movie table.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Wrap row-major data, checking it is exactly `dimension²` long.
    pub fn new(dimension: usize, data: Vec<f32>) -> Result<Self> {
        if dimension.checked_mul(dimension) != Some(data.len()) {
            return Err(IndexStoreError::MalformedMatrix {
                dimension,
                len: data.len(),
            });
        }
        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Similarities of movie `i` against every movie, in table order.
    ///
    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dimension;
        &self.data[start..start + self.dimension]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.dimension && j < self.dimension {
            Some(self.data[i * self.dimension + j])
        } else {
            None
        }
    }

    /// Raw row-major values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Parameters recorded alongside an artifact for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Number of terms actually in the vocabulary
    pub vocabulary_size: usize,
    /// Vocabulary cap the build was run with
    pub max_features: usize,
    /// Cast members kept per movie at ingestion
    pub top_cast: usize,
}

/// The matched (movie table, similarity matrix) pair served at query time.
///
/// The two halves are only meaningful together, so the constructor refuses
/// a pair whose sizes disagree and nothing can mutate either half later.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexArtifact {
    movies: Vec<IndexedMovie>,
    similarity: SimilarityMatrix,
    info: BuildInfo,
}

impl IndexArtifact {
    pub fn new(
        movies: Vec<IndexedMovie>,
        similarity: SimilarityMatrix,
        info: BuildInfo,
    ) -> Result<Self> {
        if movies.len() != similarity.dimension() {
            return Err(IndexStoreError::DimensionMismatch {
                movies: movies.len(),
                dimension: similarity.dimension(),
            });
        }
        Ok(Self {
            movies,
            similarity,
            info,
        })
    }

    pub fn movies(&self) -> &[IndexedMovie] {
        &self.movies
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn info(&self) -> &BuildInfo {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(n: usize) -> Vec<IndexedMovie> {
        (0..n)
            .map(|i| IndexedMovie {
                id: i as MovieId,
                title: format!("Movie {}", i),
            })
            .collect()
    }

    #[test]
    fn test_matrix_rejects_wrong_length() {
        assert!(SimilarityMatrix::new(2, vec![1.0, 0.0, 0.0, 1.0]).is_ok());
        assert!(matches!(
            SimilarityMatrix::new(2, vec![1.0, 0.0, 0.0]),
            Err(IndexStoreError::MalformedMatrix { dimension: 2, len: 3 })
        ));
    }

    #[test]
    fn test_matrix_rows() {
        let m = SimilarityMatrix::new(2, vec![1.0, 0.25, 0.25, 1.0]).unwrap();
        assert_eq!(m.row(1), &[0.25, 1.0]);
        assert_eq!(m.get(0, 1), Some(0.25));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_artifact_requires_matching_dimension() {
        let matrix = SimilarityMatrix::new(99, vec![0.0; 99 * 99]).unwrap();
        let err = IndexArtifact::new(movies(100), matrix, BuildInfo::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexStoreError::DimensionMismatch { movies: 100, dimension: 99 }
        ));
    }

    #[test]
    fn test_empty_artifact() {
        let matrix = SimilarityMatrix::new(0, Vec::new()).unwrap();
        let artifact = IndexArtifact::new(Vec::new(), matrix, BuildInfo::default()).unwrap();
        assert!(artifact.is_empty());
    }
}
