//! Pairwise cosine similarity over term vectors.
//!
//! ## Algorithm
//! The matrix is V·Vᵀ scaled by the row norms, computed sparsely:
//! 1. Build postings: for each vocabulary column, the (row, count) pairs
//!    that use it
//! 2. For each row i, walk its own columns and accumulate
//!    `count_i * count_j` into every row j found in those postings
//! 3. Divide each accumulated dot product by `‖v_i‖·‖v_j‖`
//!
//! Dot products are exact integers, so `sim[i][j] == sim[j][i]` bit for
//! bit. A zero-norm vector is similar to nothing (including itself).

use crate::vectorizer::TermVector;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Cosine similarity of two sparse vectors (0.0 if either is all zeros).
pub fn cosine(a: &TermVector, b: &TermVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let (ea, eb) = (a.entries(), b.entries());
    let mut dot: u64 = 0;

    // Both entry lists are sorted by column
    while i < ea.len() && j < eb.len() {
        match ea[i].0.cmp(&eb[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += ea[i].1 as u64 * eb[j].1 as u64;
                i += 1;
                j += 1;
            }
        }
    }

    normalize(dot, a.norm(), b.norm())
}

fn normalize(dot: u64, norm_a: f64, norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot as f64 / (norm_a * norm_b)).clamp(0.0, 1.0) as f32
}

/// Full N×N similarity matrix, row-major, in input order.
#[instrument(skip(vectors), fields(rows = vectors.len()))]
pub fn cosine_similarity_matrix(vectors: &[TermVector]) -> Vec<f32> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }

    let columns = vectors
        .iter()
        .flat_map(|v| v.entries().last().map(|&(c, _)| c as usize + 1))
        .max()
        .unwrap_or(0);

    let mut postings: Vec<Vec<(usize, u32)>> = vec![Vec::new(); columns];
    for (row, vector) in vectors.iter().enumerate() {
        for &(column, count) in vector.entries() {
            postings[column as usize].push((row, count));
        }
    }
    let norms: Vec<f64> = vectors.iter().map(TermVector::norm).collect();
    debug!("Built postings for {} columns", columns);

    let mut data = vec![0.0f32; n * n];
    data.par_chunks_mut(n).enumerate().for_each(|(i, out)| {
        if norms[i] == 0.0 {
            return;
        }
        let mut dots = vec![0u64; n];
        for &(column, count) in vectors[i].entries() {
            for &(j, other) in &postings[column as usize] {
                dots[j] += count as u64 * other as u64;
            }
        }
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = normalize(dots[j], norms[i], norms[j]);
        }
    });

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagDocument;
    use crate::vectorizer::CountVectorizer;

    fn vectors(texts: &[&str]) -> Vec<TermVector> {
        let docs: Vec<TagDocument> = texts
            .iter()
            .map(|t| crate::tags::compose_tags(&data_loader::MovieRecord {
                id: 0,
                title: String::new(),
                overview: t.to_string(),
                genres: vec![],
                keywords: vec![],
                cast: vec![],
                director: vec![],
            }))
            .collect();
        CountVectorizer::default().fit_transform(&docs).1
    }

    #[test]
    fn test_cosine_known_values() {
        let v = vectors(&["alpha beta", "alpha gamma", "delta", "alpha beta"]);
        assert!((cosine(&v[0], &v[1]) - 0.5).abs() < 1e-6);
        assert_eq!(cosine(&v[0], &v[2]), 0.0);
        assert!((cosine(&v[0], &v[3]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vectors() {
        let v = vectors(&["the and of", "alpha"]);
        assert!(v[0].is_zero());
        assert_eq!(cosine(&v[0], &v[0]), 0.0);

        let m = cosine_similarity_matrix(&v);
        assert_eq!(m, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_matrix_matches_pairwise_and_is_symmetric() {
        let v = vectors(&[
            "space marine alien planet",
            "alien planet invasion alien",
            "romance paris love",
            "love alien romance",
            "",
        ]);
        let n = v.len();
        let m = cosine_similarity_matrix(&v);
        assert_eq!(m.len(), n * n);

        for i in 0..n {
            for j in 0..n {
                let value = m[i * n + j];
                assert!(!value.is_nan());
                assert_eq!(value, m[j * n + i]);
                assert!((value - cosine(&v[i], &v[j])).abs() < 1e-6);
            }
            let diagonal = m[i * n + i];
            if v[i].is_zero() {
                assert_eq!(diagonal, 0.0);
            } else {
                assert!((diagonal - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_empty_corpus() {
        assert!(cosine_similarity_matrix(&[]).is_empty());
    }
}
