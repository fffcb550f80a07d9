//! Bag-of-words vectorization of tag documents.
//!
//! ## Algorithm
//! 1. Tokenize every document: runs of two or more word characters,
//!    lowercased, English stop words removed
//! 2. Count each term across the whole corpus
//! 3. Keep the `max_features` most frequent terms (ties: lexicographic)
//! 4. Assign columns to the kept terms in lexicographic order
//! 5. Encode each document as raw term counts over those columns
//!
//! Every step is deterministic, so the same corpus and `max_features`
//! always produce the same vocabulary and vectors.

use crate::stopwords::is_stop_word;
use crate::tags::TagDocument;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").expect("valid regex");
}

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Split text into lowercase terms, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Frozen term → column mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    /// Terms in column order
    terms: Vec<String>,
    columns: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build from an arbitrary set of terms; columns follow sorted order.
    fn from_terms(mut terms: Vec<String>) -> Self {
        terms.sort();
        terms.dedup();
        let columns = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self { terms, columns }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<u32> {
        self.columns.get(term).copied()
    }

    pub fn term(&self, column: u32) -> Option<&str> {
        self.terms.get(column as usize).map(String::as_str)
    }

    /// All terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse term-count vector: `(column, count)` pairs sorted by column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermVector {
    entries: Vec<(u32, u32)>,
}

impl TermVector {
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    /// Count for one column (0 when absent)
    pub fn count(&self, column: u32) -> u32 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Sum of squared counts
    pub fn squared_norm(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64 * c as u64).sum()
    }

    pub fn norm(&self) -> f64 {
        (self.squared_norm() as f64).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand into a dense vector of `len` counts.
    pub fn to_dense(&self, len: usize) -> Vec<u32> {
        let mut dense = vec![0; len];
        for &(column, count) in &self.entries {
            if let Some(slot) = dense.get_mut(column as usize) {
                *slot = count;
            }
        }
        dense
    }
}

/// Count vectorizer with a capped, frequency-ranked vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct CountVectorizer {
    max_features: usize,
}

impl CountVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Build the vocabulary from a corpus.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub fn fit(&self, documents: &[TagDocument]) -> Vocabulary {
        // Per-document counts merge by addition, so reduce order is irrelevant
        let totals: HashMap<String, u64> = documents
            .par_iter()
            .fold(HashMap::new, |mut local: HashMap<String, u64>, doc| {
                for token in tokenize(doc.as_str()) {
                    *local.entry(token).or_insert(0) += 1;
                }
                local
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (term, count) in local {
                    *acc.entry(term).or_insert(0) += count;
                }
                acc
            });

        let mut ranked: Vec<(String, u64)> = totals.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        debug!(
            "Corpus has {} distinct terms, keeping at most {}",
            ranked.len(),
            self.max_features
        );
        ranked.truncate(self.max_features);

        Vocabulary::from_terms(ranked.into_iter().map(|(term, _)| term).collect())
    }

    /// Encode one document against a frozen vocabulary.
    ///
    /// Terms outside the vocabulary are ignored.
    pub fn encode(&self, vocabulary: &Vocabulary, document: &TagDocument) -> TermVector {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for token in tokenize(document.as_str()) {
            if let Some(column) = vocabulary.column(&token) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }
        TermVector {
            entries: counts.into_iter().collect(),
        }
    }

    /// Encode a corpus, preserving document order.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn transform(&self, vocabulary: &Vocabulary, documents: &[TagDocument]) -> Vec<TermVector> {
        documents
            .par_iter()
            .map(|doc| self.encode(vocabulary, doc))
            .collect()
    }

    pub fn fit_transform(&self, documents: &[TagDocument]) -> (Vocabulary, Vec<TermVector>) {
        let vocabulary = self.fit(documents);
        let vectors = self.transform(&vocabulary, documents);
        (vocabulary, vectors)
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::compose_tags;
    use data_loader::MovieRecord;

    fn doc(text: &str) -> TagDocument {
        compose_tags(&MovieRecord {
            id: 0,
            title: String::new(),
            overview: text.to_string(),
            genres: vec![],
            keywords: vec![],
            cast: vec![],
            director: vec![],
        })
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("The Dark Knight, and a bat-man: X 2nd"),
            vec!["dark", "knight", "bat", "man", "2nd"]
        );
        assert!(tokenize("the and of a").is_empty());
    }

    #[test]
    fn test_vocabulary_ranked_then_sorted() {
        let docs = vec![doc("zebra zebra zebra apple"), doc("mango apple zebra"), doc("kiwi")];

        let vocab = CountVectorizer::new(2).fit(&docs);
        // zebra (4) and apple (2) survive; columns are alphabetical
        assert_eq!(vocab.terms(), &["apple".to_string(), "zebra".to_string()]);
        assert_eq!(vocab.column("apple"), Some(0));
        assert_eq!(vocab.column("mango"), None);
        assert_eq!(vocab.term(1), Some("zebra"));
        assert_eq!(vocab.term(2), None);
    }

    #[test]
    fn test_frequency_ties_break_lexicographically() {
        let docs = vec![doc("delta charlie bravo alpha")];
        let vocab = CountVectorizer::new(2).fit(&docs);
        assert_eq!(vocab.terms(), &["alpha".to_string(), "bravo".to_string()]);
    }

    #[test]
    fn test_encode_counts_and_ignores_unknown() {
        let docs = vec![doc("space war space"), doc("war")];
        let vectorizer = CountVectorizer::default();
        let (vocab, vectors) = vectorizer.fit_transform(&docs);

        let space = vocab.column("space").unwrap();
        let war = vocab.column("war").unwrap();
        assert_eq!(vectors[0].count(space), 2);
        assert_eq!(vectors[0].count(war), 1);
        assert_eq!(vectors[1].count(space), 0);

        let unseen = vectorizer.encode(&vocab, &doc("pirates"));
        assert!(unseen.is_zero());
        assert_eq!(unseen.norm(), 0.0);
    }

    #[test]
    fn test_to_dense() {
        let docs = vec![doc("beta alpha alpha")];
        let (vocab, vectors) = CountVectorizer::default().fit_transform(&docs);
        assert_eq!(vectors[0].to_dense(vocab.len()), vec![2, 1]);
        assert_eq!(vectors[0].squared_norm(), 5);
    }

    #[test]
    fn test_deterministic() {
        let docs: Vec<TagDocument> = (0..50)
            .map(|i| doc(&format!("term{} shared common word{} extra{}", i % 7, i % 3, i)))
            .collect();
        let vectorizer = CountVectorizer::new(10);

        let first = vectorizer.fit_transform(&docs);
        let second = vectorizer.fit_transform(&docs);
        assert_eq!(first, second);
        assert_eq!(first.0.len(), 10);
    }
}
