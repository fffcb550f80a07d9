//! Tag composition: one lowercase text blob per movie.

use data_loader::MovieRecord;
use rayon::prelude::*;

/// The composite, lowercase text a movie is vectorized from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDocument(String);

impl TagDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Build the tag document for one movie.
///
/// `overview genres keywords cast director`, space separated, lowercased.
/// Multi-word names are not glued together, so "Sam Worthington"
/// contributes the terms "sam" and "worthington".
pub fn compose_tags(record: &MovieRecord) -> TagDocument {
    let text = format!(
        "{} {} {} {} {}",
        record.overview,
        record.genres.join(" "),
        record.keywords.join(" "),
        record.cast.join(" "),
        record.director.join(" "),
    );
    TagDocument(text.to_lowercase())
}

/// Tag documents for a whole corpus, in record order.
pub fn compose_corpus(records: &[MovieRecord]) -> Vec<TagDocument> {
    records.par_iter().map(compose_tags).collect()
}
