use data_loader::MovieId;

/// Default number of recommendations per query
pub const DEFAULT_RECOMMENDATIONS: usize = 20;

/// Result of a recommendation query: parallel title and id lists,
/// most similar first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations {
    pub titles: Vec<String>,
    pub ids: Vec<MovieId>,
}

impl Recommendations {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl From<Vec<ScoredMovie>> for Recommendations {
    fn from(scored: Vec<ScoredMovie>) -> Self {
        let (ids, titles) = scored.into_iter().map(|m| (m.id, m.title)).unzip();
        Self { titles, ids }
    }
}

/// A recommended movie with its similarity to the query title.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub id: MovieId,
    pub title: String,
    pub score: f32,
}
