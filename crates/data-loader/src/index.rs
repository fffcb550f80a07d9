//! Joining the raw tables into normalized `MovieRecord`s.
//!
//! The movie table drives the output order. Every later stage (tag
//! documents, term vectors, similarity rows) is positionally aligned with
//! the `Vec<MovieRecord>` built here, so nothing downstream may reorder it.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Load both tables and build the normalized records.
///
/// Steps:
/// 1. Parse the movie and credits tables in parallel
/// 2. Join them on the movie id
/// 3. Normalize every attribute column
#[instrument(skip(config))]
pub fn load_from_files(
    movies_path: &Path,
    credits_path: &Path,
    config: &IngestConfig,
) -> Result<Vec<MovieRecord>> {
    info!("Loading TMDB tables");

    // Rayon's `join` runs both closures in parallel
    let (movies, credits) = rayon::join(
        || parser::parse_movies_table(movies_path),
        || parser::parse_credits_table(credits_path),
    );
    let movies = movies?;
    let credits = credits?;

    info!(
        "Parsed {} movie rows and {} credit rows",
        movies.len(),
        credits.len()
    );

    let records = join_tables(movies, credits, config);
    info!("Built {} movie records", records.len());
    Ok(records)
}

/// Inner-join movie rows with credit rows on the movie id.
///
/// - Output order is the movie table order.
/// - If the credits table repeats an id, its first row wins.
/// - Rows that end up without any title are dropped.
pub fn join_tables(
    movies: Vec<RawMovieRow>,
    credits: Vec<RawCreditsRow>,
    config: &IngestConfig,
) -> Vec<MovieRecord> {
    let mut credits_by_id: HashMap<MovieId, RawCreditsRow> = HashMap::with_capacity(credits.len());
    for row in credits {
        credits_by_id.entry(row.movie_id).or_insert(row);
    }

    let joined: Vec<(RawMovieRow, &RawCreditsRow)> = movies
        .into_iter()
        .filter_map(|movie| match credits_by_id.get(&movie.id) {
            Some(credit) => Some((movie, credit)),
            None => {
                debug!("No credits for movie {}, skipping", movie.id);
                None
            }
        })
        .collect();

    // Normalization is independent per row; `collect` keeps the order
    let records: Vec<Option<MovieRecord>> = joined
        .into_par_iter()
        .map(|(movie, credit)| normalize_row(movie, credit, config))
        .collect();

    let total = records.len();
    let records: Vec<MovieRecord> = records.into_iter().flatten().collect();
    if records.len() < total {
        warn!("Dropped {} movies without a title", total - records.len());
    }
    records
}

/// Turn one joined row into a `MovieRecord`, or `None` if it has no title.
fn normalize_row(
    movie: RawMovieRow,
    credit: &RawCreditsRow,
    config: &IngestConfig,
) -> Option<MovieRecord> {
    let title = pick_title(&movie)?;

    Some(MovieRecord {
        id: movie.id,
        title,
        overview: movie.overview.unwrap_or_default(),
        genres: parser::extract_names(&movie.genres),
        keywords: parser::extract_names(&movie.keywords),
        cast: parser::top_k_cast(&credit.cast, config.top_cast),
        director: parser::extract_director(&credit.crew),
    })
}

/// The display title, falling back to `original_title`
fn pick_title(movie: &RawMovieRow) -> Option<String> {
    [&movie.title, &movie.original_title]
        .into_iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Load, join and write the cleaned table in one go.
pub fn export_movies_csv(
    movies_path: &Path,
    credits_path: &Path,
    output: &Path,
    config: &IngestConfig,
) -> Result<usize> {
    let records = load_from_files(movies_path, credits_path, config)?;
    parser::write_movies_csv(&records, output)?;
    info!("Wrote {} cleaned movies to {:?}", records.len(), output);
    Ok(records.len())
}
