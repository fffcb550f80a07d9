use data_loader::{IngestConfig, load_from_files};
use std::path::Path;
use std::time::Instant;

fn main() {
    let movies = Path::new("data/tmdb_5000_movies.csv");
    let credits = Path::new("data/tmdb_5000_credits.csv");

    println!("Loading TMDB tables...\n");

    let start = Instant::now();
    let records = load_from_files(movies, credits, &IngestConfig::default())
        .expect("Failed to load tables");
    let elapsed = start.elapsed();

    let without_overview = records.iter().filter(|r| r.overview.is_empty()).count();
    let without_director = records.iter().filter(|r| r.director.is_empty()).count();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", records.len());
    println!("Without overview: {}", without_overview);
    println!("Without director: {}", without_director);
    println!("\nPerformance: {:.0} movies/second",
             records.len() as f64 / elapsed.as_secs_f64());
}
