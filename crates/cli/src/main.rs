use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::IngestConfig;
use pipeline::BuildConfig;
use recommender::{Recommender, ScoredMovie, DEFAULT_RECOMMENDATIONS};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations from TMDB metadata", long_about = None)]
struct Cli {
    /// Directory holding the built similarity index
    #[arg(short, long, default_value = "data/index")]
    index_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the similarity index from the TMDB movie and credits tables
    Build {
        /// Path to tmdb_5000_movies.csv
        #[arg(long, default_value = "data/tmdb_5000_movies.csv")]
        movies: PathBuf,

        /// Path to tmdb_5000_credits.csv
        #[arg(long, default_value = "data/tmdb_5000_credits.csv")]
        credits: PathBuf,

        /// Output directory (defaults to --index-dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Vocabulary size cap
        #[arg(long, default_value = "5000")]
        max_features: usize,

        /// Cast members kept per movie
        #[arg(long, default_value = "3")]
        top_cast: usize,
    },

    /// Get movies similar to a title
    Recommend {
        /// Title of the movie you liked (case-insensitive exact match)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        limit: usize,

        /// Show the similarity score for each recommendation
        #[arg(long)]
        scores: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Write the cleaned, joined movie table as CSV
    Export {
        #[arg(long, default_value = "data/tmdb_5000_movies.csv")]
        movies: PathBuf,

        #[arg(long, default_value = "data/tmdb_5000_credits.csv")]
        credits: PathBuf,

        /// Destination CSV file
        #[arg(long, default_value = "data/movies.csv")]
        output: PathBuf,

        /// Cast members kept per movie
        #[arg(long, default_value = "5")]
        top_cast: usize,
    },

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Build {
            movies,
            credits,
            output,
            max_features,
            top_cast,
        } => {
            let output = output.unwrap_or(cli.index_dir);
            let config = BuildConfig::default()
                .with_max_features(max_features)
                .with_top_cast(top_cast);
            handle_build(&movies, &credits, &output, config)?
        }
        Commands::Recommend {
            title,
            limit,
            scores,
        } => {
            let recommender = open_index(&cli.index_dir)?;
            handle_recommend(&recommender, &title, limit, scores)?
        }
        Commands::Search { title } => {
            let recommender = open_index(&cli.index_dir)?;
            handle_search(&recommender, &title)?
        }
        Commands::Export {
            movies,
            credits,
            output,
            top_cast,
        } => handle_export(&movies, &credits, &output, top_cast)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let recommender = open_index(&cli.index_dir)?;
            handle_benchmark(recommender, requests, concurrent).await?
        }
    }

    Ok(())
}

/// Load the index (this may take a moment for the full corpus)
fn open_index(dir: &Path) -> Result<Recommender> {
    println!("Loading index from {}...", dir.display());
    let start = Instant::now();
    info!("Opening index at {:?}", dir);
    let recommender = Recommender::open(dir)
        .context("Run `reel-recs build` first to create the index")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        recommender.len(),
        start.elapsed()
    );
    Ok(recommender)
}

/// Handle the 'build' command
fn handle_build(movies: &Path, credits: &Path, output: &Path, config: BuildConfig) -> Result<()> {
    let start = Instant::now();
    info!("Building index from {:?} and {:?}", movies, credits);
    let built = pipeline::build_from_files(movies, credits, &config)?;
    let meta = index_store::save(&built.artifact, output)
        .with_context(|| format!("Failed to write index to {}", output.display()))?;

    println!(
        "{} Built index for {} movies ({} terms) in {:?}",
        "✓".green(),
        meta.num_movies,
        meta.build.vocabulary_size,
        start.elapsed()
    );
    println!("{}Output: {}", "• ".cyan(), output.display());
    println!("{}Build id: {:016x}", "• ".cyan(), meta.build_id);
    Ok(())
}

/// What a `recommend` lookup produced
#[derive(Debug, PartialEq)]
enum RecommendOutcome {
    /// The title is in the index
    Found(Vec<ScoredMovie>),
    /// No such title; close matches by name
    NotFound(Vec<String>),
}

fn lookup(recommender: &Recommender, title: &str, limit: usize) -> RecommendOutcome {
    if recommender.find_index(title).is_none() {
        return RecommendOutcome::NotFound(recommender.search(title, 5));
    }
    RecommendOutcome::Found(recommender.scored_recommendations(title, limit))
}

/// Handle the 'recommend' command
fn handle_recommend(recommender: &Recommender, title: &str, limit: usize, scores: bool) -> Result<()> {
    match lookup(recommender, title, limit) {
        RecommendOutcome::NotFound(suggestions) => {
            println!("{} No movie titled '{}'", "✗".red(), title.trim());
            if !suggestions.is_empty() {
                println!("Did you mean:");
                for suggestion in suggestions {
                    println!("  - {}", suggestion);
                }
            }
        }
        RecommendOutcome::Found(recommendations) if recommendations.is_empty() => {
            println!("{} No other movies to recommend for '{}'", "✗".yellow(), title.trim());
        }
        RecommendOutcome::Found(recommendations) => {
            print_recommendations(title.trim(), &recommendations, scores);
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str) -> Result<()> {
    let matches = recommender.search(title, 20);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for movie_title in matches {
        println!("  - {}", movie_title);
    }
    Ok(())
}

/// Handle the 'export' command
fn handle_export(movies: &Path, credits: &Path, output: &Path, top_cast: usize) -> Result<()> {
    let config = IngestConfig::default().with_top_cast(top_cast);
    let written = data_loader::export_movies_csv(movies, credits, output, &config)
        .context("Failed to export cleaned movie table")?;
    println!(
        "{} Wrote {} movies to {}",
        "✓".green(),
        written,
        output.display()
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(recommender: Recommender, requests: usize, concurrent: usize) -> Result<()> {
    if recommender.is_empty() {
        bail!("Index is empty, nothing to benchmark");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random titles from the index
    let titles: Vec<String> = (0..requests)
        .map(|_| {
            let i = rand::random_range(0..recommender.len());
            recommender.artifact().movies()[i].title.clone()
        })
        .collect();

    // Queries are CPU-bound, so they run on the blocking pool
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let recommender = recommender.clone();
        let permits = permits.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let elapsed = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                recommender.recommend(&title, DEFAULT_RECOMMENDATIONS);
                start.elapsed()
            })
            .await?;
            Ok::<_, anyhow::Error>(elapsed)
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = wall.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[ScoredMovie], scores: bool) {
    println!("{}", format!("Because you liked '{}':", title).bold().blue());
    for (rank, movie) in recommendations.iter().enumerate() {
        if scores {
            println!(
                "{}. {} (id {}) - Similarity: {:.3}",
                (rank + 1).to_string().green(),
                movie.title,
                movie.id,
                movie.score
            );
        } else {
            println!("{}. {}", (rank + 1).to_string().green(), movie.title);
        }
    }
}
