//! Benchmarks for the offline build
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic corpus so no TMDB download is needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::MovieRecord;
use pipeline::{build_index, compose_corpus, cosine_similarity_matrix, BuildConfig, CountVectorizer};

const WORDS: &[&str] = &[
    "space", "alien", "war", "love", "paris", "heist", "bank", "robot", "future", "ocean",
    "pirate", "treasure", "detective", "murder", "family", "comedy", "drama", "horror", "ghost",
    "dragon", "king", "queen", "school", "music", "dance", "zombie", "vampire", "spy", "desert",
    "island",
];

fn synthetic_corpus(n: usize) -> Vec<MovieRecord> {
    (0..n)
        .map(|i| {
            let word = |k: usize| WORDS[(i * 7 + k * 13) % WORDS.len()].to_string();
            MovieRecord {
                id: i as u32,
                title: format!("Movie {}", i),
                overview: (0..12).map(word).collect::<Vec<_>>().join(" "),
                genres: vec![word(1), word(2)],
                keywords: vec![word(3), format!("kw{}", i % 97)],
                cast: vec![format!("actor{}", i % 211), format!("actor{}", i % 173)],
                director: vec![format!("director{}", i % 59)],
            }
        })
        .collect()
}

fn bench_vectorize(c: &mut Criterion) {
    let documents = compose_corpus(&synthetic_corpus(2000));
    let vectorizer = CountVectorizer::default();

    c.bench_function("vectorize_2000", |b| {
        b.iter(|| {
            let output = vectorizer.fit_transform(black_box(&documents));
            black_box(output)
        })
    });
}

fn bench_similarity_matrix(c: &mut Criterion) {
    let documents = compose_corpus(&synthetic_corpus(2000));
    let (_, vectors) = CountVectorizer::default().fit_transform(&documents);

    c.bench_function("similarity_matrix_2000", |b| {
        b.iter(|| {
            let matrix = cosine_similarity_matrix(black_box(&vectors));
            black_box(matrix)
        })
    });
}

fn bench_build_index(c: &mut Criterion) {
    let records = synthetic_corpus(1000);
    let config = BuildConfig::default();

    c.bench_function("build_index_1000", |b| {
        b.iter(|| {
            let output = build_index(black_box(&records), &config).unwrap();
            black_box(output)
        })
    });
}

criterion_group!(
    benches,
    bench_vectorize,
    bench_similarity_matrix,
    bench_build_index
);
criterion_main!(benches);
