//! Integration tests for the pipeline.
//!
//! These tests drive the full records → artifact chain on small
//! hand-built corpora.

use data_loader::MovieRecord;
use pipeline::{build_index, BuildConfig};

fn movie(id: u32, title: &str, overview: &str, genres: &[&str], director: &str) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        overview: overview.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        keywords: vec![],
        cast: vec![],
        director: vec![director.to_string()],
    }
}

fn small_corpus() -> Vec<MovieRecord> {
    vec![
        movie(1, "Alien Dawn", "marines fight aliens on a distant planet", &["Science Fiction", "Action"], "Ridley Scott"),
        movie(2, "Planet Siege", "aliens invade a mining planet", &["Science Fiction"], "Ridley Scott"),
        movie(3, "Paris Hearts", "two strangers fall in love in paris", &["Romance"], "Nancy Meyers"),
        movie(4, "Love Orbit", "astronauts fall in love on a space station", &["Romance", "Science Fiction"], "Nancy Meyers"),
        movie(5, "Quiet", "", &[], ""),
    ]
}

#[test]
fn test_shared_tags_rank_above_disjoint() {
    let records = vec![
        movie(1, "A", "pirates treasure island", &["Adventure"], "Gore Verbinski"),
        movie(2, "B", "pirates treasure island", &["Adventure"], "Gore Verbinski"),
        movie(3, "C", "cooking contest bakery", &["Documentary"], "Morgan Spurlock"),
    ];

    let output = build_index(&records, &BuildConfig::default()).unwrap();
    let sim = output.artifact.similarity();

    assert!((sim.get(0, 1).unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(sim.get(0, 2).unwrap(), 0.0);
    assert!(sim.get(0, 1).unwrap() > sim.get(0, 2).unwrap());
}

#[test]
fn test_build_is_deterministic() {
    let records = small_corpus();
    let config = BuildConfig::default();

    let first = build_index(&records, &config).unwrap();
    let second = build_index(&records, &config).unwrap();

    assert_eq!(first.vocabulary, second.vocabulary);
    assert_eq!(first.vectors, second.vectors);
    assert_eq!(first.artifact, second.artifact);
}

#[test]
fn test_matrix_properties() {
    let output = build_index(&small_corpus(), &BuildConfig::default()).unwrap();
    let sim = output.artifact.similarity();
    let n = sim.dimension();
    assert_eq!(n, 5);

    for i in 0..n {
        for j in 0..n {
            let value = sim.get(i, j).unwrap();
            assert!((0.0..=1.0).contains(&value));
            assert_eq!(value, sim.get(j, i).unwrap());
        }
    }

    // Empty-tag movie has a zero vector
    assert!(output.vectors[4].is_zero());
    assert_eq!(sim.row(4).iter().sum::<f32>(), 0.0);
    assert!((sim.get(0, 0).unwrap() - 1.0).abs() < 1e-6);

    // Same genre and director outrank a different one
    assert!(sim.get(0, 1).unwrap() > sim.get(0, 2).unwrap());
    assert!(sim.get(2, 3).unwrap() > sim.get(2, 1).unwrap());
}

#[test]
fn test_max_features_caps_vocabulary() {
    let config = BuildConfig::default().with_max_features(3);
    let output = build_index(&small_corpus(), &config).unwrap();

    assert_eq!(output.vocabulary.len(), 3);
    assert_eq!(output.artifact.info().max_features, 3);
    for vector in &output.vectors {
        assert!(vector.entries().iter().all(|&(c, _)| c < 3));
    }
}
