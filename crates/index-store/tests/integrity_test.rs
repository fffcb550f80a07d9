//! Load-time integrity checks against hand-crafted artifact directories.
//!
//! The blobs are written with plain tuples that share the on-disk layout,
//! which is how a mismatched or stale pair would look to the loader.

use index_store::{load, BuildInfo, IndexStoreError, IndexedMovie, MetaFile, FORMAT_VERSION};
use std::path::Path;

const BUILD_ID: u64 = 0xfeed;

fn write_artifact(dir: &Path, movie_rows: usize, dimension: usize, matrix_build_id: u64) {
    let movies: Vec<IndexedMovie> = (0..movie_rows)
        .map(|i| IndexedMovie {
            id: i as u32,
            title: format!("Movie {}", i),
        })
        .collect();
    let data = vec![0.0f32; dimension * dimension];

    std::fs::write(
        dir.join("movies.bin"),
        bincode::serialize(&(BUILD_ID, movies)).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("similarity.bin"),
        bincode::serialize(&(matrix_build_id, dimension, data)).unwrap(),
    )
    .unwrap();

    let meta = MetaFile {
        version: FORMAT_VERSION,
        build_id: BUILD_ID,
        num_movies: movie_rows,
        dimension,
        build: BuildInfo::default(),
    };
    std::fs::write(dir.join("meta.json"), serde_json::to_string(&meta).unwrap()).unwrap();
}

#[test]
fn test_consistent_hand_written_artifact_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), 5, 5, BUILD_ID);

    let artifact = load(dir.path()).unwrap();
    assert_eq!(artifact.len(), 5);
    assert_eq!(artifact.similarity().dimension(), 5);
}

#[test]
fn test_hundred_movies_with_99_square_matrix_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), 100, 99, BUILD_ID);

    let err = load(dir.path()).unwrap_err();
    assert!(
        matches!(err, IndexStoreError::DimensionMismatch { movies: 100, dimension: 99 }),
        "unexpected error: {err}"
    );
}

#[test]
fn test_blobs_from_different_builds_fail() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), 3, 3, BUILD_ID + 1);

    assert!(matches!(
        load(dir.path()),
        Err(IndexStoreError::BuildMismatch { .. })
    ));
}

#[test]
fn test_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load(dir.path()), Err(IndexStoreError::Missing { .. })));
}

#[test]
fn test_garbage_meta_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), 2, 2, BUILD_ID);
    std::fs::write(dir.path().join("meta.json"), "{ not json").unwrap();

    assert!(matches!(load(dir.path()), Err(IndexStoreError::Corrupt { .. })));
}
