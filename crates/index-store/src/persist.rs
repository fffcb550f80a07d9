//! On-disk layout of an `IndexArtifact`.
//!
//! ```text
//! <dir>/meta.json       format version, build id, sizes, build parameters
//! <dir>/movies.bin      bincode: build id + movie table
//! <dir>/similarity.bin  bincode: build id + dimension + row-major matrix
//! ```
//!
//! `meta.json` is written last, so an interrupted save leaves a directory
//! that fails to load instead of one that loads stale data.

use crate::error::{IndexStoreError, Result};
use crate::types::{BuildInfo, IndexArtifact, IndexedMovie, SimilarityMatrix};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::fs::{create_dir_all, File};
use std::hash::{Hash, Hasher};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub build_id: u64,
    pub num_movies: usize,
    pub dimension: usize,
    pub build: BuildInfo,
}

#[derive(Serialize, Deserialize)]
struct MoviesBlob {
    build_id: u64,
    movies: Vec<IndexedMovie>,
}

#[derive(Serialize, Deserialize)]
struct MatrixBlob {
    build_id: u64,
    dimension: usize,
    data: Vec<f32>,
}

/// File locations inside an artifact directory
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn movies(&self) -> PathBuf { self.root.join("movies.bin") }
    pub fn similarity(&self) -> PathBuf { self.root.join("similarity.bin") }
}

/// Content fingerprint tying the three files together.
fn build_id(artifact: &IndexArtifact) -> u64 {
    let mut hasher = DefaultHasher::new();
    FORMAT_VERSION.hash(&mut hasher);
    artifact.movies().hash(&mut hasher);
    artifact.similarity().dimension().hash(&mut hasher);
    for value in artifact.similarity().as_slice() {
        value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IndexStoreError::Missing {
            path: path.display().to_string(),
        },
        _ => IndexStoreError::Io(e),
    })?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

fn corrupt(path: &Path, reason: impl ToString) -> IndexStoreError {
    IndexStoreError::Corrupt {
        file: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn decode_blob<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let buf = read_file(path)?;
    bincode::deserialize(&buf).map_err(|e| corrupt(path, e))
}

/// Write an artifact into `dir`, creating it if needed.
#[instrument(skip(artifact), fields(movies = artifact.len()))]
pub fn save(artifact: &IndexArtifact, dir: &Path) -> Result<MetaFile> {
    let paths = IndexPaths::new(dir);
    create_dir_all(&paths.root)?;

    let build_id = build_id(artifact);
    debug!("Saving artifact with build id {:#x}", build_id);

    let movies = MoviesBlob {
        build_id,
        movies: artifact.movies().to_vec(),
    };
    let bytes = bincode::serialize(&movies).map_err(|e| corrupt(&paths.movies(), e))?;
    write_file(&paths.movies(), &bytes)?;

    let matrix = MatrixBlob {
        build_id,
        dimension: artifact.similarity().dimension(),
        data: artifact.similarity().as_slice().to_vec(),
    };
    let bytes = bincode::serialize(&matrix).map_err(|e| corrupt(&paths.similarity(), e))?;
    write_file(&paths.similarity(), &bytes)?;

    let meta = MetaFile {
        version: FORMAT_VERSION,
        build_id,
        num_movies: artifact.len(),
        dimension: artifact.similarity().dimension(),
        build: *artifact.info(),
    };
    let json = serde_json::to_string_pretty(&meta).map_err(|e| corrupt(&paths.meta(), e))?;
    write_file(&paths.meta(), json.as_bytes())?;

    info!("Saved index artifact ({} movies) to {:?}", artifact.len(), dir);
    Ok(meta)
}

/// Read only `meta.json`.
pub fn load_meta(dir: &Path) -> Result<MetaFile> {
    let path = IndexPaths::new(dir).meta();
    let buf = read_file(&path)?;
    let meta: MetaFile = serde_json::from_slice(&buf).map_err(|e| corrupt(&path, e))?;
    if meta.version != FORMAT_VERSION {
        return Err(IndexStoreError::UnsupportedVersion {
            found: meta.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(meta)
}

/// Load and verify an artifact.
///
/// Either both halves come back consistent or an error does; this is the
/// check that must pass before any query is served.
#[instrument]
pub fn load(dir: &Path) -> Result<IndexArtifact> {
    let paths = IndexPaths::new(dir);
    let meta = load_meta(dir)?;
    let movies: MoviesBlob = decode_blob(&paths.movies())?;
    let matrix: MatrixBlob = decode_blob(&paths.similarity())?;

    if movies.build_id != meta.build_id || matrix.build_id != meta.build_id {
        return Err(IndexStoreError::BuildMismatch {
            meta: meta.build_id,
            movies: movies.build_id,
            matrix: matrix.build_id,
        });
    }
    if meta.num_movies != movies.movies.len() {
        return Err(IndexStoreError::MetaMismatch {
            field: "num_movies",
            expected: meta.num_movies,
            actual: movies.movies.len(),
        });
    }
    if meta.dimension != matrix.dimension {
        return Err(IndexStoreError::MetaMismatch {
            field: "dimension",
            expected: meta.dimension,
            actual: matrix.dimension,
        });
    }

    let similarity = SimilarityMatrix::new(matrix.dimension, matrix.data)?;
    let artifact = IndexArtifact::new(movies.movies, similarity, meta.build)?;

    info!("Loaded index artifact with {} movies", artifact.len());
    Ok(artifact)
}
