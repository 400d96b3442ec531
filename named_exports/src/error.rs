use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamedExportsError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("edit [{start}, {end}) overlaps an earlier edit")]
    OverlappingEdit { start: usize, end: usize },

    #[error("edit [{start}, {end}) is outside the source (length {len}) or splits a character")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid glob pattern {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("cannot write output for {path}: {message}")]
    OutputPath { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failure to read or analyze a dependency while collecting its export names.
///
/// Kept `Clone` because the export cache hands the same outcome to every
/// request for the path.
#[derive(Debug, Clone, Error)]
#[error("failed to extract exports from {path}: {message}")]
pub struct ExtractionError {
    pub path: PathBuf,
    pub message: String,
}
