//! Error types for the data-loader crate.
//!
//! Two families of failure live here:
//! - `DataLoadError`: structural problems with the catalog or similarity
//!   artifacts. These are fatal at startup.
//! - `LookupError`: per-query failures. The process keeps running and the
//!   caller decides how to surface them.

use thiserror::Error;

/// Errors that can occur while loading and validating the artifacts
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a text artifact couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// JSON artifact didn't deserialize into the expected shape
    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact extension is neither `.json` nor `.dat`
    #[error("Unsupported artifact format: {path}")]
    UnsupportedFormat { path: String },

    /// Matrix row count differs from the catalog size
    #[error("Similarity matrix has {rows} rows but the catalog has {movies} movies")]
    DimensionMismatch { movies: usize, rows: usize },

    /// A matrix row is not exactly N entries wide
    #[error("Similarity row {row} has {found} columns, expected {expected}")]
    NonSquareRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors returned by catalog queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No catalog entry carries this exact title
    #[error("Movie not found in catalog: {title}")]
    NotFound { title: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
