//! Core domain types for the movie catalog.
//!
//! Everything here is immutable once loaded: the catalog and the
//! similarity matrix are built once at startup and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Upstream metadata identifier for a movie (TMDB id)
pub type MovieId = u32;

/// Zero-based position of a movie in the catalog, also its matrix row/column
pub type Position = usize;

/// Number of neighbours returned by `CatalogIndex::recommend`
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

// =============================================================================
// Movie
// =============================================================================

/// A single catalog entry.
///
/// The title doubles as the user-facing lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(alias = "movie_id")]
    pub id: MovieId,
    pub title: String,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

// =============================================================================
// SimilarityMatrix
// =============================================================================

/// Dense pairwise similarity scores, stored row-major.
///
/// `row(i)[j]` is the similarity between catalog positions `i` and `j`.
/// Higher means more similar. Symmetry is not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    pub(crate) n: usize,
    pub(crate) scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> crate::Result<Self> {
        let n = rows.len();
        let mut scores = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(crate::DataLoadError::NonSquareRow {
                    row,
                    expected: n,
                    found: values.len(),
                });
            }
            scores.extend(values);
        }
        Ok(Self { n, scores })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.n
    }

    /// Borrow one row of scores
    pub fn row(&self, i: Position) -> Option<&[f32]> {
        if i >= self.n {
            return None;
        }
        Some(&self.scores[i * self.n..(i + 1) * self.n])
    }
}

// =============================================================================
// Recommendation
// =============================================================================

/// A ranked neighbour produced by a similarity lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
}

// =============================================================================
// CatalogIndex
// =============================================================================

/// The movie catalog together with its precomputed similarity matrix.
///
/// Constructed once (see `CatalogIndex::new` and the loaders in `index.rs`)
/// and shared read-only, typically behind an `Arc`.
#[derive(Debug)]
pub struct CatalogIndex {
    pub(crate) movies: Vec<Movie>,
    pub(crate) matrix: SimilarityMatrix,
    /// Title -> first catalog position carrying it
    pub(crate) title_index: HashMap<String, Position>,
}

impl CatalogIndex {
    /// All movies, in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Titles in catalog order, as offered to a selection widget
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Movie at a catalog position
    pub fn get_movie(&self, position: Position) -> Option<&Movie> {
        self.movies.get(position)
    }

    /// First catalog position whose title matches exactly (case-sensitive)
    pub fn position_of(&self, title: &str) -> Option<Position> {
        self.title_index.get(title).copied()
    }

    /// The loaded similarity matrix
    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
