//! # Data Loader Crate
//!
//! Loads the movie catalog and its precomputed similarity matrix, and
//! answers "which movies are most like this one" queries against them.
//!
//! ## Main Components
//!
//! - **types**: `Movie`, `SimilarityMatrix`, `CatalogIndex`, `Recommendation`
//! - **parser**: JSON / `.dat` artifact parsing
//! - **index**: validation on load and top-k similarity lookups
//! - **error**: `DataLoadError` (fatal, load time) and `LookupError` (per query)
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CatalogIndex;
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_dir(Path::new("data"))?;
//! for rec in index.recommend("Avatar")? {
//!     println!("{} ({}) {:.3}", rec.title, rec.movie_id, rec.score);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, LookupError, Result};
pub use parser::ArtifactFormat;
pub use types::{
    CatalogIndex,
    DEFAULT_RECOMMENDATIONS,
    Movie,
    MovieId,
    Position,
    Recommendation,
    SimilarityMatrix,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let matrix = SimilarityMatrix::from_rows(vec![]).unwrap();
        let index = CatalogIndex::new(vec![], matrix).unwrap();

        assert!(index.is_empty());
        assert_eq!(index.titles().count(), 0);
        assert!(index.recommend("anything").is_err());
    }

    #[test]
    fn test_matrix_rows() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.3, 1.0]]).unwrap();

        assert_eq!(matrix.size(), 2);
        assert_eq!(matrix.row(1), Some(&[0.3, 1.0][..]));
        assert!(matrix.row(2).is_none());
    }

    #[test]
    fn test_getters() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();
        let index = CatalogIndex::new(
            vec![Movie::new(19995, "Avatar"), Movie::new(285, "Pirates")],
            matrix,
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.position_of("Pirates"), Some(1));
        assert_eq!(index.get_movie(0).map(|m| m.id), Some(19995));
        assert!(index.get_movie(5).is_none());
        assert_eq!(index.matrix().size(), 2);
    }
}
