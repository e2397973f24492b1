//! CatalogIndex construction and similarity lookups.
//!
//! Loading validates the catalog against the matrix up front, so a query
//! never has to worry about dimensions.

use crate::error::{DataLoadError, LookupError, Result};
use crate::parser;
use crate::types::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CATALOG_STEM: &str = "movies";
const MATRIX_STEM: &str = "similarity";

impl CatalogIndex {
    /// Pair a catalog with its similarity matrix.
    ///
    /// Fails with `DimensionMismatch` unless the matrix has exactly one row
    /// per movie. Duplicate titles resolve to their first position.
    pub fn new(movies: Vec<Movie>, matrix: SimilarityMatrix) -> Result<Self> {
        if matrix.size() != movies.len() {
            return Err(DataLoadError::DimensionMismatch {
                movies: movies.len(),
                rows: matrix.size(),
            });
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter().enumerate() {
            if title_index.contains_key(&movie.title) {
                debug!(
                    "Duplicate title {:?} at position {}, keeping first occurrence",
                    movie.title, position
                );
                continue;
            }
            title_index.insert(movie.title.clone(), position);
        }

        Ok(Self {
            movies,
            matrix,
            title_index,
        })
    }

    /// Load and validate both artifacts.
    ///
    /// The two files are parsed in parallel.
    pub fn load_from_files(catalog_path: &Path, matrix_path: &Path) -> Result<Self> {
        info!(
            "Loading catalog from {} and similarity matrix from {}",
            catalog_path.display(),
            matrix_path.display()
        );

        let (movies, matrix) = rayon::join(
            || parser::parse_catalog(catalog_path),
            || parser::parse_matrix(matrix_path),
        );
        let movies = movies?;
        let matrix = matrix?;

        let index = Self::new(movies, matrix)?;
        info!("Loaded {} movies and a matching similarity matrix", index.len());
        Ok(index)
    }

    /// Load `movies.{json,dat}` and `similarity.{json,dat}` from a directory
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let catalog_path = find_artifact(data_dir, CATALOG_STEM)?;
        let matrix_path = find_artifact(data_dir, MATRIX_STEM)?;
        Self::load_from_files(&catalog_path, &matrix_path)
    }

    /// Top `DEFAULT_RECOMMENDATIONS` movies most similar to `title`
    pub fn recommend(&self, title: &str) -> std::result::Result<Vec<Recommendation>, LookupError> {
        self.recommend_top(title, DEFAULT_RECOMMENDATIONS)
    }

    /// Top `k` movies most similar to `title`.
    ///
    /// Ranked by descending score; equal scores keep catalog order. The
    /// queried movie itself is never returned. NaN scores rank last.
    pub fn recommend_top(
        &self,
        title: &str,
        k: usize,
    ) -> std::result::Result<Vec<Recommendation>, LookupError> {
        let position = self.position_of(title).ok_or_else(|| LookupError::NotFound {
            title: title.to_string(),
        })?;

        // Dimensions were checked at construction
        let row = self.matrix.row(position).unwrap_or(&[]);

        let mut ranked: Vec<(Position, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != position)
            .collect();

        // sort_by is stable, so ties stay in ascending position order
        ranked.sort_by(|a, b| compare_scores_desc(a.1, b.1));
        ranked.truncate(k);

        let recommendations = ranked
            .into_iter()
            .map(|(j, score)| {
                let movie = &self.movies[j];
                Recommendation {
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    score,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Found {} recommendations for {:?} (position {})",
            recommendations.len(),
            title,
            position
        );
        Ok(recommendations)
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Movie> {
        let query = query.to_lowercase();
        let mut matches: Vec<(u8, Position, &Movie)> = self
            .movies
            .iter()
            .enumerate()
            .filter_map(|(position, movie)| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((0, position, movie))
                } else if title.contains(&query) {
                    Some((1, position, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by_key(|&(rank, position, _)| (rank, position));
        matches
            .into_iter()
            .take(limit)
            .map(|(_, _, movie)| movie)
            .collect()
    }
}

/// Descending order with NaN treated as the lowest possible score
fn compare_scores_desc(a: f32, b: f32) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    // -0.0 and 0.0 must tie; NaN is gone after `key`, so this is total
    key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal)
}

fn find_artifact(data_dir: &Path, stem: &str) -> Result<PathBuf> {
    ["json", "dat"]
        .iter()
        .map(|ext| data_dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.exists())
        .ok_or_else(|| DataLoadError::FileNotFound {
            path: data_dir.join(format!("{}.{{json,dat}}", stem)).display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn matrix(rows: Vec<Vec<f32>>) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(rows).unwrap()
    }

    fn abc_index() -> CatalogIndex {
        CatalogIndex::new(
            vec![Movie::new(1, "A"), Movie::new(2, "B"), Movie::new(3, "C")],
            matrix(vec![
                vec![1.0, 0.8, 0.3],
                vec![0.8, 1.0, 0.5],
                vec![0.3, 0.5, 1.0],
            ]),
        )
        .unwrap()
    }

    /// Eight movies, row 0 has ties and a NaN
    fn wide_index() -> CatalogIndex {
        let movies = (0..8).map(|i| Movie::new(100 + i, format!("M{}", i))).collect();
        let mut rows = vec![vec![0.0; 8]; 8];
        rows[0] = vec![1.0, 0.4, 0.9, 0.4, f32::NAN, 0.9, 0.1, 0.4];
        for (i, row) in rows.iter_mut().enumerate().skip(1) {
            row[i] = 1.0;
        }
        CatalogIndex::new(movies, matrix(rows)).unwrap()
    }

    #[test]
    fn test_recommend_concrete_scenario() {
        let index = abc_index();
        let recs = index.recommend("A").unwrap();

        let pairs: Vec<(&str, MovieId)> = recs.iter().map(|r| (r.title.as_str(), r.movie_id)).collect();
        assert_eq!(pairs, vec![("B", 2), ("C", 3)]);
    }

    #[test]
    fn test_recommend_caps_at_five_and_excludes_self() {
        let index = wide_index();
        let recs = index.recommend("M0").unwrap();

        assert_eq!(recs.len(), DEFAULT_RECOMMENDATIONS);
        assert!(recs.iter().all(|r| r.movie_id != 100));
    }

    #[test]
    fn test_recommend_ties_keep_catalog_order() {
        let index = wide_index();
        let recs = index.recommend("M0").unwrap();

        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        // 0.9 (M2, M5), then 0.4 (M1, M3, M7) truncated to five
        assert_eq!(titles, vec!["M2", "M5", "M1", "M3", "M7"]);
    }

    #[test]
    fn test_recommend_nan_ranks_last() {
        let index = wide_index();
        let recs = index.recommend_top("M0", 10).unwrap();

        assert_eq!(recs.len(), 7);
        assert_eq!(recs.last().unwrap().title, "M4");
        assert!(recs.last().unwrap().score.is_nan());
    }

    #[test]
    fn test_recommend_signed_zeros_tie_in_catalog_order() {
        let index = CatalogIndex::new(
            vec![Movie::new(1, "A"), Movie::new(2, "B"), Movie::new(3, "C")],
            matrix(vec![
                vec![1.0, -0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ]),
        )
        .unwrap();

        let ids: Vec<MovieId> = index.recommend("A").unwrap().iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_recommend_self_excluded_even_when_not_max() {
        let index = CatalogIndex::new(
            vec![Movie::new(1, "A"), Movie::new(2, "B")],
            matrix(vec![vec![0.1, 0.2], vec![0.2, 0.1]]),
        )
        .unwrap();

        let recs = index.recommend("A").unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 2);
    }

    #[test]
    fn test_recommend_small_catalogs() {
        let single = CatalogIndex::new(vec![Movie::new(7, "Solo")], matrix(vec![vec![1.0]])).unwrap();
        assert!(single.recommend("Solo").unwrap().is_empty());
    }

    #[test]
    fn test_recommend_missing_title() {
        let index = abc_index();

        assert_eq!(
            index.recommend("Z"),
            Err(LookupError::NotFound { title: "Z".to_string() })
        );
        // Exact, case-sensitive match only
        assert!(index.recommend("a").is_err());
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let index = wide_index();
        assert_eq!(index.recommend("M0").unwrap(), index.recommend("M0").unwrap());
    }

    #[test]
    fn test_duplicate_title_first_match_wins() {
        let index = CatalogIndex::new(
            vec![Movie::new(1, "Twin"), Movie::new(2, "Other"), Movie::new(3, "Twin")],
            matrix(vec![
                vec![1.0, 0.2, 0.9],
                vec![0.2, 1.0, 0.7],
                vec![0.9, 0.7, 1.0],
            ]),
        )
        .unwrap();

        assert_eq!(index.position_of("Twin"), Some(0));
        let recs = index.recommend("Twin").unwrap();
        assert_eq!(recs[0].movie_id, 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let movies: Vec<Movie> = (0..10).map(|i| Movie::new(i, format!("M{}", i))).collect();
        let result = CatalogIndex::new(movies, matrix(vec![vec![0.0; 9]; 9]));

        assert!(matches!(
            result,
            Err(DataLoadError::DimensionMismatch { movies: 10, rows: 9 })
        ));
    }

    #[test]
    fn test_non_square_matrix_rejected() {
        let result = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]);
        assert!(matches!(
            result,
            Err(DataLoadError::NonSquareRow { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_search() {
        let index = CatalogIndex::new(
            vec![
                Movie::new(1, "Alien"),
                Movie::new(2, "Aliens"),
                Movie::new(3, "alien"),
                Movie::new(4, "Heat"),
            ],
            matrix(vec![vec![0.0; 4]; 4]),
        )
        .unwrap();

        let ids: Vec<MovieId> = index.search("ALIEN", 10).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(index.search("alien", 1).len(), 1);
        assert!(index.search("zzz", 10).is_empty());
    }

    #[test]
    fn test_load_from_dir_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("movies.json"),
            r#"[{"movie_id": 1, "title": "A"}, {"movie_id": 2, "title": "B"}, {"id": 3, "title": "C"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("similarity.json"),
            "[[1.0, 0.8, 0.3], [0.8, 1.0, 0.5], [0.3, 0.5, 1.0]]",
        )
        .unwrap();

        let index = CatalogIndex::load_from_dir(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.titles().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(index.recommend("A").unwrap()[0].movie_id, 2);
    }

    #[test]
    fn test_load_from_files_dat() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.dat");
        let sim = dir.path().join("scores.dat");
        fs::write(&catalog, "1::A\n2::B\n").unwrap();
        fs::write(&sim, "1.0 0.4\n0.4 1.0\n").unwrap();

        let index = CatalogIndex::load_from_files(&catalog, &sim).unwrap();
        assert_eq!(index.recommend("B").unwrap()[0].title, "A");
    }

    #[test]
    fn test_load_fails_fast_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movies.dat"), "1::A\n2::B\n3::C\n").unwrap();
        fs::write(dir.path().join("similarity.dat"), "1.0 0.4\n0.4 1.0\n").unwrap();

        assert!(matches!(
            CatalogIndex::load_from_dir(dir.path()),
            Err(DataLoadError::DimensionMismatch { movies: 3, rows: 2 })
        ));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movies.json"), "[]").unwrap();

        assert!(matches!(
            CatalogIndex::load_from_dir(dir.path()),
            Err(DataLoadError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movies.json"), r#"{"title": "not a list"}"#).unwrap();
        fs::write(dir.path().join("similarity.json"), "[]").unwrap();

        assert!(matches!(
            CatalogIndex::load_from_dir(dir.path()),
            Err(DataLoadError::Json { .. })
        ));
    }
}
