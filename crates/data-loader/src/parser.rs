//! Parsers for the catalog and similarity artifacts.
//!
//! Supported formats, chosen by file extension:
//! - catalog `.json`: `[{"movie_id": 19995, "title": "Avatar"}, ...]`
//! - catalog `.dat`:  `movieId::title`, one per line
//! - matrix `.json`:  `[[1.0, 0.2, ...], ...]`
//! - matrix `.dat`:   one row per line, values separated by whitespace or commas

use crate::error::{DataLoadError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// On-disk encoding of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Dat,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("dat") => Ok(Self::Dat),
            _ => Err(DataLoadError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Read a text artifact, falling back to ISO-8859-1 when it isn't UTF-8.
///
/// Older catalog dumps are Latin-1; each byte maps directly to a code point.
fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Ok(e.into_bytes().iter().map(|&b| b as char).collect()),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Catalog
// =============================================================================

/// Parse the movie catalog
pub fn parse_catalog(path: &Path) -> Result<Vec<Movie>> {
    let format = ArtifactFormat::from_path(path)?;
    let content = read_text(path)?;
    let file = file_label(path);
    match format {
        ArtifactFormat::Json => {
            serde_json::from_str(&content).map_err(|source| DataLoadError::Json { file, source })
        }
        ArtifactFormat::Dat => parse_catalog_lines(&content, &file),
    }
}

fn parse_catalog_lines(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (id, title) = line
            .split_once("::")
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Expected movieId::title".to_string(),
            })?;

        let id: MovieId = id.trim().parse().map_err(|_| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid movieId: {}", id),
        })?;

        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        movies.push(Movie::new(id, title));
    }

    Ok(movies)
}

// =============================================================================
// Similarity matrix
// =============================================================================

/// Parse the similarity matrix
pub fn parse_matrix(path: &Path) -> Result<SimilarityMatrix> {
    let format = ArtifactFormat::from_path(path)?;
    let content = read_text(path)?;
    let file = file_label(path);
    let rows = match format {
        ArtifactFormat::Json => serde_json::from_str::<Vec<Vec<f32>>>(&content)
            .map_err(|source| DataLoadError::Json { file, source })?,
        ArtifactFormat::Dat => parse_matrix_lines(&content, &file)?,
    };
    SimilarityMatrix::from_rows(rows)
}

fn parse_matrix_lines(content: &str, file: &str) -> Result<Vec<Vec<f32>>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    // Rows are independent, so parse them in parallel
    lines
        .par_iter()
        .map(|&(idx, line)| parse_matrix_row(line, file, idx + 1))
        .collect()
}

fn parse_matrix_row(line: &str, file: &str, line_no: usize) -> Result<Vec<f32>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f32>().map_err(|_| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid score: {}", token),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("movies.json")).unwrap(),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("similarity.DAT")).unwrap(),
            ArtifactFormat::Dat
        );
        assert!(matches!(
            ArtifactFormat::from_path(Path::new("movie_list.pkl")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_catalog_lines() {
        let content = "19995::Avatar\n\n285::Pirates of the Caribbean: At World's End\n";
        let movies = parse_catalog_lines(content, "movies.dat").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0], Movie::new(19995, "Avatar"));
        // Only the first separator splits; the title keeps its own colons
        assert_eq!(movies[1].title, "Pirates of the Caribbean: At World's End");
    }

    #[test]
    fn test_parse_catalog_lines_bad_id() {
        let err = parse_catalog_lines("abc::Avatar", "movies.dat").unwrap_err();
        match err {
            DataLoadError::ParseError { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_catalog_lines_missing_separator() {
        assert!(parse_catalog_lines("19995 Avatar", "movies.dat").is_err());
    }

    #[test]
    fn test_parse_matrix_lines_mixed_separators() {
        let content = "1.0, 0.5 0.25\n0.5\t1.0,0.1\n\n0.25 0.1 1.0\n";
        let rows = parse_matrix_lines(content, "similarity.dat").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![1.0, 0.5, 0.25]);
        assert_eq!(rows[1], vec![0.5, 1.0, 0.1]);
    }

    #[test]
    fn test_parse_matrix_lines_reports_line_number() {
        let content = "1.0 0.5\n0.5 oops\n";
        let err = parse_matrix_lines(content, "similarity.dat").unwrap_err();
        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
