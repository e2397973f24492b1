//! # Recommendation Orchestrator
//!
//! Coordinates one query end to end:
//! 1. Look up the selected title's nearest neighbours in the catalog
//! 2. Resolve a poster for every neighbour (concurrently)
//! 3. Reassemble the results in ranking order
//!
//! Lookup failures are returned to the caller. Poster failures never are:
//! they degrade to the placeholder image.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use data_loader::{CatalogIndex, DEFAULT_RECOMMENDATIONS, LookupError, MovieId, Recommendation};
use poster_client::{PosterOutcome, PosterResolver};

/// Where a recommendation's poster URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterStatus {
    /// Real poster from the CDN
    Found,
    /// Upstream has no poster for this movie
    Missing,
    /// Every fetch attempt failed
    Unavailable,
}

impl From<&PosterOutcome> for PosterStatus {
    fn from(outcome: &PosterOutcome) -> Self {
        match outcome {
            PosterOutcome::Found(_) => PosterStatus::Found,
            PosterOutcome::Missing => PosterStatus::Missing,
            PosterOutcome::Exhausted { .. } => PosterStatus::Unavailable,
        }
    }
}

/// Final recommendation handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    pub poster: PosterStatus,
}

/// Main orchestrator that coordinates lookup and poster resolution
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<CatalogIndex>,
    posters: PosterResolver,
    limit: usize,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator over a loaded catalog
    ///
    /// # Arguments
    /// * `catalog` - Shared, read-only catalog and similarity matrix
    /// * `posters` - Resolver used for every recommended movie
    pub fn new(catalog: Arc<CatalogIndex>, posters: PosterResolver) -> Self {
        Self {
            catalog,
            posters,
            limit: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Change how many neighbours are returned (default 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Main entry point: recommendations with posters for a selected title
    ///
    /// # Returns
    /// Recommendations ranked by descending similarity, or
    /// `LookupError::NotFound` when the title isn't in the catalog
    pub async fn get_recommendations(
        &self,
        title: &str,
    ) -> Result<Vec<MovieRecommendation>, LookupError> {
        let start_time = Instant::now();

        let neighbours = self.catalog.recommend_top(title, self.limit)?;
        info!("Found {} neighbours for {:?}", neighbours.len(), title);

        let movie_ids: Vec<MovieId> = neighbours.iter().map(|r| r.movie_id).collect();
        let outcomes = self.posters.resolve_batch(&movie_ids).await;

        let unavailable = outcomes
            .iter()
            .filter(|o| matches!(o, PosterOutcome::Exhausted { .. }))
            .count();
        if unavailable > 0 {
            warn!(
                "{} of {} posters for {:?} could not be fetched",
                unavailable,
                outcomes.len(),
                title
            );
        }

        let recommendations: Vec<MovieRecommendation> = neighbours
            .into_iter()
            .zip(outcomes)
            .map(|(rec, outcome)| Self::attach_poster(rec, &outcome))
            .collect();

        info!(
            "Total time to get recommendations for {:?}: {:.2?}",
            title,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    fn attach_poster(rec: Recommendation, outcome: &PosterOutcome) -> MovieRecommendation {
        MovieRecommendation {
            movie_id: rec.movie_id,
            title: rec.title,
            score: rec.score,
            poster_url: outcome.url().to_string(),
            poster: PosterStatus::from(outcome),
        }
    }
}
