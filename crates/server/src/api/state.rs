use std::sync::Arc;

use data_loader::CatalogIndex;
use poster_client::PosterResolver;

use crate::orchestrator::RecommendationOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogIndex>, posters: PosterResolver) -> Self {
        Self {
            orchestrator: RecommendationOrchestrator::new(catalog, posters),
        }
    }
}
