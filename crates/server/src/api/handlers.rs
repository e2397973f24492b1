use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::state::AppState;
use crate::error::AppResult;
use crate::orchestrator::MovieRecommendation;
use crate::page;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    let catalog = state.orchestrator.catalog();
    Html(page::render_page(catalog.titles(), None, ""))
}

/// Lookup failures and empty results both render the warning; the server
/// keeps accepting queries either way.
pub async fn recommend_page(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Html<String> {
    let content = match state.orchestrator.get_recommendations(&query.title).await {
        Ok(recs) if !recs.is_empty() => page::render_cards(&recs),
        Ok(_) => {
            warn!("No recommendations for {:?}", query.title);
            page::render_warning(page::NO_RECOMMENDATIONS)
        }
        Err(e) => {
            warn!("Recommendation lookup failed: {}", e);
            page::render_warning(page::NO_RECOMMENDATIONS)
        }
    };

    let catalog = state.orchestrator.catalog();
    Html(page::render_page(catalog.titles(), Some(query.title.as_str()), &content))
}

pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    let titles = state
        .orchestrator
        .catalog()
        .titles()
        .map(str::to_string)
        .collect();
    Json(titles)
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<Vec<MovieRecommendation>>> {
    let recs = state.orchestrator.get_recommendations(&query.title).await?;
    info!(title = %query.title, count = recs.len(), "Served recommendations");
    Ok(Json(recs))
}
