use axum::{Router, routing::get};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index_page))
        .route("/recommend", get(handlers::recommend_page))
        .route("/api/titles", get(handlers::list_titles))
        .route("/api/recommendations", get(handlers::get_recommendations))
        .with_state(state)
}
