pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching_handlers;
use crate::retrieval::handlers as retrieval_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/recommendations",
            post(matching_handlers::handle_recommendations),
        )
        // Catalog & ingestion API
        .route(
            "/api/v1/programs",
            get(retrieval_handlers::handle_list_programs),
        )
        .route(
            "/api/v1/programs/embed",
            post(retrieval_handlers::handle_embed_programs),
        )
        .route(
            "/api/v1/programs/embed-static",
            post(retrieval_handlers::handle_embed_static),
        )
        .with_state(state)
}
