use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/search", get(handlers::search))
        // Tabs
        .route("/tabs/:tab", get(handlers::select_tab))
        // Watch-state actions
        .route("/movies/:id", delete(handlers::remove_movie))
        .route("/movies/:id/watched", post(handlers::add_to_watched))
        .route("/movies/:id/watchlist", post(handlers::add_to_watchlist))
        .route("/movies/:id/mark-watched", post(handlers::mark_as_watched))
}
