use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Survey & personalized recommendations
        .route("/api/survey", get(handlers::survey))
        .route("/api/recommendations", post(handlers::recommendations))
        // Title similarity
        .route("/api/title/:title/similar", get(handlers::similar_titles))
        // User profiles
        .route("/api/user/:user_id/profile", get(handlers::get_profile))
        .route("/api/user/:user_id/rate", post(handlers::rate_title))
        .route("/api/user/:user_id/watch", post(handlers::add_watch))
        .route("/api/user/:user_id/hybrid", get(handlers::hybrid))
        // Offline evaluation
        .route("/api/evaluate", post(handlers::evaluate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
