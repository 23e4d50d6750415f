use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::identity_middleware;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recipes
        .route("/recipes", get(handlers::list_my_recipes).post(handlers::create_recipe))
        .route("/recipes/public", get(handlers::list_public_recipes))
        .route("/recipes/recommend", post(handlers::recommend))
        .route(
            "/recipes/:id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route(
            "/recipes/:id/rating",
            get(handlers::get_rating).post(handlers::submit_rating),
        )
        // Reference data
        .route("/ingredients/autocomplete", get(handlers::autocomplete_ingredients))
        .route("/units", get(handlers::list_units))
        // Profile preferences
        .route("/profile", get(handlers::get_profile).put(handlers::update_profile))
        .layer(from_fn(identity_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
