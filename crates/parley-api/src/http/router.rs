//! Axum router configuration with middleware.
//!
//! API routes are under `/api/v1/`; `/` describes the service.
//! Middleware: CORS (any origin) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/history",
            get(handlers::history::get_history).delete(handlers::history::clear_history),
        )
        .route("/stats", get(handlers::stats::get_stats))
        .route("/health", get(handlers::health::health))
        .route(
            "/cache",
            get(handlers::cache::get_cache_stats).delete(handlers::cache::clear_cache),
        )
        .route("/rate-limit", get(handlers::rate_limit::get_rate_limit))
        .route(
            "/memory",
            get(handlers::memory::get_memory).delete(handlers::memory::clear_memory),
        );

    Router::new()
        .route("/", get(handlers::root::root))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
