//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{ask_handler, health_handler, AppState};
use crate::config::ServerConfig;

/// Create the REST API router.
///
/// Endpoints:
/// - POST /api/ask    - Answer a natural-language stats question
/// - GET  /api/health - Liveness probe
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/api/ask", post(ask_handler))
        .route("/api/health", get(health_handler))
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any);
        router.layer(cors)
    } else {
        router
    }
}
