//! Router assembly: highlight + passage endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - highlight CRUD under `/api/v1/highlights`
/// - passage catalog, rendering and selection resolution under `/api/v1/passages`
/// - selection translation at `/api/v1/translate`
/// - CORS (allow any origin/method/headers) and per-request trace spans
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route(
            "/api/v1/highlights",
            get(http::http_list_highlights).post(http::http_create_highlight),
        )
        .route("/api/v1/highlights/:id", delete(http::http_delete_highlight))
        .route("/api/v1/passages", get(http::http_list_passages))
        .route("/api/v1/passages/:title", get(http::http_get_passage))
        .route("/api/v1/passages/:title/render", get(http::http_render_passage))
        .route("/api/v1/passages/:title/selection", post(http::http_resolve_selection))
        .route("/api/v1/translate", post(http::http_post_translate))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}
