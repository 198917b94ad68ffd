//! Route configuration and setup

use crate::constants::MAX_INGEST_BODY_BYTES;
use crate::error::expose_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let body_limit = usize::try_from(MAX_INGEST_BODY_BYTES).unwrap_or(usize::MAX);

    // correlation_id is filled in by the ingest handler once the form is decoded.
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            correlation_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/ingest",
            post(handlers::ingest::ingest)
                .layer::<_, Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .route("/{id}", get(handlers::metacard::get_metacard))
        .layer(middleware::map_response_with_state(
            state.clone(),
            expose_error_details,
        ))
        .with_state(state)
        .layer(trace_layer)
}
