//! REST API layer: route handlers, DTOs, extractors and router composition.
//!
//! Every route passes through [`crate::auth::require_authentication`];
//! only the routes on the gate's allowlist are reachable without a token.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::auth::require_authentication;

/// Builds the API router with all REST endpoints and the event stream.
///
/// `request_timeout` bounds every route except the stream, which stays
/// open for as long as the client listens.
pub fn build_router(request_timeout: Duration) -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes().layer(TimeoutLayer::new(request_timeout)))
        .merge(handlers::stream::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(openapi::swagger_ui());

    router
}

/// Builds the complete application: routes, authentication gate, tracing
/// and CORS, bound to `state`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router(request_timeout)
        .layer(from_fn_with_state(
            state.gate.clone(),
            require_authentication,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
