//! Multiservice storefront library.
//!
//! This crate provides the public marketing site as a library, allowing the
//! router to be driven end to end by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod gemini;
pub mod messages;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use multiservice_core::Collection;

use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full router: pages, fragments, health checks, static files and
/// the middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run identity bootstrap, publish the session and attach the testimonial
/// listener to its store.
///
/// Meant to be spawned at startup; requests are served while it runs.
pub async fn start_session(state: AppState) {
    let config = state.config();
    let established =
        backend::bootstrap(&config.backend, config.testimonials_poll_interval).await;

    let testimonials_path = established.collection_path(Collection::Testimonials);
    let store = established.store().cloned();

    if !state.session().establish(established) {
        return;
    }

    match store {
        Some(store) => state
            .testimonials()
            .attach(store.as_ref(), &testimonials_path),
        None => tracing::warn!("No document store; testimonials stay empty"),
    }
}

/// Detach the testimonial listener and stop the backend session.
pub fn shutdown(state: &AppState) {
    state.testimonials().detach();
    state.session().teardown();
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until identity bootstrap has resolved.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.session().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
