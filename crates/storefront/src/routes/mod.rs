//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness (identity bootstrap resolved)
//!
//! # Catalog (HTMX fragments)
//! GET  /services                  - Filtered grid (?category=&q=&switch=1)
//! GET  /services/{id}             - Detail modal
//! POST /services/{id}/benefits    - AI key benefits
//! POST /services/{id}/ask         - AI answer to a question (form: question)
//!
//! # Assistant (HTMX fragments)
//! GET  /assistant                 - Chat modal
//! POST /assistant/messages        - Send a message (form: message)
//! POST /assistant/close           - Close and discard the transcript
//!
//! # Comparison (HTMX fragments)
//! GET  /compare                   - Comparison modal
//! POST /compare                   - Compare two services (form: first, second)
//!
//! # Other
//! POST /contact                   - Contact form submission
//! GET  /testimonials              - Testimonials fragment
//! ```

pub mod answer;
pub mod assistant;
pub mod catalog;
pub mod compare;
pub mod contact;
pub mod home;
pub mod testimonials;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::grid))
        .route("/{id}", get(catalog::detail))
        .route("/{id}/benefits", post(catalog::benefits))
        .route("/{id}/ask", post(catalog::ask))
}

/// Create the assistant routes router.
pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assistant::modal))
        .route("/messages", post(assistant::send))
        .route("/close", post(assistant::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/services", catalog_routes())
        .nest("/assistant", assistant_routes())
        .route("/compare", get(compare::modal).post(compare::compare))
        .route("/contact", post(contact::submit))
        .route("/testimonials", get(testimonials::list))
}
