//! Testimonials fragment, polled by the home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use multiservice_core::Testimonial;

use crate::messages;
use crate::state::AppState;

/// A testimonial card.
#[derive(Clone)]
pub struct TestimonialView {
    pub customer_name: String,
    pub title: String,
    pub quote: String,
}

impl From<&Testimonial> for TestimonialView {
    fn from(t: &Testimonial) -> Self {
        Self {
            customer_name: t.customer_name.clone(),
            title: t.title.clone(),
            quote: t.quote.clone(),
        }
    }
}

/// Testimonial list with its empty-state text.
#[derive(Clone)]
pub struct TestimonialsView {
    pub items: Vec<TestimonialView>,
    pub loading_message: &'static str,
}

impl TestimonialsView {
    /// Current feed contents, newest first.
    #[must_use]
    pub fn current(state: &AppState) -> Self {
        Self {
            items: state
                .testimonials()
                .current()
                .iter()
                .map(TestimonialView::from)
                .collect(),
            loading_message: messages::TESTIMONIALS_LOADING,
        }
    }
}

/// Testimonials fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/testimonials.html")]
pub struct TestimonialsTemplate {
    pub testimonials: TestimonialsView,
}

/// Latest testimonials.
///
/// GET /testimonials
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    TestimonialsTemplate {
        testimonials: TestimonialsView::current(&state),
    }
}
