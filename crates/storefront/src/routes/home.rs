//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use multiservice_core::CategoryFilter;

use crate::content::{
    ABOUT, About, CONTACT_INFO, ContactInfo, FAQS, Faq, HERO, Hero, PROCESS_STEPS, ProcessStep,
};
use crate::filters;
use crate::routes::catalog::GridView;
use crate::routes::contact::ContactFormView;
use crate::routes::testimonials::TestimonialsView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: &'static Hero,
    pub about: &'static About,
    pub steps: &'static [ProcessStep],
    pub faqs: &'static [Faq],
    pub contact_info: &'static ContactInfo,
    /// Catalog grid with every category and no search term.
    pub grid: GridView,
    pub testimonials: TestimonialsView,
    pub contact: ContactFormView,
    /// Session identity badge, once bootstrap has resolved.
    pub session_id: Option<String>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        hero: &HERO,
        about: &ABOUT,
        steps: &PROCESS_STEPS,
        faqs: &FAQS,
        contact_info: &CONTACT_INFO,
        grid: GridView::build(state.catalog(), &CategoryFilter::All, ""),
        testimonials: TestimonialsView::current(&state),
        contact: ContactFormView::default(),
        session_id: state
            .session()
            .get()
            .map(|session| session.session_id().to_string()),
    }
}
