//! Contact form route handlers.
//!
//! The form is re-rendered after every submit: cleared with a success message,
//! or with its values intact and an error message so the visitor can retry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use tracing::instrument;

use multiservice_core::ContactForm;

use crate::error::add_breadcrumb;
use crate::messages;
use crate::services::{ContactOutcome, contact};
use crate::state::AppState;

/// Feedback line under the form.
#[derive(Clone)]
pub struct Feedback {
    pub text: &'static str,
    pub success: bool,
}

/// Contact form state for templates.
#[derive(Clone, Default)]
pub struct ContactFormView {
    pub form: ContactForm,
    pub feedback: Option<Feedback>,
}

impl ContactFormView {
    /// Form after a submit attempt.
    #[must_use]
    pub fn after_submit(form: ContactForm, outcome: &ContactOutcome) -> Self {
        let (form, text, success) = match outcome {
            ContactOutcome::Sent(_) => (ContactForm::default(), messages::CONTACT_SUCCESS, true),
            ContactOutcome::NotReady => (form, messages::CONTACT_NOT_READY, false),
            ContactOutcome::Invalid(e) => (form, messages::contact_error(*e), false),
            ContactOutcome::Failed => (form, messages::CONTACT_FAILURE, false),
        };
        Self {
            form,
            feedback: Some(Feedback { text, success }),
        }
    }
}

/// Contact form fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate {
    pub contact: ContactFormView,
}

/// Submit a contact request.
///
/// POST /contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    add_breadcrumb("contact", "Contact form submitted", None);

    let outcome = contact::submit(state.session(), &form).await;

    ContactFormTemplate {
        contact: ContactFormView::after_submit(form, &outcome),
    }
}
