//! Service comparison route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use multiservice_core::AiFeature;

use crate::messages;
use crate::middleware::Visitor;
use crate::routes::answer::AiAnswerTemplate;
use crate::state::AppState;

/// Heading of the comparison result.
const RESULT_HEADING: &str = "Kết quả so sánh:";

/// A `<select>` option.
#[derive(Clone)]
pub struct ServiceOption {
    pub id: &'static str,
    pub name: &'static str,
}

/// Comparison modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/compare_modal.html")]
pub struct CompareModalTemplate {
    pub options: Vec<ServiceOption>,
}

/// Comparison form data. Unselected slots arrive as empty strings.
#[derive(Debug, Deserialize)]
pub struct CompareForm {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub second: String,
}

/// Show the comparison modal.
///
/// GET /compare
#[instrument(skip(state))]
pub async fn modal(State(state): State<AppState>) -> impl IntoResponse {
    CompareModalTemplate {
        options: state
            .catalog()
            .services()
            .iter()
            .map(|s| ServiceOption {
                id: s.id,
                name: s.name,
            })
            .collect(),
    }
}

/// Compare two services.
///
/// POST /compare
///
/// An incomplete, repeated or unknown selection is answered with a validation
/// message and never reaches the API.
#[instrument(skip(state, visitor))]
pub async fn compare(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<CompareForm>,
) -> impl IntoResponse {
    let Some(_guard) = state.inflight().try_acquire(&visitor, AiFeature::Comparison) else {
        return AiAnswerTemplate::notice(RESULT_HEADING, messages::AI_BUSY);
    };

    match state
        .ai()
        .compare(state.catalog(), &form.first, &form.second)
        .await
    {
        Ok(reply) => AiAnswerTemplate::reply(RESULT_HEADING, reply),
        Err(e) => {
            tracing::debug!(error = %e, "Comparison selection rejected");
            AiAnswerTemplate::notice(RESULT_HEADING, messages::comparison_error(e))
        }
    }
}
