//! Service catalog route handlers.
//!
//! The grid is re-rendered on every search keystroke and category switch.
//! The detail modal hosts the two single-service AI features.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use multiservice_core::{AiFeature, Catalog, CategoryFilter, Service};

use crate::content::{self, BANNER_FALLBACK_URL, CONTACT_INFO};
use crate::error::{AppError, Result};
use crate::messages;
use crate::middleware::Visitor;
use crate::routes::answer::AiAnswerTemplate;
use crate::state::AppState;

/// Card size used for grid images.
const CARD_IMAGE_SIZE: &str = "600x400";
/// Image size used in the detail modal.
const DETAIL_IMAGE_SIZE: &str = "800x600";

/// A service card in the grid.
#[derive(Clone)]
pub struct ServiceCard {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub image_url: &'static str,
    pub fallback_image_url: String,
}

impl From<&Service> for ServiceCard {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            category: service.category,
            image_url: service.image_url,
            fallback_image_url: content::placeholder_image(CARD_IMAGE_SIZE, service.name),
        }
    }
}

/// A category link in the navigation bar.
#[derive(Clone)]
pub struct CategoryTab {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Everything the grid partials render.
#[derive(Clone)]
pub struct GridView {
    pub category: String,
    pub categories: Vec<CategoryTab>,
    pub search_term: String,
    pub banner_url: &'static str,
    pub banner_fallback_url: &'static str,
    pub services: Vec<ServiceCard>,
    pub empty_message: &'static str,
}

impl GridView {
    /// Filter the catalog and build the grid for `category` and `term`.
    #[must_use]
    pub fn build(catalog: &Catalog, category: &CategoryFilter, term: &str) -> Self {
        let active = category.label();
        let categories = catalog
            .categories()
            .into_iter()
            .map(|label| CategoryTab {
                label,
                href: format!(
                    "/services?category={}&switch=1",
                    urlencoding::encode(label)
                ),
                active: label == active,
            })
            .collect();

        Self {
            category: active.to_owned(),
            categories,
            search_term: term.to_owned(),
            banner_url: content::category_banner(active).unwrap_or(BANNER_FALLBACK_URL),
            banner_fallback_url: BANNER_FALLBACK_URL,
            services: catalog
                .filter(category, term)
                .into_iter()
                .map(ServiceCard::from)
                .collect(),
            empty_message: messages::NO_MATCHING_SERVICES,
        }
    }
}

/// Grid query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub q: String,
    /// `1` when the request comes from a category link.
    #[serde(default)]
    pub switch: Option<String>,
}

impl GridQuery {
    fn is_switch(&self) -> bool {
        self.switch.as_deref() == Some("1")
    }
}

/// Grid fragment template.
///
/// On a category switch it also resets the search box, the navigation and the
/// open detail modal out of band.
#[derive(Template, WebTemplate)]
#[template(path = "partials/service_grid_response.html")]
pub struct ServiceGridTemplate {
    pub grid: GridView,
    pub switched: bool,
}

/// Detail modal data.
#[derive(Clone)]
pub struct ServiceDetailView {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub long_description: &'static str,
    pub image_url: &'static str,
    pub fallback_image_url: String,
    pub phone_href: &'static str,
}

impl From<&Service> for ServiceDetailView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            category: service.category,
            long_description: service.long_description,
            image_url: service.image_url,
            fallback_image_url: content::placeholder_image(DETAIL_IMAGE_SIZE, service.name),
            phone_href: CONTACT_INFO.phone_href,
        }
    }
}

/// Service detail modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/service_detail.html")]
pub struct ServiceDetailTemplate {
    pub service: ServiceDetailView,
}

/// Question form data.
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

/// Heading of the benefits answer.
const BENEFITS_HEADING: &str = "Lợi ích chính:";
/// Heading of the question answer.
const ANSWER_HEADING: &str = "Trả lời từ AI:";

fn find_service<'a>(state: &'a AppState, id: &str) -> Result<&'a Service> {
    state
        .catalog()
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))
}

/// Render the filtered grid.
///
/// GET /services?category=&q=&switch=
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> impl IntoResponse {
    let category = CategoryFilter::parse(&query.category);
    let switched = query.is_switch();

    let term = if switched {
        // Spinner affordance only; the result does not depend on it.
        tokio::time::sleep(state.config().category_switch_delay).await;
        ""
    } else {
        query.q.as_str()
    };

    ServiceGridTemplate {
        grid: GridView::build(state.catalog(), &category, term),
        switched,
    }
}

/// Show the detail modal of one service.
///
/// GET /services/{id}
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let service = find_service(&state, &id)?;
    Ok(ServiceDetailTemplate {
        service: ServiceDetailView::from(service),
    })
}

/// Summarise a service's key benefits.
///
/// POST /services/{id}/benefits
#[instrument(skip(state, visitor))]
pub async fn benefits(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let service = find_service(&state, &id)?;

    let Some(_guard) = state.inflight().try_acquire(&visitor, AiFeature::Benefits) else {
        return Ok(AiAnswerTemplate::notice(BENEFITS_HEADING, messages::AI_BUSY));
    };

    let reply = state.ai().benefits(service).await;
    Ok(AiAnswerTemplate::reply(BENEFITS_HEADING, reply))
}

/// Answer a question about a service from its description.
///
/// POST /services/{id}/ask
#[instrument(skip(state, visitor, form))]
pub async fn ask(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(id): Path<String>,
    Form(form): Form<QuestionForm>,
) -> Result<impl IntoResponse> {
    let service = find_service(&state, &id)?;

    let question = form.question.trim();
    if question.is_empty() {
        return Ok(AiAnswerTemplate::notice(ANSWER_HEADING, messages::QUESTION_EMPTY));
    }

    let Some(_guard) = state.inflight().try_acquire(&visitor, AiFeature::Question) else {
        return Ok(AiAnswerTemplate::notice(ANSWER_HEADING, messages::AI_BUSY));
    };

    let reply = state.ai().answer(service, question).await;
    Ok(AiAnswerTemplate::reply(ANSWER_HEADING, reply))
}
