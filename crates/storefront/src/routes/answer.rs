//! AI answer fragment shared by the detail modal and the comparison tool.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;
use crate::services::AiReply;

/// One AI answer box.
///
/// Generated text is rendered as Markdown; fallback, error and validation
/// messages are shown as plain text.
#[derive(Template, WebTemplate)]
#[template(path = "partials/ai_answer.html")]
pub struct AiAnswerTemplate {
    pub heading: &'static str,
    pub text: String,
    pub generated: bool,
}

impl AiAnswerTemplate {
    /// Box for a completed AI request.
    #[must_use]
    pub fn reply(heading: &'static str, reply: AiReply) -> Self {
        Self {
            heading,
            generated: reply.is_generated(),
            text: reply.text,
        }
    }

    /// Box for a message produced without calling the API.
    #[must_use]
    pub fn notice(heading: &'static str, message: &str) -> Self {
        Self {
            heading,
            text: message.to_owned(),
            generated: false,
        }
    }
}
