//! AI assistant chat route handlers.
//!
//! The visitor's message is appended to the transcript before the request is
//! sent; the reply is appended after it resolves, unless the modal was closed
//! in the meantime.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tracing::instrument;

use multiservice_core::{AiFeature, ChatTranscript};

use crate::filters;
use crate::messages;
use crate::middleware::Visitor;
use crate::state::AppState;

/// One rendered chat bubble.
#[derive(Clone)]
pub struct ChatTurnView {
    pub from_user: bool,
    pub text: String,
}

/// Transcript plus an optional notice under it.
#[derive(Clone, Default)]
pub struct TranscriptView {
    pub turns: Vec<ChatTurnView>,
    pub notice: Option<&'static str>,
}

impl TranscriptView {
    #[must_use]
    pub fn from_transcript(transcript: &ChatTranscript) -> Self {
        Self {
            turns: transcript
                .turns()
                .iter()
                .map(|turn| ChatTurnView {
                    from_user: turn.is_user(),
                    text: turn.text.clone(),
                })
                .collect(),
            notice: None,
        }
    }

    #[must_use]
    pub const fn with_notice(mut self, notice: &'static str) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Chat modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_modal.html")]
pub struct ChatModalTemplate {
    pub transcript: TranscriptView,
}

/// Transcript fragment, swapped after each message.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_transcript.html")]
pub struct ChatTranscriptTemplate {
    pub transcript: TranscriptView,
}

/// Chat form data.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Open the chat modal.
///
/// GET /assistant
#[instrument(skip(state, visitor))]
pub async fn modal(State(state): State<AppState>, Visitor(visitor): Visitor) -> impl IntoResponse {
    ChatModalTemplate {
        transcript: TranscriptView::from_transcript(&state.chats().transcript(&visitor)),
    }
}

/// Send one chat message and wait for the recommendation.
///
/// POST /assistant/messages
#[instrument(skip(state, visitor, form))]
pub async fn send(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<MessageForm>,
) -> impl IntoResponse {
    let chats = state.chats();
    let need = form.message.trim();

    if need.is_empty() {
        return ChatTranscriptTemplate {
            transcript: TranscriptView::from_transcript(&chats.transcript(&visitor)),
        };
    }

    let Some(_guard) = state
        .inflight()
        .try_acquire(&visitor, AiFeature::Recommendation)
    else {
        return ChatTranscriptTemplate {
            transcript: TranscriptView::from_transcript(&chats.transcript(&visitor))
                .with_notice(messages::AI_BUSY),
        };
    };

    let epoch = chats.push_user(&visitor, need);
    let reply = state.ai().recommend(state.catalog(), need).await;

    if !chats.push_assistant(&visitor, epoch, reply.text) {
        tracing::debug!("Chat reply arrived after the transcript was reset; dropped");
    }

    ChatTranscriptTemplate {
        transcript: TranscriptView::from_transcript(&chats.transcript(&visitor)),
    }
}

/// Close the chat modal and discard its transcript.
///
/// POST /assistant/close
#[instrument(skip(state, visitor))]
pub async fn close(State(state): State<AppState>, Visitor(visitor): Visitor) -> impl IntoResponse {
    state.chats().reset(&visitor);
    Html("")
}
