//! AI-assisted features built on the Gemini client.
//!
//! Every feature resolves to text the page can show: the model's answer, the
//! feature's fallback when the response had no candidate text, or the
//! feature's error message when the request failed. Nothing here returns an
//! error to the caller.

use tracing::instrument;

use multiservice_core::assistant::{
    benefits_prompt, comparison_prompt, question_prompt, recommendation_prompt, select_pair,
};
use multiservice_core::{AiFeature, Catalog, ComparisonError, Service};

use crate::gemini::{GeminiClient, GeminiError};
use crate::messages;

/// How a completion resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Text produced by the model.
    Generated,
    /// The response carried no candidate text.
    Fallback,
    /// The request failed in transport or returned a non-success status.
    Failed,
}

/// Text to display for one AI request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiReply {
    pub kind: ReplyKind,
    pub text: String,
}

impl AiReply {
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.kind == ReplyKind::Generated
    }

    fn from_result(feature: AiFeature, result: Result<String, GeminiError>) -> Self {
        match result {
            Ok(text) => Self {
                kind: ReplyKind::Generated,
                text,
            },
            Err(GeminiError::NoCandidates) => {
                tracing::warn!(feature = feature.as_str(), "AI response had no candidate text");
                Self {
                    kind: ReplyKind::Fallback,
                    text: messages::ai_fallback(feature).to_owned(),
                }
            }
            Err(e) => {
                tracing::error!(feature = feature.as_str(), error = %e, "AI request failed");
                Self {
                    kind: ReplyKind::Failed,
                    text: messages::ai_error(feature).to_owned(),
                }
            }
        }
    }
}

/// The four AI features of the site.
#[derive(Clone)]
pub struct AiFeatures {
    client: GeminiClient,
}

impl AiFeatures {
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    async fn complete(&self, feature: AiFeature, prompt: &str) -> AiReply {
        let result = self
            .client
            .generate(prompt, feature.generation_config())
            .await;
        AiReply::from_result(feature, result)
    }

    /// Recommend catalog services for a free-form need.
    #[instrument(skip(self, catalog))]
    pub async fn recommend(&self, catalog: &Catalog, need: &str) -> AiReply {
        self.complete(
            AiFeature::Recommendation,
            &recommendation_prompt(catalog, need),
        )
        .await
    }

    /// Compare two services.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError`] without calling the API if the selection
    /// is incomplete, repeated or unknown.
    #[instrument(skip(self, catalog))]
    pub async fn compare(
        &self,
        catalog: &Catalog,
        first: &str,
        second: &str,
    ) -> Result<AiReply, ComparisonError> {
        let (a, b) = select_pair(catalog, first, second)?;
        Ok(self
            .complete(AiFeature::Comparison, &comparison_prompt(a, b))
            .await)
    }

    /// Summarise the key benefits of a service.
    #[instrument(skip(self, service), fields(service = service.id))]
    pub async fn benefits(&self, service: &Service) -> AiReply {
        self.complete(AiFeature::Benefits, &benefits_prompt(service))
            .await
    }

    /// Answer a question from the service description alone.
    #[instrument(skip(self, service), fields(service = service.id))]
    pub async fn answer(&self, service: &Service, question: &str) -> AiReply {
        self.complete(AiFeature::Question, &question_prompt(service, question))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_mapping() {
        let ok = AiReply::from_result(AiFeature::Benefits, Ok("* Nhanh".to_string()));
        assert!(ok.is_generated());
        assert_eq!(ok.text, "* Nhanh");

        let empty = AiReply::from_result(AiFeature::Benefits, Err(GeminiError::NoCandidates));
        assert_eq!(empty.kind, ReplyKind::Fallback);
        assert_eq!(empty.text, messages::ai_fallback(AiFeature::Benefits));

        let failed = AiReply::from_result(
            AiFeature::Question,
            Err(GeminiError::Status {
                status: 500,
                message: String::new(),
            }),
        );
        assert_eq!(failed.kind, ReplyKind::Failed);
        assert_eq!(failed.text, messages::ai_error(AiFeature::Question));

        let undecodable =
            AiReply::from_result(AiFeature::Comparison, Err(GeminiError::Decode("eof".into())));
        assert_eq!(undecodable.text, messages::ai_error(AiFeature::Comparison));
    }
}
