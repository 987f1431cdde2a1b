//! Generative Language API client.
//!
//! One non-streaming `generateContent` call per completion. The caller picks
//! the prompt and sampling preset; this client only deals with transport and
//! the response shape.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use multiservice_core::GenerationConfig;

use crate::config::GeminiConfig;

use super::error::GeminiError;
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_VERSION: &str = "v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut endpoint = Url::parse(&format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        ))?;
        endpoint
            .query_pairs_mut()
            .append_pair("key", config.api_key.expose_secret());

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint,
                model: config.model.clone(),
            }),
        })
    }

    /// Generate a completion for a single user prompt.
    ///
    /// Returns the first candidate's first text part.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Http`] if the request could not be sent
    /// - [`GeminiError::Status`] if the API returned a non-success status
    /// - [`GeminiError::Decode`] if the body was not valid JSON
    /// - [`GeminiError::NoCandidates`] if the body had no candidate text
    #[instrument(skip(self, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest::user_prompt(prompt, generation_config);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Decode(e.without_url().to_string()))?;

        body.first_text()
            .map(str::to_owned)
            .ok_or(GeminiError::NoCandidates)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let client = GeminiClient::new(&GeminiConfig::with_base_url("http://127.0.0.1:9/")).unwrap();
        let endpoint = client.inner.endpoint.as_str();
        assert!(endpoint.starts_with("http://127.0.0.1:9/v1beta/models/gemini-2.0-flash:generateContent"));
        assert!(endpoint.ends_with("?key="));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GeminiClient::new(&GeminiConfig::with_base_url("not a url"));
        assert!(matches!(result, Err(GeminiError::InvalidUrl(_))));
    }
}
