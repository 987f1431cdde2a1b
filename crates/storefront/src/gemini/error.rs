//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when calling the Generative Language API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// Response was valid but carried no candidate text.
    #[error("response contained no candidate text")]
    NoCandidates,

    /// Configured base URL could not be parsed.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GeminiError {
    /// Whether the failure happened in transport rather than in the response shape.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::NoCandidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_error_display() {
        let err = GeminiError::Status {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 403 - API key not valid");
        assert_eq!(
            GeminiError::NoCandidates.to_string(),
            "response contained no candidate text"
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(GeminiError::Decode("eof".to_string()).is_transport());
        assert!(!GeminiError::NoCandidates.is_transport());
    }
}
