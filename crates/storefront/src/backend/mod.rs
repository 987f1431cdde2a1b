//! Hosted backend integration: identity bootstrap and document storage.
//!
//! # Architecture
//!
//! - [`auth`] exchanges a custom token (or nothing) for a backend identity
//!   and keeps its ID token fresh in the background
//! - [`store`] defines the narrow [`DocumentStore`] interface used by the
//!   rest of the site
//! - [`firestore`] and [`memory`] implement it against the Firestore REST
//!   API and in process respectively
//! - [`session`] ties these together into the process-wide
//!   [`SessionContext`]

pub mod auth;
pub mod firestore;
pub mod memory;
pub mod session;
pub mod store;
pub mod value;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub use auth::{AuthClient, AuthError, AuthSession, TokenSource};
pub use firestore::FirestoreStore;
pub use memory::MemoryDocumentStore;
pub use session::{EstablishedSession, SessionContext, bootstrap};
pub use store::{DocumentStore, Snapshot, SnapshotCallback, StoreError, Subscription};
pub use value::{Document, FieldValue, Fields};

/// Errors raised while establishing the backend session.
///
/// None of these stop the server; they are logged and the site falls back to
/// a locally generated identity.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// `FIREBASE_CONFIG` is not valid JSON.
    #[error("invalid backend config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A required key is missing or blank in the backend config.
    #[error("backend config is missing `{0}`")]
    MissingField(&'static str),

    /// Sign-in failed.
    #[error("sign-in failed: {0}")]
    Auth(#[from] AuthError),

    /// The document store client could not be created.
    #[error("document store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Backend connection settings parsed from `FIREBASE_CONFIG`.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    pub api_key: SecretString,
    pub project_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFirebaseConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
}

impl FirebaseConfig {
    /// Parse the backend connection JSON.
    ///
    /// Keys other than `apiKey` and `projectId` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::InvalidConfig`] for malformed JSON and
    /// [`BootstrapError::MissingField`] if a required key is absent.
    pub fn parse(raw: &str) -> Result<Self, BootstrapError> {
        let parsed: RawFirebaseConfig = serde_json::from_str(raw)?;

        let api_key = parsed
            .api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(BootstrapError::MissingField("apiKey"))?;
        let project_id = parsed
            .project_id
            .filter(|v| !v.trim().is_empty())
            .ok_or(BootstrapError::MissingField("projectId"))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            project_id,
        })
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_firebase_config() {
        let config = FirebaseConfig::parse(
            r#"{"apiKey":"AIza-test","authDomain":"demo.firebaseapp.com","projectId":"demo-project","appId":"1:2:web:3"}"#,
        )
        .unwrap();
        assert_eq!(config.api_key.expose_secret(), "AIza-test");
        assert_eq!(config.project_id, "demo-project");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            FirebaseConfig::parse("{not json"),
            Err(BootstrapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parse_requires_keys() {
        assert!(matches!(
            FirebaseConfig::parse(r#"{"projectId":"p"}"#),
            Err(BootstrapError::MissingField("apiKey"))
        ));
        assert!(matches!(
            FirebaseConfig::parse(r#"{"apiKey":"k","projectId":" "}"#),
            Err(BootstrapError::MissingField("projectId"))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FirebaseConfig::parse(r#"{"apiKey":"AIza-secret","projectId":"p"}"#).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("AIza-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
