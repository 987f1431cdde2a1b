//! Backend identity: sign-in and ID token refresh.
//!
//! Talks to the Identity Toolkit REST API (anonymous and custom-token
//! sign-in) and to the Secure Token API (refresh). A signed-in
//! [`AuthSession`] keeps its ID token fresh from a background task until it
//! is torn down.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::instrument;
use url::Url;

use multiservice_core::SessionId;

use crate::config::BackendEndpoints;

/// Refresh this many seconds before the ID token expires.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Wait before retrying a failed refresh. Also the shortest gap between refreshes.
const REFRESH_RETRY: Duration = Duration::from_secs(30);

/// Errors from the identity endpoints.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Endpoint could not be built.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Sign-in succeeded but no user id came back.
    #[error("no user id in sign-in response")]
    MissingUserId,
}

/// ID token and the refresh token that renews it.
#[derive(Debug, Clone)]
pub struct IdToken {
    pub id_token: SecretString,
    pub refresh_token: SecretString,
    /// Unix timestamp when the ID token expires.
    pub expires_at: i64,
}

impl IdToken {
    fn new(id_token: String, refresh_token: String, expires_in: &str) -> Result<Self, AuthError> {
        let expires_in: i64 = expires_in
            .parse()
            .map_err(|_| AuthError::Parse(format!("invalid expiresIn: {expires_in}")))?;

        Ok(Self {
            id_token: SecretString::from(id_token),
            refresh_token: SecretString::from(refresh_token),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        })
    }

    /// Time left before the token should be refreshed, never less than
    /// [`REFRESH_RETRY`].
    #[must_use]
    pub fn refresh_in(&self) -> Duration {
        let now = chrono::Utc::now().timestamp();
        let secs = (self.expires_at - REFRESH_MARGIN_SECS - now).max(0);
        Duration::from_secs(secs.unsigned_abs()).max(REFRESH_RETRY)
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub uid: String,
    pub token: IdToken,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomTokenRequest<'a> {
    token: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    #[serde(default)]
    local_id: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// =============================================================================
// Client
// =============================================================================

/// Identity Toolkit / Secure Token API client.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    auth_url: String,
    token_url: String,
    api_key: SecretString,
}

impl AuthClient {
    /// Create a new identity client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoints: &BackendEndpoints, api_key: SecretString) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(AuthClientInner {
                client,
                auth_url: endpoints.auth_url.trim_end_matches('/').to_owned(),
                token_url: endpoints.token_url.trim_end_matches('/').to_owned(),
                api_key,
            }),
        })
    }

    fn endpoint(&self, base: &str, method: &str) -> Result<Url, AuthError> {
        let mut url = Url::parse(&format!("{base}/v1/{method}"))?;
        url.query_pairs_mut()
            .append_pair("key", self.inner.api_key.expose_secret());
        Ok(url)
    }

    /// Create a new anonymous user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is incomplete.
    #[instrument(skip(self))]
    pub async fn sign_in_anonymously(&self) -> Result<SignIn, AuthError> {
        let url = self.endpoint(&self.inner.auth_url, "accounts:signUp")?;
        let response: SignInResponse = self
            .post_json(url, &SignUpRequest {
                return_secure_token: true,
            })
            .await?;

        let uid = response.local_id.ok_or(AuthError::MissingUserId)?;
        let token = IdToken::new(response.id_token, response.refresh_token, &response.expires_in)?;
        Ok(SignIn { uid, token })
    }

    /// Exchange a custom token for a session.
    ///
    /// The custom-token endpoint does not return the user id, so it is
    /// looked up from the new ID token.
    ///
    /// # Errors
    ///
    /// Returns error if the token is rejected or the lookup fails.
    #[instrument(skip(self, custom_token))]
    pub async fn sign_in_with_custom_token(
        &self,
        custom_token: &SecretString,
    ) -> Result<SignIn, AuthError> {
        let url = self.endpoint(&self.inner.auth_url, "accounts:signInWithCustomToken")?;
        let response: SignInResponse = self
            .post_json(url, &CustomTokenRequest {
                token: custom_token.expose_secret(),
                return_secure_token: true,
            })
            .await?;

        let token = IdToken::new(response.id_token, response.refresh_token, &response.expires_in)?;
        let uid = match response.local_id {
            Some(uid) => uid,
            None => self.lookup_uid(&token).await?,
        };
        Ok(SignIn { uid, token })
    }

    async fn lookup_uid(&self, token: &IdToken) -> Result<String, AuthError> {
        let url = self.endpoint(&self.inner.auth_url, "accounts:lookup")?;
        let response: LookupResponse = self
            .post_json(url, &LookupRequest {
                id_token: token.id_token.expose_secret(),
            })
            .await?;

        response
            .users
            .into_iter()
            .next()
            .map(|user| user.local_id)
            .ok_or(AuthError::MissingUserId)
    }

    /// Exchange a refresh token for a new ID token.
    ///
    /// # Errors
    ///
    /// Returns error if the refresh token is rejected.
    #[instrument(skip(self, token))]
    pub async fn refresh(&self, token: &IdToken) -> Result<IdToken, AuthError> {
        let url = self.endpoint(&self.inner.token_url, "token")?;
        let response = self
            .inner
            .client
            .post(url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", token.refresh_token.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Http(e.without_url()))?;

        let response: RefreshResponse = handle_response(response).await?;
        IdToken::new(response.id_token, response.refresh_token, &response.expires_in)
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .inner
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.without_url()))?;

        handle_response(response).await
    }
}

async fn handle_response<T>(response: reqwest::Response) -> Result<T, AuthError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(AuthError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::Parse(e.without_url().to_string()))
}

// =============================================================================
// Session
// =============================================================================

/// Shared access to the current ID token.
#[derive(Clone)]
pub struct TokenSource {
    current: Arc<RwLock<IdToken>>,
}

impl TokenSource {
    #[must_use]
    pub fn new(token: IdToken) -> Self {
        Self {
            current: Arc::new(RwLock::new(token)),
        }
    }

    /// Value for an `Authorization` header.
    pub async fn bearer(&self) -> String {
        format!("Bearer {}", self.current.read().await.id_token.expose_secret())
    }

    async fn get(&self) -> IdToken {
        self.current.read().await.clone()
    }

    async fn set(&self, token: IdToken) {
        *self.current.write().await = token;
    }
}

/// A signed-in backend identity with a running token refresher.
pub struct AuthSession {
    uid: SessionId,
    tokens: TokenSource,
    refresher: AbortHandle,
}

impl AuthSession {
    /// Start keeping `sign_in`'s token fresh.
    #[must_use]
    pub fn start(client: AuthClient, sign_in: SignIn) -> Self {
        let tokens = TokenSource::new(sign_in.token);
        let refresher = tokio::spawn(refresh_loop(client, tokens.clone())).abort_handle();

        Self {
            uid: SessionId::new(sign_in.uid),
            tokens,
            refresher,
        }
    }

    #[must_use]
    pub const fn uid(&self) -> &SessionId {
        &self.uid
    }

    #[must_use]
    pub fn tokens(&self) -> TokenSource {
        self.tokens.clone()
    }

    /// Stop the background refresher.
    pub fn stop(&self) {
        self.refresher.abort();
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.refresher.abort();
    }
}

async fn refresh_loop(client: AuthClient, tokens: TokenSource) {
    loop {
        let current = tokens.get().await;
        tokio::time::sleep(current.refresh_in()).await;

        match client.refresh(&current).await {
            Ok(fresh) => {
                tracing::debug!(expires_at = fresh.expires_at, "ID token refreshed");
                tokens.set(fresh).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "ID token refresh failed");
                tokio::time::sleep(REFRESH_RETRY).await;
            }
        }
    }
}
