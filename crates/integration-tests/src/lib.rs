//! Integration test harness for the multiservice marketing site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p multiservice-integration-tests
//! ```
//!
//! Every [`TestContext`] runs its own storefront on an ephemeral port with:
//!
//! - an in-memory document store standing in for the hosted backend
//! - a [`MockGemini`] server standing in for the Generative Language API
//! - a cookie-enabled client, so the visitor identity survives across requests
//!
//! [`TestContext::with_hosted_backend`] swaps the in-memory store for a
//! [`MockBackend`] serving the Identity Toolkit and Firestore REST endpoints,
//! so bootstrap runs its real sign-in path.
//!
//! # Test Categories
//!
//! - `catalog` - Grid filtering, detail modal, AI benefits and questions
//! - `contact` - Contact form validation and persistence
//! - `assistant` - Recommendation chat and service comparison
//! - `site` - Health checks, testimonials and response headers
//! - `backend` - Sign-in, Firestore writes and the polling listener

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};

use multiservice_core::{Collection, Namespace};
use multiservice_storefront::backend::{
    Document, DocumentStore, EstablishedSession, MemoryDocumentStore,
};
use multiservice_storefront::config::{
    BackendConfig, BackendEndpoints, GeminiConfig, StorefrontConfig,
};
use multiservice_storefront::state::AppState;

/// Application namespace used by every test context.
pub const TEST_APP_ID: &str = "test-app";

/// How the mock Gemini server answers.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A single candidate with this text.
    Text(String),
    /// A well-formed response with no candidates.
    Empty,
    /// A response whose candidates are an explicit `null`.
    NullCandidates,
    /// An error status with a plain-text body.
    Status(u16),
}

/// Local stand-in for the `generateContent` endpoint.
///
/// Records every request body and answers with the configured [`MockReply`].
#[derive(Clone)]
pub struct MockGemini {
    addr: SocketAddr,
    inner: Arc<MockInner>,
}

struct MockInner {
    requests: Mutex<Vec<Value>>,
    reply: Mutex<MockReply>,
}

impl MockGemini {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Gemini listener");
        let addr = listener.local_addr().expect("Failed to read mock address");

        let mock = Self {
            addr,
            inner: Arc::new(MockInner {
                requests: Mutex::new(Vec::new()),
                reply: Mutex::new(MockReply::Text("Gợi ý từ AI".to_string())),
            }),
        };

        let app = Router::new().fallback(generate).with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock Gemini server error");
        });

        mock
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer subsequent requests with `reply`.
    pub fn set_reply(&self, reply: MockReply) {
        *self
            .inner
            .reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = reply;
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    /// Request bodies received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompt text of the most recent request.
    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.requests()
            .last()
            .and_then(|body| body.pointer("/contents/0/parts/0/text"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn reply(&self) -> MockReply {
        self.inner
            .reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn generate(State(mock): State<MockGemini>, Json(body): Json<Value>) -> Response {
    mock.inner
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body);

    match mock.reply() {
        MockReply::Text(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        MockReply::Empty => Json(json!({ "candidates": [] })).into_response(),
        MockReply::NullCandidates => Json(json!({ "candidates": null })).into_response(),
        MockReply::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "mock failure",
        )
            .into_response(),
    }
}

/// Project id the mock backend serves.
pub const TEST_PROJECT_ID: &str = "demo-project";

/// User id returned by anonymous sign-in.
pub const ANONYMOUS_UID: &str = "anon-uid-1";

/// User id returned by the account lookup after custom-token sign-in.
pub const CUSTOM_TOKEN_UID: &str = "custom-uid-1";

/// ID token issued by every sign-in.
pub const ID_TOKEN: &str = "id-token-1";

/// One request received by [`MockBackend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Local stand-in for the hosted backend: Identity Toolkit sign-in and the
/// Firestore REST document endpoints on one port.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    inner: Arc<BackendInner>,
}

struct BackendInner {
    requests: Mutex<Vec<RecordedRequest>>,
    /// Firestore documents returned for every collection listing.
    documents: Mutex<Vec<Value>>,
    reject_sign_in: Mutex<bool>,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock backend address");

        let mock = Self {
            addr,
            inner: Arc::new(BackendInner {
                requests: Mutex::new(Vec::new()),
                documents: Mutex::new(Vec::new()),
                reject_sign_in: Mutex::new(false),
            }),
        };

        let app = Router::new().fallback(backend).with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend server error");
        });

        mock
    }

    /// Backend settings pointing every endpoint at this mock.
    #[must_use]
    pub fn config(&self, custom_token: Option<&str>) -> BackendConfig {
        let url = format!("http://{}", self.addr);

        BackendConfig {
            app_id: Some(TEST_APP_ID.to_string()),
            firebase_config: Some(
                json!({ "apiKey": "test-api-key", "projectId": TEST_PROJECT_ID }).to_string(),
            ),
            initial_auth_token: custom_token.map(|t| SecretString::from(t.to_string())),
            endpoints: BackendEndpoints {
                auth_url: url.clone(),
                token_url: url.clone(),
                firestore_url: url,
            },
        }
    }

    /// Serve a Firestore document from every collection listing.
    pub fn add_document(&self, id: &str, fields: Value) {
        let name = format!(
            "projects/{TEST_PROJECT_ID}/databases/(default)/documents/{}/{id}",
            Namespace::resolve(Some(TEST_APP_ID)).collection_path(Collection::Testimonials)
        );
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(json!({ "name": name, "fields": fields }));
    }

    /// Answer sign-in requests with an error.
    pub fn reject_sign_in(&self) {
        *self
            .inner
            .reject_sign_in
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests whose path ends with `suffix`.
    #[must_use]
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(suffix))
            .collect()
    }

    fn rejects_sign_in(&self) -> bool {
        *self
            .inner
            .reject_sign_in
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn backend(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    mock.inner
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

    let sign_in = |local_id: Option<&str>| {
        let mut body = json!({
            "idToken": ID_TOKEN,
            "refreshToken": "refresh-token-1",
            "expiresIn": "3600"
        });
        if let Some(uid) = local_id {
            body["localId"] = json!(uid);
        }
        Json(body).into_response()
    };

    if path.contains("/accounts:") && mock.rejects_sign_in() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "code": 400, "message": "ADMIN_ONLY_OPERATION" } })),
        )
            .into_response();
    }

    if path.ends_with("/accounts:signUp") {
        sign_in(Some(ANONYMOUS_UID))
    } else if path.ends_with("/accounts:signInWithCustomToken") {
        sign_in(None)
    } else if path.ends_with("/accounts:lookup") {
        Json(json!({ "users": [{ "localId": CUSTOM_TOKEN_UID }] })).into_response()
    } else if path.ends_with("/documents:commit") {
        Json(json!({ "writeResults": [{}], "commitTime": "2024-05-01T08:30:00Z" })).into_response()
    } else if method == Method::GET && path.contains("/documents/") {
        let documents = mock
            .inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Json(json!({ "documents": documents })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// A running storefront wired to in-process fakes.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
    pub store: MemoryDocumentStore,
    pub gemini: MockGemini,
}

impl TestContext {
    /// Start a storefront whose backend session is already established.
    pub async fn new() -> Self {
        let ctx = Self::unstarted().await;

        let namespace = Namespace::resolve(Some(TEST_APP_ID));
        let store: Arc<dyn DocumentStore> = Arc::new(ctx.store.clone());
        assert!(
            ctx.state
                .session()
                .establish(EstablishedSession::local(namespace, Some(store.clone())))
        );
        ctx.state
            .testimonials()
            .attach(store.as_ref(), &ctx.collection_path(Collection::Testimonials));

        ctx
    }

    /// Start a storefront whose identity bootstrap has not run yet.
    ///
    /// No backend connection config is set, so bootstrap would fall back to
    /// the in-memory store.
    pub async fn unstarted() -> Self {
        Self::spawn(local_backend()).await
    }

    /// Start a storefront signed in to `backend` and wait for bootstrap.
    ///
    /// Signs in anonymously, or with `custom_token` when given.
    pub async fn with_hosted_backend(backend: &MockBackend, custom_token: Option<&str>) -> Self {
        let ctx = Self::spawn(backend.config(custom_token)).await;
        multiservice_storefront::start_session(ctx.state.clone()).await;
        ctx
    }

    async fn spawn(backend: BackendConfig) -> Self {
        let gemini = MockGemini::start().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read storefront address");
        let base_url = format!("http://{addr}");

        let state = AppState::new(test_config(addr, &base_url, backend, &gemini))
            .expect("Failed to build application state");

        let app = multiservice_storefront::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Storefront server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            state,
            store: MemoryDocumentStore::new(),
            gemini,
        }
    }

    /// Session identity once bootstrap has resolved.
    #[must_use]
    pub fn session_id(&self) -> String {
        self.state
            .session()
            .get()
            .expect("session established")
            .session_id()
            .to_string()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[must_use]
    pub fn collection_path(&self, collection: Collection) -> String {
        Namespace::resolve(Some(TEST_APP_ID)).collection_path(collection)
    }

    /// Documents written to a collection so far.
    #[must_use]
    pub fn documents(&self, collection: Collection) -> Vec<Document> {
        self.store.documents(&self.collection_path(collection))
    }

    /// GET `path` and return the status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        read(resp).await
    }

    /// POST a form to `path` and return the status and body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed");
        read(resp).await
    }

    /// Wait until the live testimonial feed holds `count` entries.
    pub async fn wait_for_testimonials(&self, count: usize) {
        for _ in 0..100 {
            if self.state.testimonials().current().len() == count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("testimonial feed never reached {count} entries");
    }
}

async fn read(resp: reqwest::Response) -> (StatusCode, String) {
    let status = resp.status();
    let body = resp.text().await.expect("Failed to read response body");
    (status, body)
}

fn local_backend() -> BackendConfig {
    let unreachable = "http://127.0.0.1:9".to_string();

    BackendConfig {
        app_id: Some(TEST_APP_ID.to_string()),
        firebase_config: None,
        initial_auth_token: None,
        endpoints: BackendEndpoints {
            auth_url: unreachable.clone(),
            token_url: unreachable.clone(),
            firestore_url: unreachable,
        },
    }
}

fn test_config(
    addr: SocketAddr,
    base_url: &str,
    backend: BackendConfig,
    gemini: &MockGemini,
) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: base_url.to_string(),
        backend,
        gemini: GeminiConfig::with_base_url(gemini.base_url()),
        testimonials_poll_interval: Duration::from_millis(200),
        category_switch_delay: Duration::ZERO,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
