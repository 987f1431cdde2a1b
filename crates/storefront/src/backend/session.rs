//! Process-wide session context and identity bootstrap.
//!
//! The site signs in to the backend once at startup. Until that resolves the
//! context is "not ready"; afterwards it holds the namespace, the session
//! identity used to tag writes and the document store, and it never changes
//! again for the life of the process. Bootstrap failures are logged and
//! degrade to a locally generated identity without a store.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use multiservice_core::{Collection, Namespace, SessionId};

use crate::config::BackendConfig;

use super::BootstrapError;
use super::FirebaseConfig;
use super::auth::{AuthClient, AuthSession};
use super::firestore::FirestoreStore;
use super::memory::MemoryDocumentStore;
use super::store::DocumentStore;

/// Outcome of identity bootstrap.
pub struct EstablishedSession {
    namespace: Namespace,
    session_id: SessionId,
    store: Option<Arc<dyn DocumentStore>>,
    auth: Option<AuthSession>,
}

impl EstablishedSession {
    /// Session with a random local identity and no backend sign-in.
    #[must_use]
    pub fn local(namespace: Namespace, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            namespace,
            session_id: SessionId::random(),
            store,
            auth: None,
        }
    }

    /// Session signed in to the backend.
    #[must_use]
    pub fn signed_in(namespace: Namespace, auth: AuthSession, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            namespace,
            session_id: auth.uid().clone(),
            store: Some(store),
            auth: Some(auth),
        }
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Document store, if the backend connection could be set up.
    #[must_use]
    pub fn store(&self) -> Option<&Arc<dyn DocumentStore>> {
        self.store.as_ref()
    }

    /// Full path of a collection within this session's namespace.
    #[must_use]
    pub fn collection_path(&self, collection: Collection) -> String {
        self.namespace.collection_path(collection)
    }

    fn teardown(&self) {
        if let Some(auth) = &self.auth {
            auth.stop();
        }
    }
}

/// Process-wide holder for the established session.
///
/// Set exactly once; readers see either nothing (not ready) or the final
/// session.
#[derive(Default)]
pub struct SessionContext {
    established: OnceLock<EstablishedSession>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bootstrap outcome.
    ///
    /// Returns `false` (and drops `session`) if a session was already
    /// established.
    pub fn establish(&self, session: EstablishedSession) -> bool {
        let accepted = self.established.set(session).is_ok();
        if !accepted {
            tracing::warn!("Session already established; ignoring second bootstrap result");
        }
        accepted
    }

    /// The established session, once bootstrap has resolved.
    #[must_use]
    pub fn get(&self) -> Option<&EstablishedSession> {
        self.established.get()
    }

    /// Whether bootstrap has resolved (successfully or not).
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.established.get().is_some()
    }

    /// Stop the background token refresher.
    pub fn teardown(&self) {
        if let Some(session) = self.established.get() {
            session.teardown();
            tracing::info!("Backend session torn down");
        }
    }
}

/// Establish the backend session from hosting-environment inputs.
///
/// Never fails: without `FIREBASE_CONFIG` the site runs on an in-memory
/// store, and any parse or sign-in error yields a local identity with no
/// store.
#[tracing::instrument(skip_all)]
pub async fn bootstrap(config: &BackendConfig, poll_interval: Duration) -> EstablishedSession {
    let namespace = Namespace::resolve(config.app_id.as_deref());

    let Some(raw) = config.firebase_config.as_deref() else {
        tracing::warn!(namespace = %namespace, "FIREBASE_CONFIG not set, using in-memory document store");
        return EstablishedSession::local(namespace, Some(Arc::new(MemoryDocumentStore::new())));
    };

    match connect(raw, config, namespace.clone(), poll_interval).await {
        Ok(session) => {
            tracing::info!(
                namespace = %session.namespace(),
                session_id = %session.session_id(),
                "Backend session established"
            );
            session
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity bootstrap failed, using local identity");
            EstablishedSession::local(namespace, None)
        }
    }
}

async fn connect(
    raw: &str,
    config: &BackendConfig,
    namespace: Namespace,
    poll_interval: Duration,
) -> Result<EstablishedSession, BootstrapError> {
    let firebase = FirebaseConfig::parse(raw)?;
    let client = AuthClient::new(&config.endpoints, firebase.api_key.clone())?;

    let sign_in = match &config.initial_auth_token {
        Some(token) => client.sign_in_with_custom_token(token).await?,
        None => client.sign_in_anonymously().await?,
    };

    let auth = AuthSession::start(client, sign_in);
    let store = FirestoreStore::new(
        &config.endpoints.firestore_url,
        &firebase.project_id,
        auth.tokens(),
        poll_interval,
    )?;

    Ok(EstablishedSession::signed_in(namespace, auth, Arc::new(store)))
}
