//! The document store interface.
//!
//! The site needs exactly two things from its backend database: a live view
//! of one collection and a way to add a document to another. Everything else
//! the hosted service offers stays behind the adapters.

use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::task::JoinHandle;

use multiservice_core::DocumentId;

use super::value::{Document, Fields};

/// Full replacement set of documents delivered on every change.
pub type Snapshot = Vec<Document>;

/// Listener invoked with each new snapshot.
pub type SnapshotCallback = Arc<dyn Fn(Snapshot) + Send + Sync>;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Store endpoint could not be built.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Narrow interface over the hosted document database.
pub trait DocumentStore: Send + Sync {
    /// Start listening to a collection.
    ///
    /// `on_snapshot` is called with the complete document set once the first
    /// read completes and again after every change. Dropping the returned
    /// [`Subscription`] detaches the listener.
    fn subscribe(&self, collection_path: &str, on_snapshot: SnapshotCallback) -> Subscription;

    /// Add a document with a store-assigned id.
    ///
    /// [`super::FieldValue::ServerTimestamp`] fields are resolved by the store.
    fn write<'a>(
        &'a self,
        collection_path: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId, StoreError>>;
}

/// Length of store-assigned document ids.
pub const AUTO_ID_LEN: usize = 20;

/// Generate a random alphanumeric document id.
#[must_use]
pub fn auto_id() -> DocumentId {
    use rand::Rng;

    let id: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect();
    DocumentId::new(id)
}

/// Handle to an active listener. Detaches on drop.
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wrap the task driving a listener.
    #[must_use]
    pub const fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Stop the listener.
    pub fn detach(mut self) {
        self.stop();
    }

    /// Whether the listener task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_id_shape() {
        let a = auto_id();
        let b = auto_id();
        assert_eq!(a.as_str().len(), AUTO_ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_subscription_aborts_on_drop() {
        let task = tokio::spawn(std::future::pending::<()>());
        let subscription = Subscription::new(task);
        assert!(subscription.is_active());

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let watcher = tokio::spawn(async move {
            let _tx = tx;
            std::future::pending::<()>().await;
        });
        let watched = Subscription::new(watcher);
        drop(watched);
        // The task held the sender; aborting it closes the channel.
        assert!(rx.await.is_err());

        subscription.detach();
    }
}
