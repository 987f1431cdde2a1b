//! In-process document store.
//!
//! Backs local development when no hosted backend is configured, and the
//! test suites. Every collection is a `watch` channel holding its current
//! document set; listeners receive the full set on every change.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::watch;

use multiservice_core::DocumentId;

use super::store::{DocumentStore, Snapshot, SnapshotCallback, StoreError, Subscription, auto_id};
use super::value::{Document, FieldValue, Fields};

/// Document store held entirely in memory.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<Mutex<HashMap<String, watch::Sender<Snapshot>>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, collection_path: &str) -> watch::Sender<Snapshot> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection_path.to_owned())
            .or_insert_with(|| watch::channel(Vec::new()).0)
            .clone()
    }

    /// Insert a document as if written by another client.
    ///
    /// Replaces any document with the same id.
    pub fn insert(&self, collection_path: &str, document: Document) {
        self.channel(collection_path).send_modify(|docs| {
            docs.retain(|d| d.id != document.id);
            docs.push(document);
        });
    }

    /// Current documents of a collection, in insertion order.
    #[must_use]
    pub fn documents(&self, collection_path: &str) -> Snapshot {
        self.channel(collection_path).borrow().clone()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn subscribe(&self, collection_path: &str, on_snapshot: SnapshotCallback) -> Subscription {
        let mut rx = self.channel(collection_path).subscribe();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = rx.borrow_and_update().clone();
                on_snapshot(snapshot);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Subscription::new(task)
    }

    fn write<'a>(
        &'a self,
        collection_path: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId, StoreError>> {
        Box::pin(async move {
            let now = Utc::now();
            let fields = fields
                .into_iter()
                .map(|(k, v)| match v {
                    FieldValue::ServerTimestamp => (k, FieldValue::Timestamp(now)),
                    other => (k, other),
                })
                .collect();

            let id = auto_id();
            self.insert(
                collection_path,
                Document {
                    id: id.clone(),
                    fields,
                },
            );
            Ok(id)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    const PATH: &str = "artifacts/test/public/data/testimonials";

    fn listen(store: &MemoryDocumentStore) -> (Subscription, mpsc::UnboundedReceiver<Snapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = store.subscribe(
            PATH,
            Arc::new(move |snapshot| {
                let _ = tx.send(snapshot);
            }),
        );
        (subscription, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Snapshot>) -> Snapshot {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_snapshot_is_delivered_immediately() {
        let store = MemoryDocumentStore::new();
        let (_subscription, mut rx) = listen(&store);
        assert!(next(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_resolves_server_timestamp_and_notifies() {
        let store = MemoryDocumentStore::new();
        let (_subscription, mut rx) = listen(&store);
        let _ = next(&mut rx).await;

        let mut fields = Fields::new();
        fields.insert("customerName".to_string(), "An".into());
        fields.insert("timestamp".to_string(), FieldValue::ServerTimestamp);
        let id = store.write(PATH, fields).await.unwrap();

        let snapshot = next(&mut rx).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert!(snapshot[0].timestamp("timestamp").is_some());
        assert_eq!(id.as_str().len(), 20);
    }

    #[tokio::test]
    async fn test_detached_listener_receives_nothing() {
        let store = MemoryDocumentStore::new();
        let (subscription, mut rx) = listen(&store);
        let _ = next(&mut rx).await;

        subscription.detach();
        store.insert(
            PATH,
            Document {
                id: DocumentId::new("late"),
                fields: Fields::new(),
            },
        );

        // The callback (and with it the sender) is dropped with the task.
        assert!(rx.recv().await.is_none());
    }
}
