//! Live testimonial list.
//!
//! Holds the latest testimonial snapshot for rendering. Each snapshot from the
//! store replaces the list wholesale after being re-sorted newest first.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use multiservice_core::Testimonial;
use multiservice_core::testimonial::sort_by_recency;

use crate::backend::{Document, DocumentStore, Snapshot, Subscription};

/// Current testimonials, shared between the listener and the handlers.
#[derive(Clone)]
pub struct TestimonialFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    current: watch::Sender<Arc<Vec<Testimonial>>>,
    subscription: Mutex<Option<Subscription>>,
}

impl Default for TestimonialFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl TestimonialFeed {
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(FeedInner {
                current,
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Listen to `collection_path`, replacing any previous listener.
    ///
    /// The previous listener is detached before the new one is opened.
    pub fn attach(&self, store: &dyn DocumentStore, collection_path: &str) {
        let mut slot = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = slot.take() {
            previous.detach();
            tracing::debug!("Previous testimonial listener detached");
        }

        let feed = Arc::clone(&self.inner);
        *slot = Some(store.subscribe(
            collection_path,
            Arc::new(move |snapshot: Snapshot| {
                let testimonials = from_snapshot(snapshot);
                tracing::debug!(count = testimonials.len(), "Testimonial snapshot received");
                feed.current.send_replace(Arc::new(testimonials));
            }),
        ));

        tracing::info!(collection = %collection_path, "Testimonial listener attached");
    }

    /// Stop listening. The last snapshot stays available.
    pub fn detach(&self) {
        let previous = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.detach();
        }
    }

    /// Latest testimonials, newest first. Empty before the first snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Vec<Testimonial>> {
        Arc::clone(&self.inner.current.borrow())
    }

    /// Receiver notified on every new snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Vec<Testimonial>>> {
        self.inner.current.subscribe()
    }
}

/// Map a document to a testimonial. Missing text fields become empty.
#[must_use]
pub fn from_document(document: &Document) -> Testimonial {
    Testimonial {
        id: document.id.clone(),
        customer_name: document.string("customerName").to_owned(),
        title: document.string("title").to_owned(),
        quote: document.string("quote").to_owned(),
        timestamp: document.timestamp("timestamp"),
    }
}

fn from_snapshot(snapshot: Snapshot) -> Vec<Testimonial> {
    let mut testimonials: Vec<_> = snapshot.iter().map(from_document).collect();
    sort_by_recency(&mut testimonials);
    testimonials
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::backend::{FieldValue, Fields, MemoryDocumentStore};
    use multiservice_core::DocumentId;

    const PATH: &str = "artifacts/test/public/data/testimonials";

    fn doc(id: &str, name: &str, secs: Option<i64>) -> Document {
        let mut fields = Fields::new();
        fields.insert("customerName".to_string(), name.into());
        fields.insert("title".to_string(), "Chủ cửa hàng".into());
        fields.insert("quote".to_string(), "Rất hài lòng".into());
        if let Some(secs) = secs {
            fields.insert(
                "timestamp".to_string(),
                FieldValue::Timestamp(Utc.timestamp_opt(secs, 0).unwrap()),
            );
        }
        Document {
            id: DocumentId::new(id),
            fields,
        }
    }

    async fn wait_for(feed: &TestimonialFeed, len: usize) -> Arc<Vec<Testimonial>> {
        let mut rx = feed.watch();
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let current = rx.borrow_and_update().clone();
                if current.len() == len {
                    return current;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_snapshot_sorted_newest_first_with_missing_timestamps_last() {
        let sorted = from_snapshot(vec![
            doc("old", "A", Some(100)),
            doc("none", "B", None),
            doc("new", "C", Some(300)),
        ]);
        let ids: Vec<_> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
        assert_eq!(sorted[0].customer_name, "C");
    }

    #[tokio::test]
    async fn test_feed_follows_store() {
        let store = MemoryDocumentStore::new();
        let feed = TestimonialFeed::new();
        assert!(feed.current().is_empty());

        feed.attach(&store, PATH);
        store.insert(PATH, doc("a", "An", Some(100)));
        store.insert(PATH, doc("b", "Bình", Some(200)));

        let current = wait_for(&feed, 2).await;
        assert_eq!(current[0].customer_name, "Bình");
    }

    #[tokio::test]
    async fn test_reattach_replaces_listener() {
        let first = MemoryDocumentStore::new();
        let second = MemoryDocumentStore::new();
        let feed = TestimonialFeed::new();

        feed.attach(&first, PATH);
        first.insert(PATH, doc("a", "An", Some(100)));
        wait_for(&feed, 1).await;

        feed.attach(&second, PATH);
        wait_for(&feed, 0).await;

        first.insert(PATH, doc("b", "Bình", Some(200)));
        second.insert(PATH, doc("c", "Cường", Some(300)));
        let current = wait_for(&feed, 1).await;
        assert_eq!(current[0].id.as_str(), "c");

        feed.detach();
    }
}
