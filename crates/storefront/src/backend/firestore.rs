//! Firestore REST adapter.
//!
//! Live queries are served by a polling task: the collection is listed on a
//! fixed interval and a snapshot is delivered on the first successful read
//! and whenever the document set differs from the last one delivered. Writes
//! go through `documents:commit` so the server can stamp `REQUEST_TIME`.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use multiservice_core::DocumentId;

use super::auth::TokenSource;
use super::store::{DocumentStore, Snapshot, SnapshotCallback, StoreError, Subscription, auto_id};
use super::value::{Fields, WireDocument, WireValue};

const PAGE_SIZE: &str = "300";

/// Document store backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreStore {
    inner: Arc<FirestoreStoreInner>,
}

struct FirestoreStoreInner {
    client: reqwest::Client,
    /// `{base}/v1/projects/{project}/databases/(default)/documents`
    documents_url: String,
    /// `projects/{project}/databases/(default)/documents`
    documents_name: String,
    tokens: TokenSource,
    poll_interval: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Write {
    update: WireDocument,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    update_transforms: Vec<FieldTransform>,
    current_document: Precondition,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: String,
    set_to_server_value: &'static str,
}

#[derive(Serialize)]
struct Precondition {
    exists: bool,
}

impl FirestoreStore {
    /// Create a store for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        firestore_url: &str,
        project_id: &str,
        tokens: TokenSource,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let documents_name = format!("projects/{project_id}/databases/(default)/documents");
        let documents_url = format!(
            "{}/v1/{documents_name}",
            firestore_url.trim_end_matches('/')
        );

        Ok(Self {
            inner: Arc::new(FirestoreStoreInner {
                client,
                documents_url,
                documents_name,
                tokens,
                poll_interval,
            }),
        })
    }

    /// Read every document of a collection, following pagination.
    ///
    /// # Errors
    ///
    /// Returns error if a page request fails or cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, collection_path: &str) -> Result<Snapshot, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = Url::parse(&format!("{}/{collection_path}", self.inner.documents_url))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .inner
                .client
                .get(url)
                .header(AUTHORIZATION, self.inner.tokens.bearer().await)
                .send()
                .await?;
            let page: ListDocumentsResponse = handle_response(response).await?;

            documents.extend(page.documents.into_iter().map(WireDocument::into_document));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    fn commit_request(&self, collection_path: &str, id: &DocumentId, fields: &Fields) -> CommitRequest {
        let mut wire_fields = std::collections::BTreeMap::new();
        let mut transforms = Vec::new();

        for (name, value) in fields {
            match WireValue::from_field(value) {
                Some(wire) => {
                    wire_fields.insert(name.clone(), wire);
                }
                None => transforms.push(FieldTransform {
                    field_path: name.clone(),
                    set_to_server_value: "REQUEST_TIME",
                }),
            }
        }

        CommitRequest {
            writes: vec![Write {
                update: WireDocument {
                    name: format!("{}/{collection_path}/{id}", self.inner.documents_name),
                    fields: wire_fields,
                },
                update_transforms: transforms,
                current_document: Precondition { exists: false },
            }],
        }
    }

    #[instrument(skip(self, fields))]
    async fn commit(&self, collection_path: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = auto_id();
        let body = self.commit_request(collection_path, &id, &fields);
        let url = Url::parse(&format!("{}:commit", self.inner.documents_url))?;

        let response = self
            .inner
            .client
            .post(url)
            .header(AUTHORIZATION, self.inner.tokens.bearer().await)
            .json(&body)
            .send()
            .await?;
        let _: serde_json::Value = handle_response(response).await?;

        tracing::info!(collection = %collection_path, document_id = %id, "Document written");
        Ok(id)
    }
}

impl DocumentStore for FirestoreStore {
    fn subscribe(&self, collection_path: &str, on_snapshot: SnapshotCallback) -> Subscription {
        let store = self.clone();
        let path = collection_path.to_owned();

        let task = tokio::spawn(async move {
            let mut last: Option<Snapshot> = None;
            let mut ticker = tokio::time::interval(store.inner.poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match store.list(&path).await {
                    Ok(snapshot) if last.as_ref() != Some(&snapshot) => {
                        on_snapshot(snapshot.clone());
                        last = Some(snapshot);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(collection = %path, error = %e, "Snapshot listener read failed");
                    }
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
        Box::pin(self.commit(collection_path, fields))
    }
}

async fn handle_response<T>(response: reqwest::Response) -> Result<T, StoreError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::auth::IdToken;
    use crate::backend::value::FieldValue;

    fn store() -> FirestoreStore {
        let token = IdToken {
            id_token: "id".to_string().into(),
            refresh_token: "refresh".to_string().into(),
            expires_at: i64::MAX,
        };
        FirestoreStore::new(
            "https://firestore.googleapis.com/",
            "demo-project",
            TokenSource::new(token),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_documents_url() {
        assert_eq!(
            store().inner.documents_url,
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents"
        );
    }

    #[test]
    fn test_commit_request_uses_server_timestamp_transform() {
        let store = store();
        let mut fields = Fields::new();
        fields.insert("userId".to_string(), "uid-1".into());
        fields.insert("phone".to_string(), "".into());
        fields.insert("timestamp".to_string(), FieldValue::ServerTimestamp);

        let id = DocumentId::new("abcdefghijklmnopqrst");
        let body = serde_json::to_value(store.commit_request(
            "artifacts/app/public/data/contact_forms",
            &id,
            &fields,
        ))
        .unwrap();

        let write = &body["writes"][0];
        assert_eq!(
            write["update"]["name"],
            "projects/demo-project/databases/(default)/documents/artifacts/app/public/data/contact_forms/abcdefghijklmnopqrst"
        );
        assert_eq!(write["update"]["fields"]["userId"]["stringValue"], "uid-1");
        assert_eq!(write["update"]["fields"]["phone"]["stringValue"], "");
        assert!(write["update"]["fields"].get("timestamp").is_none());
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "timestamp");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
        assert_eq!(write["currentDocument"]["exists"], false);
    }

    #[test]
    fn test_list_response_pagination_fields() {
        let page: ListDocumentsResponse =
            serde_json::from_str(r#"{"documents":[{"name":"a/b/c","fields":{}}],"nextPageToken":"t"}"#)
                .unwrap();
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("t"));

        let empty: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.documents.is_empty());
        assert!(empty.next_page_token.is_none());
    }
}
