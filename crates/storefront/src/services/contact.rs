//! Contact form submission.

use tracing::instrument;

use multiservice_core::{Collection, ContactError, ContactForm, ContactSubmission, DocumentId};

use crate::backend::{FieldValue, Fields, SessionContext};

/// Result of one submit click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Bootstrap has not resolved, or resolved without a document store.
    NotReady,
    /// Validation failed; nothing was written.
    Invalid(ContactError),
    /// The document was written.
    Sent(DocumentId),
    /// The write failed; the visitor may retry.
    Failed,
}

/// Document fields for a submission.
///
/// A missing phone number is stored as an empty string.
#[must_use]
pub fn submission_fields(submission: &ContactSubmission) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        "userId".to_string(),
        submission.session_id.as_str().into(),
    );
    fields.insert("name".to_string(), submission.name.as_str().into());
    fields.insert("email".to_string(), submission.email.as_str().into());
    fields.insert(
        "phone".to_string(),
        submission.phone.as_deref().unwrap_or_default().into(),
    );
    fields.insert("message".to_string(), submission.message.as_str().into());
    fields.insert("timestamp".to_string(), FieldValue::ServerTimestamp);
    fields
}

/// Validate and write a contact request. At most one write per call.
#[instrument(skip_all)]
pub async fn submit(context: &SessionContext, form: &ContactForm) -> ContactOutcome {
    let Some(session) = context.get() else {
        tracing::warn!("Contact form submitted before identity bootstrap resolved");
        return ContactOutcome::NotReady;
    };
    let Some(store) = session.store() else {
        tracing::warn!("Contact form submitted without a document store");
        return ContactOutcome::NotReady;
    };

    let submission = match form.validate(session.session_id()) {
        Ok(submission) => submission,
        Err(e) => return ContactOutcome::Invalid(e),
    };

    let path = session.collection_path(Collection::ContactForms);
    match store.write(&path, submission_fields(&submission)).await {
        Ok(id) => {
            tracing::info!(document_id = %id, "Contact request stored");
            ContactOutcome::Sent(id)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store contact request");
            ContactOutcome::Failed
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::{EstablishedSession, MemoryDocumentStore};
    use multiservice_core::Namespace;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            message: message.to_string(),
        }
    }

    fn ready_context(store: &MemoryDocumentStore) -> SessionContext {
        let context = SessionContext::new();
        context.establish(EstablishedSession::local(
            Namespace::resolve(Some("test-app")),
            Some(Arc::new(store.clone())),
        ));
        context
    }

    const PATH: &str = "artifacts/test-app/public/data/contact_forms";

    #[tokio::test]
    async fn test_not_ready_before_bootstrap() {
        let outcome = submit(&SessionContext::new(), &form("An", "a@b.vn", "Hi")).await;
        assert_eq!(outcome, ContactOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_not_ready_without_store() {
        let context = SessionContext::new();
        context.establish(EstablishedSession::local(Namespace::resolve(None), None));
        let outcome = submit(&context, &form("An", "a@b.vn", "Hi")).await;
        assert_eq!(outcome, ContactOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_missing_fields_never_write() {
        let store = MemoryDocumentStore::new();
        let context = ready_context(&store);

        for bad in [form("", "a@b.vn", "Hi"), form("An", " ", "Hi"), form("An", "a@b.vn", "")] {
            assert_eq!(
                submit(&context, &bad).await,
                ContactOutcome::Invalid(ContactError::MissingRequiredFields)
            );
        }
        assert!(store.documents(PATH).is_empty());
    }

    #[tokio::test]
    async fn test_valid_submission_writes_one_tagged_document() {
        let store = MemoryDocumentStore::new();
        let context = ready_context(&store);
        let session_id = context.get().unwrap().session_id().clone();

        let outcome = submit(&context, &form("An", "an@example.com", "Tư vấn vay")).await;
        let ContactOutcome::Sent(id) = outcome else {
            panic!("expected Sent, got {outcome:?}");
        };

        let docs = store.documents(PATH);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].string("userId"), session_id.as_str());
        assert_eq!(docs[0].string("phone"), "");
        assert!(docs[0].timestamp("timestamp").is_some());
    }
}
