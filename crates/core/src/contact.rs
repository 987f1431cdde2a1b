//! Contact form validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SessionId;

/// Reasons a contact form cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    /// Name, email or message is blank.
    #[error("name, email and message are required")]
    MissingRequiredFields,
}

/// Raw contact form input as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Validate the form and tag it with the session identity.
    ///
    /// Leading and trailing whitespace is trimmed. A blank phone number is
    /// stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingRequiredFields`] if the name, email or
    /// message is blank after trimming.
    pub fn validate(&self, session_id: &SessionId) -> Result<ContactSubmission, ContactError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingRequiredFields);
        }

        let phone = self.phone.trim();

        Ok(ContactSubmission {
            session_id: session_id.clone(),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
            message: message.to_owned(),
        })
    }
}

/// A validated contact request, ready to be written to the store.
///
/// The server timestamp and the document id are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub session_id: SessionId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_tagged_with_session() {
        let session = SessionId::new("uid-1");
        let submission = form(" An ", "an@example.com", "0363798989", "Tư vấn vay")
            .validate(&session)
            .unwrap();
        assert_eq!(submission.session_id, session);
        assert_eq!(submission.name, "An");
        assert_eq!(submission.phone.as_deref(), Some("0363798989"));
    }

    #[test]
    fn test_phone_is_optional() {
        let submission = form("An", "an@example.com", "  ", "Xin chào")
            .validate(&SessionId::new("s"))
            .unwrap();
        assert!(submission.phone.is_none());
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let session = SessionId::new("s");
        for bad in [
            form("", "an@example.com", "", "msg"),
            form("An", "", "", "msg"),
            form("An", "an@example.com", "", ""),
            form("   ", "an@example.com", "", "msg"),
        ] {
            assert_eq!(
                bad.validate(&session),
                Err(ContactError::MissingRequiredFields)
            );
        }
    }

    #[test]
    fn test_default_form_is_empty() {
        let empty = ContactForm::default();
        assert!(empty.name.is_empty() && empty.email.is_empty());
        assert!(empty.phone.is_empty() && empty.message.is_empty());
    }
}
