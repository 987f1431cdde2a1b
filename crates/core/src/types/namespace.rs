//! Application namespace and collection paths.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Collections the site reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Customer testimonials (read-only, live query).
    Testimonials,
    /// Contact form submissions (write-only).
    ContactForms,
}

impl Collection {
    /// Collection name as it appears in the document path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Testimonials => "testimonials",
            Self::ContactForms => "contact_forms",
        }
    }
}

/// Application-scoped path prefix under which all collections live.
///
/// Resolved once at startup from the hosting environment; falls back to
/// [`Namespace::DEFAULT`] when the environment does not supply one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Namespace used when the hosting environment provides none.
    pub const DEFAULT: &'static str = "default-app-id";

    /// Resolve the namespace from an optional environment value.
    ///
    /// Blank values are treated as absent.
    #[must_use]
    pub fn resolve(app_id: Option<&str>) -> Self {
        match app_id.map(str::trim) {
            Some(id) if !id.is_empty() => Self(id.to_owned()),
            _ => Self(Self::DEFAULT.to_owned()),
        }
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full document path of a collection inside this namespace.
    ///
    /// ```
    /// use multiservice_core::{Collection, Namespace};
    ///
    /// let ns = Namespace::resolve(Some("my-app"));
    /// assert_eq!(
    ///     ns.collection_path(Collection::Testimonials),
    ///     "artifacts/my-app/public/data/testimonials"
    /// );
    /// ```
    #[must_use]
    pub fn collection_path(&self, collection: Collection) -> String {
        format!("artifacts/{}/public/data/{}", self.0, collection.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_supplied_id() {
        assert_eq!(Namespace::resolve(Some("canvas-123")).as_str(), "canvas-123");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(Namespace::resolve(None).as_str(), Namespace::DEFAULT);
        assert_eq!(Namespace::resolve(Some("   ")).as_str(), Namespace::DEFAULT);
    }

    #[test]
    fn test_contact_forms_path() {
        let ns = Namespace::resolve(None);
        assert_eq!(
            ns.collection_path(Collection::ContactForms),
            "artifacts/default-app-id/public/data/contact_forms"
        );
    }
}
