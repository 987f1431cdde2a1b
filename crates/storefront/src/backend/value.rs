//! Document field values and their Firestore REST encoding.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use multiservice_core::DocumentId;

/// Field map of a document, ordered by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// A field value as seen by the site.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// Placeholder resolved to the commit time by the store.
    ServerTimestamp,
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    /// String field, or `""` if absent or not a string.
    #[must_use]
    pub fn string(&self, field: &str) -> &str {
        self.fields.get(field).and_then(FieldValue::as_str).unwrap_or_default()
    }

    /// Timestamp field, if present.
    #[must_use]
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(FieldValue::as_timestamp)
    }
}

// =============================================================================
// Wire encoding
// =============================================================================

/// Firestore REST `Value`. Exactly one member is set; kinds the site does
/// not use (maps, arrays, references, ...) decode as an empty value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_value: Option<()>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<String>,
}

impl WireValue {
    /// Decode into a [`FieldValue`]. Unparseable scalars become `Null`.
    #[must_use]
    pub fn into_field(self) -> FieldValue {
        if let Some(s) = self.string_value {
            return FieldValue::String(s);
        }
        if let Some(ts) = self.timestamp_value {
            return DateTime::parse_from_rfc3339(&ts)
                .map_or(FieldValue::Null, |dt| FieldValue::Timestamp(dt.with_timezone(&Utc)));
        }
        if let Some(i) = self.integer_value {
            return i.parse().map_or(FieldValue::Null, FieldValue::Integer);
        }
        if let Some(d) = self.double_value {
            return FieldValue::Double(d);
        }
        if let Some(b) = self.boolean_value {
            return FieldValue::Bool(b);
        }
        FieldValue::Null
    }

    /// Encode a field value. Returns `None` for [`FieldValue::ServerTimestamp`],
    /// which is sent as a field transform instead.
    #[must_use]
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        let wire = match value {
            FieldValue::Null => Self {
                null_value: Some(()),
                ..Self::default()
            },
            FieldValue::Bool(b) => Self {
                boolean_value: Some(*b),
                ..Self::default()
            },
            FieldValue::Integer(i) => Self {
                integer_value: Some(i.to_string()),
                ..Self::default()
            },
            FieldValue::Double(d) => Self {
                double_value: Some(*d),
                ..Self::default()
            },
            FieldValue::String(s) => Self {
                string_value: Some(s.clone()),
                ..Self::default()
            },
            FieldValue::Timestamp(ts) => Self {
                timestamp_value: Some(ts.to_rfc3339()),
                ..Self::default()
            },
            FieldValue::ServerTimestamp => return None,
        };
        Some(wire)
    }
}

/// Firestore REST `Document` resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
}

impl WireDocument {
    /// Convert to a [`Document`], taking the id from the last path segment.
    #[must_use]
    pub fn into_document(self) -> Document {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_owned();
        Document {
            id: DocumentId::new(id),
            fields: self
                .fields
                .into_iter()
                .map(|(k, v)| (k, v.into_field()))
                .collect(),
        }
    }
}
