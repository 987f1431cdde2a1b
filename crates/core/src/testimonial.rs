//! Customer testimonials.
//!
//! Testimonials are created out of band in the shared collection; the site only
//! reads them. The live query is unordered, so every snapshot is re-sorted here.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::DocumentId;

/// A customer testimonial as displayed on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: DocumentId,
    pub customer_name: String,
    /// Customer's role or company, shown under the name.
    pub title: String,
    pub quote: String,
    /// Server-assigned creation time; absent on documents written without one.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Testimonial {
    /// Milliseconds since the epoch, treating a missing timestamp as the epoch.
    #[must_use]
    pub fn recency_key(&self) -> i64 {
        self.timestamp.map_or(0, |ts| ts.timestamp_millis())
    }
}

/// Sort testimonials newest first.
///
/// Documents without a timestamp sort as the oldest. The sort is stable, so
/// ties keep the order in which the snapshot delivered them.
pub fn sort_by_recency(testimonials: &mut [Testimonial]) {
    testimonials.sort_by_key(|t| Reverse(t.recency_key()));
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn testimonial(id: &str, at: Option<i64>) -> Testimonial {
        Testimonial {
            id: DocumentId::new(id),
            customer_name: format!("Khách {id}"),
            title: String::new(),
            quote: "Dịch vụ rất tốt".to_string(),
            timestamp: at.and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }

    #[test]
    fn test_sorts_newest_first() {
        let mut items = vec![
            testimonial("old", Some(1_000)),
            testimonial("new", Some(3_000)),
            testimonial("mid", Some(2_000)),
        ];
        sort_by_recency(&mut items);
        let order: Vec<_> = items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_missing_timestamp_sorts_last() {
        let mut items = vec![
            testimonial("none", None),
            testimonial("dated", Some(10)),
        ];
        sort_by_recency(&mut items);
        assert_eq!(items[1].id.as_str(), "none");
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let mut items = vec![
            testimonial("a", None),
            testimonial("b", Some(5)),
            testimonial("c", None),
        ];
        sort_by_recency(&mut items);
        let order: Vec<_> = items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_recency_key_defaults_to_epoch() {
        assert_eq!(testimonial("x", None).recency_key(), 0);
        assert_eq!(testimonial("y", Some(2)).recency_key(), 2_000);
    }
}
