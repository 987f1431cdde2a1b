//! One in-flight AI request per visitor and feature.
//!
//! A second request for the same feature while the first is still running is
//! refused instead of queued. The slot is released when the guard drops, so
//! every exit path of a handler (success, fallback, error, panic) frees it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use multiservice_core::{AiFeature, VisitorId};

type Key = (VisitorId, AiFeature);

/// Registry of running AI requests.
#[derive(Clone, Default)]
pub struct InFlightRequests {
    active: Arc<Mutex<HashSet<Key>>>,
}

impl InFlightRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `visitor` and `feature`.
    ///
    /// Returns `None` if a request for the same pair is already running.
    #[must_use]
    pub fn try_acquire(&self, visitor: &VisitorId, feature: AiFeature) -> Option<InFlightGuard> {
        let key = (visitor.clone(), feature);
        let inserted = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        inserted.then(|| InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    /// Whether a request for the pair is running.
    #[must_use]
    pub fn is_busy(&self, visitor: &VisitorId, feature: AiFeature) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(visitor.clone(), feature))
    }
}

/// Held for the duration of one AI request.
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<Key>>>,
    key: Key,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_request_is_refused_until_release() {
        let inflight = InFlightRequests::new();
        let visitor = VisitorId::new("v1");

        let guard = inflight.try_acquire(&visitor, AiFeature::Comparison);
        assert!(guard.is_some());
        assert!(inflight.is_busy(&visitor, AiFeature::Comparison));
        assert!(inflight.try_acquire(&visitor, AiFeature::Comparison).is_none());

        drop(guard);
        assert!(!inflight.is_busy(&visitor, AiFeature::Comparison));
        assert!(inflight.try_acquire(&visitor, AiFeature::Comparison).is_some());
    }

    #[test]
    fn test_slots_are_per_visitor_and_feature() {
        let inflight = InFlightRequests::new();
        let a = VisitorId::new("a");
        let b = VisitorId::new("b");

        let _chat = inflight.try_acquire(&a, AiFeature::Recommendation);
        assert!(inflight.try_acquire(&a, AiFeature::Benefits).is_some());
        assert!(inflight.try_acquire(&b, AiFeature::Recommendation).is_some());
    }
}
