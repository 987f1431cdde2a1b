//! Per-visitor assistant transcripts.
//!
//! Transcripts live server-side keyed by [`VisitorId`], so a close request can
//! reset a transcript while a reply for it is still pending in another request.
//! A reset drops the visitor's entry. Epochs come from one counter shared by
//! all transcripts, so a transcript created after a reset never matches a reply
//! issued before it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use multiservice_core::{ChatTranscript, VisitorId};

/// Assistant transcripts of all visitors.
#[derive(Clone, Default)]
pub struct ChatSessions {
    inner: Arc<Mutex<Transcripts>>,
}

#[derive(Default)]
struct Transcripts {
    by_visitor: HashMap<VisitorId, ChatTranscript>,
    next_epoch: u64,
}

impl ChatSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Transcripts> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the visitor's transcript.
    #[must_use]
    pub fn transcript(&self, visitor: &VisitorId) -> ChatTranscript {
        self.lock()
            .by_visitor
            .get(visitor)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a visitor message, returning the epoch the reply must match.
    pub fn push_user(&self, visitor: &VisitorId, text: impl Into<String>) -> u64 {
        let mut inner = self.lock();
        let Transcripts {
            by_visitor,
            next_epoch,
        } = &mut *inner;

        by_visitor
            .entry(visitor.clone())
            .or_insert_with(|| {
                let epoch = *next_epoch;
                *next_epoch = next_epoch.wrapping_add(1);
                ChatTranscript::starting_at(epoch)
            })
            .push_user(text)
    }

    /// Append an assistant reply unless the transcript was reset meanwhile.
    pub fn push_assistant(&self, visitor: &VisitorId, epoch: u64, text: impl Into<String>) -> bool {
        self.lock()
            .by_visitor
            .get_mut(visitor)
            .is_some_and(|t| t.push_assistant(epoch, text))
    }

    /// Discard the visitor's transcript.
    pub fn reset(&self, visitor: &VisitorId) {
        self.lock().by_visitor.remove(visitor);
    }
}
