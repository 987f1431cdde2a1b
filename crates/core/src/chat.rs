//! Assistant chat transcript.
//!
//! A transcript lives for one opening of the assistant modal. Closing the modal
//! resets it and bumps its epoch, so a reply that arrives afterwards can be
//! recognised as stale and dropped.

use serde::{Deserialize, Serialize};

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    /// Whether the turn was written by the visitor.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Ordered chat history, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    epoch: u64,
    turns: Vec<ChatTurn>,
}

impl ChatTranscript {
    /// Empty transcript whose first epoch is `epoch`.
    #[must_use]
    pub const fn starting_at(epoch: u64) -> Self {
        Self {
            epoch,
            turns: Vec::new(),
        }
    }

    /// Current epoch; changes every time the transcript is reset.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Turns in the order they were sent and received.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append the visitor's message and return the epoch it belongs to.
    pub fn push_user(&mut self, text: impl Into<String>) -> u64 {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            text: text.into(),
        });
        self.epoch
    }

    /// Append the assistant's reply if the transcript has not been reset
    /// since `epoch`.
    ///
    /// Returns `false` (and leaves the transcript untouched) for stale replies.
    pub fn push_assistant(&mut self, epoch: u64, text: impl Into<String>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            text: text.into(),
        });
        true
    }

    /// Discard all turns and start a new epoch.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }
}
