//! Per-session conversational state: identity, transcript, and the two
//! session flavors built on them (chat and interview).
//!
//! A session object exclusively owns its transcript and lifecycle state; no
//! two sessions share mutable state, and nothing here touches the network
//! except through the injected `dyn Engine`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod chat;
pub mod interview;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Chat,
    Interview,
}

impl SessionKind {
    fn prefix(&self) -> &'static str {
        match self {
            SessionKind::Chat => "chat",
            SessionKind::Interview => "interview",
        }
    }
}

/// Opaque per-interaction token, generated client-side with no network call
/// and immutable for the lifetime of the session object. The kind prefix is
/// for log readability; the uuid carries the uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate(kind: SessionKind) -> Self {
        SessionId(format!("{}-{}", kind.prefix(), Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        SessionId(raw.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in a transcript.
///
/// `provisional` marks a user turn that was appended optimistically and not
/// yet confirmed by a successful exchange; it is how a retry avoids
/// duplicating the user's message. `is_terminal` is true only for the
/// assistant turn carrying a final interview score.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub confidence: Option<f64>,
    pub escalated: Option<bool>,
    pub is_terminal: bool,
    pub provisional: bool,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: content.into(),
            confidence: None,
            escalated: None,
            is_terminal: false,
            provisional: false,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
            confidence: None,
            escalated: None,
            is_terminal: false,
            provisional: false,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only ordered log of turns. Append is the only mutation; turns are
/// never edited, removed, or reordered, so insertion order is both the
/// display order and the logical order.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn and returns its index.
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Clears the provisional mark on the turn at `index` once its exchange
    /// has completed successfully.
    pub(crate) fn confirm(&mut self, index: usize) {
        if let Some(turn) = self.turns.get_mut(index) {
            turn.provisional = false;
        }
    }

    /// Replaces the whole transcript during one-time history hydration.
    pub(crate) fn replace_all(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }
}
