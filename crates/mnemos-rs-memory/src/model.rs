//! Record shapes exchanged with a memory store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw short-term event as returned by a store.
///
/// Nominally `{payload: [{conversational: {role, content: {text}}}]}`, but the
/// shape is not guaranteed; consumers must parse defensively.
pub type EventRecord = serde_json::Value;

/// Raw long-term record as returned by a store.
///
/// Nominally `{content: {text}}`, with the same caveat as [`EventRecord`].
pub type MemoryRecord = serde_json::Value;

/// Role label attached to each message of a persisted event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventRole {
    /// Human side of the exchange.
    User,
    /// Model side of the exchange.
    Assistant,
}

impl EventRole {
    /// Wire label for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventRole::User => "USER",
            EventRole::Assistant => "ASSISTANT",
        }
    }
}

impl fmt::Display for EventRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged message inside an appended event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventMessage {
    /// Message text, already carrying any speaker prefix.
    pub text: String,
    /// Role label.
    pub role: EventRole,
}

impl EventMessage {
    pub fn new(text: impl Into<String>, role: EventRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}
