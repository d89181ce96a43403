//! Conversation history model shared with the host runtime.

use serde::{Deserialize, Serialize};

/// Speaker role for a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored message (including tool results fed back to the model).
    User,
    /// Assistant-authored message.
    Assistant,
}

/// One part of a message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text(String),
    /// Result of a tool call, returned to the model on the user side.
    ToolResult { tool_use_id: String, output: String },
}

/// Message stored in the live conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Role that produced the message.
    pub role: Role,
    /// Ordered content parts.
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Text message from the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    /// Text message from the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    /// Tool result delivered on the user side.
    pub fn tool_result(tool_use_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::ToolResult {
                tool_use_id: tool_use_id.into(),
                output: output.into(),
            }],
        }
    }

    /// Text of the first content part, when that part is text.
    pub fn text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentPart::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether the message leads with a tool-result marker.
    pub fn is_tool_result(&self) -> bool {
        matches!(self.content.first(), Some(ContentPart::ToolResult { .. }))
    }

    /// A user message typed by a human: user role with leading text.
    pub fn is_fresh_user_utterance(&self) -> bool {
        self.role == Role::User && self.text().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentPart, Message, Role};
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_user_utterance_requires_leading_text() {
        assert!(Message::user("hi").is_fresh_user_utterance());
        assert!(!Message::assistant("hi").is_fresh_user_utterance());

        let tool = Message::tool_result("call_1", "42");
        assert!(tool.is_tool_result());
        assert!(!tool.is_fresh_user_utterance());

        let empty = Message {
            role: Role::User,
            content: Vec::new(),
        };
        assert!(!empty.is_fresh_user_utterance());
    }

    #[test]
    fn text_reads_first_part_only() {
        let message = Message {
            role: Role::User,
            content: vec![
                ContentPart::ToolResult {
                    tool_use_id: "call_1".to_string(),
                    output: "ok".to_string(),
                },
                ContentPart::Text("later".to_string()),
            ],
        };
        assert_eq!(message.text(), None);
        assert_eq!(Message::user("first").text(), Some("first"));
    }

    #[test]
    fn serializes_with_lowercase_roles() {
        let value = serde_json::to_value(Message::assistant("ok")).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "role": "assistant", "content": [{ "text": "ok" }] })
        );
    }
}
