//! Character agent running the memory hooks around each model call.

use crate::conversation::{ContentPart, Message, Role};
use crate::error::MnemosCoreError;
use crate::hooks::{MemoryHooks, PersistOutcome, RetrievalOutcome};
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatRole, MessageType};
use log::{info, warn};
use std::fmt::Debug;
use std::sync::Arc;

/// Result of one conversational turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Assistant reply text.
    pub response: String,
    /// What the pre-inference phase did.
    pub retrieval: RetrievalOutcome,
    /// What the post-inference phase did.
    pub persistence: PersistOutcome,
}

/// Conversation loop for one actor and session.
pub struct MemoryAgent {
    llm: Arc<dyn LLMProvider>,
    hooks: MemoryHooks,
    system_prompt: String,
    history: Vec<Message>,
}

impl Debug for MemoryAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAgent")
            .field("scope", self.hooks.scope())
            .field("history", &self.history.len())
            .finish()
    }
}

impl MemoryAgent {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        hooks: MemoryHooks,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            hooks,
            system_prompt: system_prompt.into(),
            history: Vec::new(),
        }
    }

    /// Live conversation history, including any injected envelopes.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run one turn: retrieve and inject, call the model, then persist.
    ///
    /// Memory failures never surface here; they are reported in the
    /// [`TurnReport`]. A model failure removes the pending user message and is
    /// returned as [`MnemosCoreError::Model`].
    pub async fn run(&mut self, input: &str) -> Result<TurnReport, MnemosCoreError> {
        self.history.push(Message::user(input));
        let retrieval = self.hooks.before_inference(&mut self.history).await;

        let messages = self.chat_messages();
        let response = match self.llm.chat_with_tools(&messages, None, None).await {
            Ok(response) => response.text().unwrap_or_default(),
            Err(err) => {
                warn!("model call failed: {err}");
                self.history.pop();
                return Err(MnemosCoreError::Model(err.to_string()));
            }
        };

        self.history.push(Message::assistant(response.clone()));
        let persistence = self.hooks.after_inference(&self.history).await;
        info!(
            "turn complete (messages={}, response_len={})",
            self.history.len(),
            response.len()
        );
        Ok(TurnReport {
            response,
            retrieval,
            persistence,
        })
    }

    fn chat_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: ChatRole::System,
                message_type: MessageType::Text,
                content: self.system_prompt.clone(),
            });
        }
        messages.extend(self.history.iter().map(chat_message));
        messages
    }
}

fn chat_message(message: &Message) -> ChatMessage {
    let role = match message.role {
        Role::User => ChatRole::User,
        Role::Assistant => ChatRole::Assistant,
    };
    let content = message
        .content
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => text.as_str(),
            ContentPart::ToolResult { output, .. } => output.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    ChatMessage {
        role,
        message_type: MessageType::Text,
        content,
    }
}
