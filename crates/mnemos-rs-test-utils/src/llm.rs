use async_trait::async_trait;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatResponse, StructuredOutputFormat, Tool};
use autoagents_llm::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
use autoagents_llm::embedding::EmbeddingProvider;
use autoagents_llm::error::LLMError;
use autoagents_llm::models::ModelsProvider;
use autoagents_llm::{LLMProvider, ToolCall};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FixedChatResponse {
    text: String,
}

impl FixedChatResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for FixedChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl ChatResponse for FixedChatResponse {
    fn text(&self) -> Option<String> {
        Some(self.text.clone())
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct FixedLLM {
    response: String,
}

impl FixedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FixedLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        Ok(Box::new(FixedChatResponse::new(self.response.clone())))
    }
}

#[async_trait]
impl CompletionProvider for FixedLLM {
    async fn complete(
        &self,
        _req: &CompletionRequest,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<CompletionResponse, LLMError> {
        Ok(CompletionResponse {
            text: "mock completion".to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FixedLLM {
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, LLMError> {
        Ok(input.into_iter().map(|_| vec![0.0, 0.0]).collect())
    }
}

#[async_trait]
impl ModelsProvider for FixedLLM {}

impl LLMProvider for FixedLLM {}

/// Replies with a fixed text and keeps every message list it was sent.
#[derive(Debug, Clone)]
pub struct RecordingChatLLM {
    response: String,
    pub calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl RecordingChatLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.calls.lock().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for RecordingChatLLM {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.calls.lock().push(messages.to_vec());
        Ok(Box::new(FixedChatResponse::new(self.response.clone())))
    }
}

#[async_trait]
impl CompletionProvider for RecordingChatLLM {
    async fn complete(
        &self,
        _req: &CompletionRequest,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<CompletionResponse, LLMError> {
        Err(LLMError::ProviderError("recording".to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingChatLLM {
    async fn embed(&self, _input: Vec<String>) -> Result<Vec<Vec<f32>>, LLMError> {
        Err(LLMError::ProviderError("recording".to_string()))
    }
}

#[async_trait]
impl ModelsProvider for RecordingChatLLM {}

impl LLMProvider for RecordingChatLLM {}

#[derive(Debug, Clone)]
pub struct FailingLLM {
    message: String,
}

impl FailingLLM {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FailingLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        Err(LLMError::ProviderError(self.message.clone()))
    }
}

#[async_trait]
impl CompletionProvider for FailingLLM {
    async fn complete(
        &self,
        _req: &CompletionRequest,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<CompletionResponse, LLMError> {
        Err(LLMError::ProviderError(self.message.clone()))
    }
}

#[async_trait]
impl EmbeddingProvider for FailingLLM {
    async fn embed(&self, _input: Vec<String>) -> Result<Vec<Vec<f32>>, LLMError> {
        Err(LLMError::ProviderError(self.message.clone()))
    }
}

#[async_trait]
impl ModelsProvider for FailingLLM {}

impl LLMProvider for FailingLLM {}
