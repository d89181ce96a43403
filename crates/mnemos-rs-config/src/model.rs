//! Configuration schema for mnemos.

use serde::{Deserialize, Serialize};

/// Placeholder for the actor id inside namespace templates.
pub const ACTOR_PLACEHOLDER: &str = "{actorId}";
/// Placeholder for the session id inside namespace templates.
pub const SESSION_PLACEHOLDER: &str = "{sessionId}";

/// Root config for mnemos.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MnemosConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl MnemosConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MnemosConfigBuilder {
        MnemosConfigBuilder::new()
    }
}

/// Builder for assembling a `MnemosConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MnemosConfigBuilder {
    config: MnemosConfig,
}

impl MnemosConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MnemosConfig::default(),
        }
    }

    /// Replace the memory store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the character configuration.
    pub fn character(mut self, character: CharacterConfig) -> Self {
        self.config.character = character;
        self
    }

    /// Replace the persistence labels.
    pub fn persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.config.persistence = persistence;
        self
    }

    /// Replace the model configuration.
    pub fn model(mut self, model: ModelConfig) -> Self {
        self.config.model = model;
        self
    }

    /// Finalize and return the built `MnemosConfig`.
    pub fn build(self) -> MnemosConfig {
        self.config
    }
}

/// Memory store addressing and retrieval bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_provider")]
    pub provider: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_memory_id")]
    pub memory_id: String,
    #[serde(default = "default_stm_max_results")]
    pub stm_max_results: usize,
    #[serde(default = "default_retrieve_top_k")]
    pub retrieve_top_k: usize,
    #[serde(default)]
    pub namespaces: NamespaceConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            provider: default_memory_provider(),
            path: None,
            memory_id: default_memory_id(),
            stm_max_results: default_stm_max_results(),
            retrieve_top_k: default_retrieve_top_k(),
            namespaces: NamespaceConfig::default(),
        }
    }
}

fn default_memory_provider() -> String {
    "file".to_string()
}

fn default_memory_id() -> String {
    "mnemos-memory".to_string()
}

fn default_stm_max_results() -> usize {
    15
}

fn default_retrieve_top_k() -> usize {
    10
}

/// Namespace templates for the three long-term categories.
///
/// `{actorId}` and `{sessionId}` are substituted per lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceConfig {
    #[serde(default = "default_summary_namespace")]
    pub summary: String,
    #[serde(default = "default_preference_namespace")]
    pub preference: String,
    #[serde(default = "default_semantic_namespace")]
    pub semantic: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            summary: default_summary_namespace(),
            preference: default_preference_namespace(),
            semantic: default_semantic_namespace(),
        }
    }
}

fn default_summary_namespace() -> String {
    "conversations/{actorId}/{sessionId}/summary".to_string()
}

fn default_preference_namespace() -> String {
    "users/{actorId}/preference".to_string()
}

fn default_semantic_namespace() -> String {
    "users/{actorId}/semantic".to_string()
}

/// Persona the assistant speaks as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterConfig {
    #[serde(default = "default_character_name")]
    pub name: String,
    #[serde(default = "default_character_description")]
    pub description: String,
    /// Full system prompt override; the built-in persona prompt is used when unset.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl CharacterConfig {
    /// Speaker label used for the assistant side of persisted events.
    pub fn assistant_label(&self) -> String {
        format!("{}(AI)", self.name)
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            name: default_character_name(),
            description: default_character_description(),
            system_prompt: None,
        }
    }
}

fn default_character_name() -> String {
    "한시율".to_string()
}

fn default_character_description() -> String {
    "전생에 죽음의 신 하데스였으나 현재는 피아노 학원 선생님으로 살고 있습니다.".to_string()
}

/// Labels applied to persisted turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistenceConfig {
    #[serde(default = "default_user_label")]
    pub user_label: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            user_label: default_user_label(),
        }
    }
}

fn default_user_label() -> String {
    "사용자".to_string()
}

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    #[serde(default = "default_model_provider")]
    pub provider: String,
    #[serde(default = "default_model_name")]
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_model_provider(),
            name: default_model_name(),
        }
    }
}

fn default_model_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "gpt-4.1".to_string()
}
