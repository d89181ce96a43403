//! Tests for configuration loading.

use super::*;
use crate::{CharacterConfig, MemoryConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// An empty config reproduces the fixed addressing defaults.
#[test]
fn parse_minimal_config() {
    let config = MnemosConfig::load_from_str("{}").expect("config");
    assert_eq!(config.memory, MemoryConfig::default());
    assert_eq!(config.memory.stm_max_results, 15);
    assert_eq!(
        config.memory.namespaces.summary,
        "conversations/{actorId}/{sessionId}/summary"
    );
    assert_eq!(config.memory.namespaces.preference, "users/{actorId}/preference");
    assert_eq!(config.memory.namespaces.semantic, "users/{actorId}/semantic");
    assert_eq!(config.character, CharacterConfig::default());
    assert_eq!(config.character.assistant_label(), "한시율(AI)");
    assert_eq!(config.persistence.user_label, "사용자");
}

#[test]
fn parses_overrides_with_json5_syntax() {
    let json5 = r#"{
        // comments and trailing commas are fine
        memory: { memory_id: "mem-1", stm_max_results: 5, },
        character: { name: "Ari" },
    }"#;
    let config = MnemosConfig::load_from_str(json5).expect("config");
    assert_eq!(config.memory.memory_id, "mem-1");
    assert_eq!(config.memory.stm_max_results, 5);
    assert_eq!(config.memory.retrieve_top_k, 10);
    assert_eq!(config.character.assistant_label(), "Ari(AI)");
}

/// Reject unexpected keys with the dotted path in the message.
#[test]
fn rejects_unknown_nested_key() {
    let err = MnemosConfig::load_from_str(r#"{ memory: { namespace: {} } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("memory.namespace"), "{msg}");
    assert!(msg.contains("unknown key"), "{msg}");
}

#[test]
fn rejects_wrong_types() {
    let err = MnemosConfig::load_from_str(r#"{ memory: { stm_max_results: -1 } }"#).unwrap_err();
    assert!(format!("{err}").contains("memory.stm_max_results"));

    let err = MnemosConfig::load_from_str(r#"{ memory: { provider: "s3" } }"#).unwrap_err();
    assert!(format!("{err}").contains("unsupported provider"));
}

#[test]
fn rejects_unknown_model_provider() {
    let err = MnemosConfig::load_from_str(r#"{ model: { provider: "anthropic" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("model.provider"), "{msg}");
    assert!(msg.contains("unsupported provider"), "{msg}");

    let config = MnemosConfig::load_from_str(r#"{ model: { provider: "openai", name: "gpt-4.1-mini" } }"#)
        .expect("openai accepted");
    assert_eq!(config.model.name, "gpt-4.1-mini");
}

#[test]
fn validate_rejects_unscoped_namespace() {
    let err = MnemosConfig::load_from_str(r#"{ memory: { namespaces: { semantic: "global" } } }"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = MnemosConfig::load_from_str(r#"{ memory: { stm_max_results: 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn builder_overrides_sections() {
    let config = MnemosConfig::builder()
        .character(CharacterConfig {
            name: "Ari".to_string(),
            ..CharacterConfig::default()
        })
        .build();
    assert_eq!(config.character.name, "Ari");
    assert!(config.validate().is_ok());
}

/// Cwd config overrides the project root, runtime overrides both.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(
        &user_config,
        "{ memory: { memory_id: \"user\", retrieve_top_k: 3 } }",
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        "{ memory: { memory_id: \"project\" }, character: { name: \"Project\" } }",
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ memory: { memory_id: \"cwd\" } }",
    );

    let mut options = LayeredConfigOptions::new(&cwd);
    options.user_config_path = Some(user_config);
    let layered = MnemosConfig::load_layered_with_options(options.clone()).expect("layered");
    assert_eq!(layered.config.memory.memory_id, "cwd");
    assert_eq!(layered.config.memory.retrieve_top_k, 3);
    assert_eq!(layered.config.character.name, "Project");
    let sources = layered
        .layers
        .iter()
        .map(|layer| layer.source)
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
        ]
    );

    let runtime_config = root.join("runtime.json5");
    write_json5(&runtime_config, "{ memory: { memory_id: \"runtime\" } }");
    let layered = MnemosConfig::load_layered_with_options(options.with_runtime_path(&runtime_config))
        .expect("layered");
    assert_eq!(layered.config.memory.memory_id, "runtime");
}

/// A missing runtime override is an error, missing local layers are not.
#[test]
fn missing_runtime_layer_fails() {
    let temp = TempDir::new().expect("tmp");
    let mut options = LayeredConfigOptions::new(temp.path());
    options.user_config_path = None;
    let layered = MnemosConfig::load_layered_with_options(options.clone()).expect("layered");
    assert!(layered.layers.is_empty());

    let err = MnemosConfig::load_layered_with_options(
        options.with_runtime_path(temp.path().join("absent.json5")),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn merge_replaces_scalars_and_merges_objects() {
    let mut base = serde_json::json!({ "a": { "b": 1, "c": [1, 2] }, "d": "x" });
    merge_json_values(
        &mut base,
        serde_json::json!({ "a": { "c": [3] }, "d": "y", "e": true }),
    );
    assert_eq!(
        base,
        serde_json::json!({ "a": { "b": 1, "c": [3] }, "d": "y", "e": true })
    );
}
