//! Schema validation for mnemos JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
///
/// Every layer is partial: keys may be omitted, but present keys must be known
/// and carry the right type.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "memory", "character", "persistence", "model"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("memory") {
        validate_memory(value, layer, "memory")?;
    }
    if let Some(value) = map.get("character") {
        validate_character(value, layer, "character")?;
    }
    if let Some(value) = map.get("persistence") {
        let map = expect_object(value, layer, "persistence")?;
        ensure_allowed_keys(map, &["user_label"], layer, "persistence")?;
        if let Some(value) = map.get("user_label") {
            expect_string(value, layer, "persistence.user_label")?;
        }
    }
    if let Some(value) = map.get("model") {
        let map = expect_object(value, layer, "model")?;
        ensure_allowed_keys(map, &["provider", "name"], layer, "model")?;
        if let Some(value) = map.get("name") {
            expect_string(value, layer, "model.name")?;
        }
        if let Some(value) = map.get("provider") {
            expect_string(value, layer, "model.provider")?;
            if value.as_str() != Some("openai") {
                return Err(invalid_field(
                    layer,
                    "model.provider",
                    "unsupported provider (expected \"openai\")",
                ));
            }
        }
    }
    Ok(())
}

/// Validate the "memory" block.
fn validate_memory(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "provider",
            "path",
            "memory_id",
            "stm_max_results",
            "retrieve_top_k",
            "namespaces",
        ],
        layer,
        path,
    )?;

    if let Some(value) = map.get("provider") {
        let provider_path = join_path(path, "provider");
        expect_string(value, layer, &provider_path)?;
        if value.as_str() != Some("file") {
            return Err(invalid_field(
                layer,
                &provider_path,
                "unsupported provider (expected \"file\")",
            ));
        }
    }
    if let Some(value) = map.get("path") {
        expect_optional_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("memory_id") {
        expect_string(value, layer, &join_path(path, "memory_id"))?;
    }
    for key in ["stm_max_results", "retrieve_top_k"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("namespaces") {
        let ns_path = join_path(path, "namespaces");
        let ns_map = expect_object(value, layer, &ns_path)?;
        ensure_allowed_keys(ns_map, &["summary", "preference", "semantic"], layer, &ns_path)?;
        for (key, value) in ns_map {
            expect_string(value, layer, &join_path(&ns_path, key))?;
        }
    }
    Ok(())
}

/// Validate the "character" block.
fn validate_character(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["name", "description", "system_prompt"], layer, path)?;
    for key in ["name", "description"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("system_prompt") {
        expect_optional_string(value, layer, &join_path(path, "system_prompt"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON string or null.
fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() || value.is_null() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

/// Expect a non-negative JSON integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
