//! Layered configuration loader.
//!
//! Discovers configuration layers (user/project/cwd/runtime), validates each
//! against the schema, deep-merges them, and produces a final `MnemosConfig`.

mod layer_io;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ACTOR_PLACEHOLDER, ConfigError, MnemosConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "mnemos.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".mnemos";
/// Marker files/dirs that identify a project root.
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: MnemosConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Project root configuration.
    Project,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to resolve local layers.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.mnemos/mnemos.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last.
    pub runtime_paths: Vec<PathBuf>,
    /// Marker files/dirs used to detect the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl MnemosConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        schema::validate_layer_schema(&value, "config")?;
        config_from_value(value)
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations and overrides.
    ///
    /// Layer precedence (low -> high): user, project root, cwd, runtime overrides.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = normalize_path(&options.cwd)?;
        let project_root = find_project_root(&cwd, &options.project_root_markers);
        match project_root.as_ref() {
            Some(root) => debug!("resolved project root: {}", root.display()),
            None => debug!("project root not found; skipping project layer"),
        }

        let mut candidates = Vec::new();
        if let Some(path) = options.user_config_path.clone() {
            candidates.push((ConfigLayerSource::User, path, false));
        }
        if let Some(root) = project_root {
            candidates.push((
                ConfigLayerSource::Project,
                root.join(DEFAULT_CONFIG_FILE),
                false,
            ));
        }
        candidates.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE), false));
        for path in &options.runtime_paths {
            candidates.push((ConfigLayerSource::Runtime, path.clone(), true));
        }

        let mut layers = Vec::new();
        let mut seen_paths = HashSet::new();
        let mut merged = Value::Object(serde_json::Map::new());
        for (source, path, required) in candidates {
            if !required && !path.exists() {
                debug!(
                    "skipping missing layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let unique = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !seen_paths.insert(unique) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let value = layer_io::load_layer(source, &path)?;
            merge_json_values(&mut merged, value);
            layers.push(ConfigLayer { source, path });
        }

        let config = config_from_value(merged)?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.memory_id.trim().is_empty() {
            return Err(ConfigError::Invalid("memory.memory_id must not be empty".into()));
        }
        if self.memory.stm_max_results == 0 {
            return Err(ConfigError::Invalid(
                "memory.stm_max_results must be at least 1".into(),
            ));
        }
        if self.character.name.trim().is_empty() {
            return Err(ConfigError::Invalid("character.name must not be empty".into()));
        }
        let namespaces = &self.memory.namespaces;
        for (key, template) in [
            ("summary", &namespaces.summary),
            ("preference", &namespaces.preference),
            ("semantic", &namespaces.semantic),
        ] {
            if !template.contains(ACTOR_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "memory.namespaces.{key} must reference {ACTOR_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }
}

fn config_from_value(value: Value) -> Result<MnemosConfig, ConfigError> {
    let config: MnemosConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Deep-merge `overlay` into `base`; objects merge per key, everything else replaces.
fn merge_json_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Canonicalize when possible, keeping paths that do not exist yet.
fn normalize_path(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(ConfigError::ReadFailed(err)),
    }
}

fn find_project_root(cwd: &Path, markers: &[String]) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|ancestor| markers.iter().any(|marker| ancestor.join(marker).exists()))
        .map(Path::to_path_buf)
}
