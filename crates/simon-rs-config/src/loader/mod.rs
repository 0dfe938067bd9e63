//! Loading `simon.json5` from one file or from the layered stack.
//!
//! Each layer is schema-checked on its own before the merge, so an error
//! names the file that caused it.

mod layer_io;
mod merge;
mod schema;


use crate::{BUILTIN_SKILLS, ConfigError, SimonConfig};
use layer_io::Presence;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "simon.json5";

#[cfg(unix)]
const SYSTEM_CONFIG_PATH: Option<&str> = Some("/etc/simon/simon.json5");
#[cfg(windows)]
const SYSTEM_CONFIG_PATH: Option<&str> = Some("C:\\ProgramData\\simon\\simon.json5");
#[cfg(not(any(unix, windows)))]
const SYSTEM_CONFIG_PATH: Option<&str> = None;

/// Merged config and the layers that produced it, lowest precedence first.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: SimonConfig,
    pub layers: Vec<ConfigLayer>,
}

/// Where a config layer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    System,
    User,
    /// `simon.json5` in the working directory.
    Cwd,
    /// Explicit override file, applied last.
    Runtime,
}

impl fmt::Display for ConfigLayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Cwd => "cwd",
            Self::Runtime => "runtime",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Locations searched by [`SimonConfig::load_layered_with_options`].
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    pub cwd: PathBuf,
    /// Defaults to `/etc/simon/simon.json5` on Unix.
    pub system_config_path: Option<PathBuf>,
    /// Defaults to `~/.simon/simon.json5`.
    pub user_config_path: Option<PathBuf>,
    /// Override files; each must exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Every candidate layer in merge order.
    fn candidates(&self) -> Vec<(ConfigLayerSource, PathBuf, Presence)> {
        let cwd = layer_io::canonical_or_self(&self.cwd);
        let optional = [
            (ConfigLayerSource::System, self.system_config_path.clone()),
            (ConfigLayerSource::User, self.user_config_path.clone()),
            (ConfigLayerSource::Cwd, Some(cwd.join(DEFAULT_CONFIG_FILE))),
        ];
        optional
            .into_iter()
            .filter_map(|(source, path)| path.map(|path| (source, path, Presence::Optional)))
            .chain(
                self.runtime_paths
                    .iter()
                    .map(|path| (ConfigLayerSource::Runtime, path.clone(), Presence::Required)),
            )
            .collect()
    }
}

impl SimonConfig {
    /// Parse one JSON5 file without layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config (path={})", path.display());
        Self::load_from_str(&fs::read_to_string(path)?)
    }

    /// Parse JSON5 text without layering.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        config_from_value(json5::from_str(contents)?, "config")
    }

    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Merge system, user, cwd and runtime layers in that order.
    ///
    /// Missing optional layers are skipped and a file reachable through two
    /// candidates is merged once.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut seen = HashSet::new();
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());

        for (source, path, presence) in options.candidates() {
            if !seen.insert(layer_io::canonical_or_self(&path)) {
                debug!("duplicate config layer skipped (source={source}, path={})", path.display());
                continue;
            }
            if let Some(layer) = layer_io::read_layer(source, &path, presence)? {
                merge::merge_json_values(&mut merged, &layer.value);
                layers.push(layer.meta);
            }
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "layered config loaded (layers={}, model={})",
            layers.len(),
            config.llm.model
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "assistant.history_limit must be greater than zero".to_string(),
            ));
        }
        if self
            .assistant
            .wake_phrases
            .iter()
            .all(|phrase| phrase.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "assistant.wake_phrases needs at least one phrase".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0.0..=2.0 (got {})",
                self.llm.temperature
            )));
        }
        for name in &self.skills.enabled {
            if !BUILTIN_SKILLS
                .iter()
                .any(|builtin| builtin.eq_ignore_ascii_case(name))
            {
                return Err(ConfigError::UnknownSkill(name.clone()));
            }
        }
        Ok(())
    }
}

fn config_from_value(value: Value, label: &str) -> Result<SimonConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: SimonConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
