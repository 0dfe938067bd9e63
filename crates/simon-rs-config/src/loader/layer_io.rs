//! Reading config layers from disk and locating the default layer files.

use super::{ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_FILE, SYSTEM_CONFIG_PATH, schema};
use crate::{ConfigError, DATA_DIR_NAME};
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Whether a missing layer file is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Presence {
    Optional,
    Required,
}

/// Parsed layer value together with where it came from.
#[derive(Debug, Clone)]
pub(super) struct LoadedLayer {
    pub(super) meta: ConfigLayer,
    pub(super) value: Value,
}

/// Read, parse and schema-check one layer.
///
/// Returns `Ok(None)` only for an optional layer whose file does not exist.
pub(super) fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    presence: Presence,
) -> Result<Option<LoadedLayer>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound && presence == Presence::Optional => {
            debug!("config layer absent (source={source}, path={})", path.display());
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    debug!("config layer read (source={source}, path={})", path.display());
    let value = json5::from_str::<Value>(&contents)?;
    schema::validate_layer_schema(&value, &format!("{source}({})", path.display()))?;
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    }))
}

/// Canonical form of `path`, or `path` itself when it cannot be resolved.
///
/// Used both for the working directory and for de-duplicating layer files.
pub(super) fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

pub(super) fn default_system_config_path() -> Option<PathBuf> {
    SYSTEM_CONFIG_PATH.map(PathBuf::from)
}

/// `~/.simon/simon.json5` for the current user.
pub(super) fn default_user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(dirs.home_dir().join(DATA_DIR_NAME).join(DEFAULT_CONFIG_FILE))
}
