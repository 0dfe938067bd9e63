//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating Simon config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A config layer is not valid JSON5.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not fit the config models.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A specific field failed schema validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// `skills.enabled` names a skill that does not exist.
    #[error("unknown skill in skills.enabled: {0}")]
    UnknownSkill(String),
    /// A cross-field invariant failed.
    #[error("invalid config: {0}")]
    Invalid(String),
}
