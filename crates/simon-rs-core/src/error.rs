//! Error types for the core assistant crate.

use simon_rs_config::ConfigError;
use simon_rs_memory::MemoryError;
use simon_rs_protocol::{LlmError, VoiceError};
use simon_rs_skills::SkillError;
use thiserror::Error;

/// Errors returned while assembling or running the assistant.
///
/// Per-utterance failures never surface here; they are converted into a
/// spoken action or a `false` execution result at the component that hit them.
#[derive(Debug, Error)]
pub enum SimonCoreError {
    /// Configuration could not be loaded or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A built-in skill could not be constructed.
    #[error("skill error: {0}")]
    Skill(#[from] SkillError),
    /// Persisted state could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] MemoryError),
    /// Language model service error.
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),
    /// Microphone or speaker failure.
    #[error("voice error: {0}")]
    Voice(#[from] VoiceError),
    /// HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// The assistant loop is already running.
    #[error("assistant already running")]
    AlreadyRunning,
    /// The capture loop did not finish within the stop timeout.
    #[error("capture loop did not stop within {0:?}")]
    StopTimeout(std::time::Duration),
}
