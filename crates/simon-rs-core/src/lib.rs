//! Core of the Simon assistant.
//!
//! This crate owns the command registry, the language-model classifier and
//! its HTTP client, the per-utterance dispatcher and the assistant runtime
//! that ties a microphone and speaker to it.

pub mod assistant;
pub mod classifier;
pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod wake;

/// Assistant runtime.
pub use assistant::Assistant;
/// Classifier and reply parsing.
pub use classifier::{Classifier, SYSTEM_PROMPT, parse_response};
/// Registered command shortcuts.
pub use commands::{CommandMatch, CommandRegistry};
/// Per-utterance orchestration.
pub use dispatcher::{ActionSource, Dispatcher, FAILED_RESPONSE, Outcome, Resolution};
pub use error::SimonCoreError;
/// Ollama chat backend.
pub use llm::OllamaClient;
pub use wake::WakeDetector;
