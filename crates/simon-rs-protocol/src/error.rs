//! Errors raised at the external collaborator seams.

use thiserror::Error;

/// Errors returned by a language model backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The service could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Errors returned by speech capture or playback backends.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The input or output device is gone for good.
    #[error("voice device closed")]
    Closed,
    /// A recoverable device or engine failure.
    #[error("voice device error: {0}")]
    Device(String),
}
