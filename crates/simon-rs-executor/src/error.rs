//! Error types for desktop host requests.

use thiserror::Error;

/// Errors returned by a [`crate::DesktopHost`].
#[derive(Debug, Error)]
pub enum HostError {
    /// The host cannot perform this kind of request on this platform.
    #[error("unsupported on this host: {0}")]
    Unsupported(&'static str),
    /// A required program or application was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A helper program ran but reported failure.
    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: String },
    /// IO error while spawning a helper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
