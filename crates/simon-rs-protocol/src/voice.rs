//! Speech capture and playback seams.

use crate::error::VoiceError;
use async_trait::async_trait;
use std::time::Duration;

/// Text-to-speech output. Implementations serialize overlapping calls.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

/// Speech-to-text input.
#[async_trait]
pub trait Listener: Send {
    /// Capture one utterance.
    ///
    /// Returns `Ok(None)` when nothing intelligible was heard before `timeout`.
    /// `phrase_limit` caps how long a single phrase may run once speech starts.
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Option<Duration>,
    ) -> Result<Option<String>, VoiceError>;
}
