use async_trait::async_trait;
use parking_lot::Mutex;
use simon_rs_protocol::{Listener, Speaker, VoiceError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Speaker that collects everything it is asked to say.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}

/// One scripted listen result.
#[derive(Debug, Clone)]
pub enum Heard {
    Text(String),
    Silence,
    Error(String),
}

/// Listener that replays a fixed script, then reports the device closed.
///
/// An exhausted script idles for the requested timeout before closing so
/// loops driven by it do not spin.
#[derive(Debug, Default)]
pub struct ScriptedListener {
    script: VecDeque<Heard>,
    requests: Arc<Mutex<Vec<(Duration, Option<Duration>)>>>,
    idle_when_done: bool,
}

impl ScriptedListener {
    pub fn new(script: impl IntoIterator<Item = Heard>) -> Self {
        Self {
            script: script.into_iter().collect(),
            requests: Arc::new(Mutex::new(Vec::new())),
            idle_when_done: false,
        }
    }

    /// Script made only of recognized phrases.
    pub fn phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phrases.into_iter().map(|phrase| Heard::Text(phrase.into())))
    }

    /// Report silence instead of closing once the script runs out.
    pub fn idle_when_done(mut self) -> Self {
        self.idle_when_done = true;
        self
    }

    /// Timeout and phrase limit of every listen call so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<(Duration, Option<Duration>)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Option<Duration>,
    ) -> Result<Option<String>, VoiceError> {
        self.requests.lock().push((timeout, phrase_limit));
        match self.script.pop_front() {
            Some(Heard::Text(text)) => Ok(Some(text)),
            Some(Heard::Silence) => Ok(None),
            Some(Heard::Error(message)) => Err(VoiceError::Device(message)),
            None if self.idle_when_done => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(None)
            }
            None => Err(VoiceError::Closed),
        }
    }
}
