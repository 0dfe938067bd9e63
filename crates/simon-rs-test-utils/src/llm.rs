use async_trait::async_trait;
use parking_lot::Mutex;
use simon_rs_protocol::{ChatMessage, ChatOptions, ChatProvider, LlmError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Answers every request with the same text.
#[derive(Debug, Clone)]
pub struct FixedLLM {
    response: String,
}

impl FixedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FixedLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: &ChatOptions,
    ) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

/// Fails every request with a transport error.
#[derive(Debug, Clone)]
pub struct FailingLLM {
    message: String,
}

impl FailingLLM {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FailingLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: &ChatOptions,
    ) -> Result<String, LlmError> {
        Err(LlmError::Transport(self.message.clone()))
    }
}

/// A request captured by [`RecordingChatLLM`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedChat {
    pub messages: Vec<ChatMessage>,
    pub options: ChatOptions,
}

/// Records every transcript it receives and answers with a fixed text.
#[derive(Debug, Clone)]
pub struct RecordingChatLLM {
    response: String,
    seen: Arc<Mutex<Vec<RecordedChat>>>,
}

impl RecordingChatLLM {
    pub fn new(response: impl Into<String>) -> (Self, Arc<Mutex<Vec<RecordedChat>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                response: response.into(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl ChatProvider for RecordingChatLLM {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        self.seen.lock().push(RecordedChat {
            messages: messages.to_vec(),
            options: options.clone(),
        });
        Ok(self.response.clone())
    }
}

/// Holds each request until [`GatedLLM::release`] is called.
#[derive(Debug, Clone)]
pub struct GatedLLM {
    response: String,
    calls: Arc<AtomicUsize>,
    entered: Arc<Notify>,
    gate: Arc<Notify>,
}

impl GatedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Notify::new()),
        }
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until a request is in flight.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one pending (or the next) request complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ChatProvider for GatedLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: &ChatOptions,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.response.clone())
    }
}
