//! Terminal stand-ins for the microphone and the speaker.
//!
//! Each line typed on stdin is treated as one transcript, and spoken
//! responses are printed to stdout.

use async_trait::async_trait;
use simon_rs_config::SimonConfig;
use simon_rs_protocol::{Listener, SkillSummary, Speaker, VoiceError, render_skill_summaries};
use std::fmt::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

/// Reads one transcript per line.
pub struct StdinListener<R = BufReader<tokio::io::Stdin>> {
    lines: Lines<R>,
}

impl StdinListener {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for StdinListener {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncBufRead + Unpin> StdinListener<R> {
    /// Listener over any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R> Listener for StdinListener<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Waits up to `timeout` for a line; the phrase limit does not apply to typed input.
    async fn listen(
        &mut self,
        timeout: Duration,
        _phrase_limit: Option<Duration>,
    ) -> Result<Option<String>, VoiceError> {
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Err(_) => Ok(None),
            Ok(Ok(Some(line))) => {
                let line = line.trim();
                Ok((!line.is_empty()).then(|| line.to_string()))
            }
            Ok(Ok(None)) => Err(VoiceError::Closed),
            Ok(Err(err)) => Err(VoiceError::Device(err.to_string())),
        }
    }
}

/// Prints responses, one line each, prefixed with the assistant name.
pub struct ConsoleSpeaker<W = tokio::io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleSpeaker {
    pub fn new() -> Self {
        Self::from_writer(tokio::io::stdout())
    }
}

impl Default for ConsoleSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> ConsoleSpeaker<W> {
    pub fn from_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the speaker and return the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> Speaker for ConsoleSpeaker<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let mut out = self.out.lock().await;
        let line = format!("Simon: {text}\n");
        out.write_all(line.as_bytes())
            .await
            .map_err(|err| VoiceError::Device(err.to_string()))?;
        out.flush()
            .await
            .map_err(|err| VoiceError::Device(err.to_string()))
    }
}

/// Startup text: model, how to address the assistant, loaded skills and examples.
pub fn banner(config: &SimonConfig, skills: &[SkillSummary]) -> String {
    let wake = config
        .assistant
        .wake_phrases
        .first()
        .map(String::as_str)
        .unwrap_or("hey simon");
    let rule = "=".repeat(50);
    let mut text = String::new();
    let _ = writeln!(text, "{rule}");
    let _ = writeln!(
        text,
        "  Simon - Personal Voice Assistant (model: {})",
        config.llm.model
    );
    let _ = writeln!(text, "{rule}");
    let _ = writeln!(text, "Type '{wake}' followed by your command, one per line.");
    if !skills.is_empty() {
        let _ = writeln!(text, "Skills:");
        let _ = writeln!(text, "{}", render_skill_summaries(skills));
    }
    let _ = writeln!(text, "Examples:");
    for example in [
        "open Chrome",
        "what time is it?",
        "search YouTube for music",
        "turn up the volume",
        "set a timer for 5 minutes",
        "remember my favorite color is blue",
    ] {
        let _ = writeln!(text, "  - '{wake}, {example}'");
    }
    let _ = writeln!(text, "Press Ctrl-D or Ctrl-C to quit.");
    let _ = write!(text, "{rule}");
    text
}
