//! Wake phrase detection on raw transcripts.

use simon_rs_config::AssistantConfig;

/// Finds a configured wake phrase and extracts the command after it.
#[derive(Debug, Clone)]
pub struct WakeDetector {
    phrases: Vec<String>,
    fillers: Vec<String>,
}

impl WakeDetector {
    pub fn new<P, F>(phrases: P, fillers: F) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            phrases: normalized(phrases),
            fillers: normalized(fillers),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.wake_phrases, &config.filler_words)
    }

    /// Command following the first configured wake phrase in `transcript`.
    ///
    /// Phrases are tried in configuration order. `Some("")` means the wake
    /// phrase was heard on its own and a follow-up listen is needed.
    pub fn detect(&self, transcript: &str) -> Option<String> {
        let lowered = transcript.to_lowercase();
        let (phrase, start) = self
            .phrases
            .iter()
            .find_map(|phrase| lowered.find(phrase.as_str()).map(|start| (phrase, start)))?;
        let remainder = &lowered[start + phrase.len()..];
        Some(self.strip_fillers(remainder))
    }

    fn strip_fillers(&self, remainder: &str) -> String {
        let mut command = trim_punctuation(remainder);
        loop {
            let Some(rest) = self.fillers.iter().find_map(|filler| {
                command
                    .strip_prefix(filler.as_str())
                    .filter(|rest| rest.is_empty() || rest.starts_with(is_separator))
            }) else {
                break;
            };
            command = trim_punctuation(rest);
        }
        command.to_string()
    }
}

fn normalized<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '.' | '!' | '?' | ';' | ':')
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_start_matches(is_separator).trim_end()
}
