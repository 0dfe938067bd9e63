//! Configuration schema for Simon.

use directories::{BaseDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Directory under the home folder holding Simon's data and user config.
pub const DATA_DIR_NAME: &str = ".simon";
/// Built-in skill names, in dispatch order.
pub const BUILTIN_SKILLS: [&str; 4] = ["weather", "timer", "knowledge", "files"];

/// Root config for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimonConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

impl SimonConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SimonConfigBuilder {
        SimonConfigBuilder::new()
    }
}

/// Builder for assembling a `SimonConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SimonConfigBuilder {
    config: SimonConfig,
}

impl SimonConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: SimonConfig::default(),
        }
    }

    /// Replace the wake loop configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Replace the language model configuration.
    pub fn llm(mut self, llm: LlmConfig) -> Self {
        self.config.llm = llm;
        self
    }

    /// Override only the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = model.into();
        self
    }

    /// Replace the storage locations.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the skills configuration.
    pub fn skills(mut self, skills: SkillsConfig) -> Self {
        self.config.skills = skills;
        self
    }

    /// Replace the executor configuration.
    pub fn executor(mut self, executor: ExecutorConfig) -> Self {
        self.config.executor = executor;
        self
    }

    /// Finalize and return the built `SimonConfig`.
    pub fn build(self) -> SimonConfig {
        self.config
    }
}

/// Wake word detection and capture loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_wake_phrases")]
    pub wake_phrases: Vec<String>,
    #[serde(default = "default_filler_words")]
    pub filler_words: Vec<String>,
    #[serde(default = "default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,
    /// Phrase limit while waiting for the wake phrase.
    #[serde(default = "default_wake_phrase_limit_secs")]
    pub wake_phrase_limit_secs: u64,
    /// Phrase limit for follow-up and hotkey commands.
    #[serde(default = "default_command_phrase_limit_secs")]
    pub command_phrase_limit_secs: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_phrases: default_wake_phrases(),
            filler_words: default_filler_words(),
            listen_timeout_secs: default_listen_timeout_secs(),
            wake_phrase_limit_secs: default_wake_phrase_limit_secs(),
            command_phrase_limit_secs: default_command_phrase_limit_secs(),
            history_limit: default_history_limit(),
            stop_timeout_ms: default_stop_timeout_ms(),
        }
    }
}

impl AssistantConfig {
    pub fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }

    pub fn wake_phrase_limit(&self) -> Duration {
        Duration::from_secs(self.wake_phrase_limit_secs)
    }

    pub fn command_phrase_limit(&self) -> Duration {
        Duration::from_secs(self.command_phrase_limit_secs)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

// Common mis-transcriptions of the wake word are listed next to the real one.
fn default_wake_phrases() -> Vec<String> {
    [
        "hey simon",
        "hey saimon",
        "hey symon",
        "a simon",
        "hey seaman",
        "hey semen",
        "simon",
        "saimon",
        "symon",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_filler_words() -> Vec<String> {
    ["please", "can you", "could you"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_listen_timeout_secs() -> u64 {
    5
}

fn default_wake_phrase_limit_secs() -> u64 {
    10
}

fn default_command_phrase_limit_secs() -> u64 {
    15
}

fn default_history_limit() -> usize {
    10
}

fn default_stop_timeout_ms() -> u64 {
    2_000
}

/// Language model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            request_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.2".to_string()
}

fn default_llm_temperature() -> f32 {
    0.3
}

fn default_llm_timeout_secs() -> u64 {
    60
}

/// Locations of the persisted command and knowledge files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Explicit registered-commands file; defaults to `~/.simon/commands.json`.
    #[serde(default)]
    pub commands_path: Option<PathBuf>,
    /// Explicit knowledge file; defaults to `~/.simon/knowledge.json`.
    #[serde(default)]
    pub knowledge_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved path of the registered-commands file.
    pub fn commands_path(&self) -> PathBuf {
        self.commands_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("commands.json"))
    }

    /// Resolved path of the knowledge file.
    pub fn knowledge_path(&self) -> PathBuf {
        self.knowledge_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("knowledge.json"))
    }
}

/// Data directory under the home folder, or under the cwd when there is no home.
pub fn default_data_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(DATA_DIR_NAME),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DATA_DIR_NAME),
    }
}

/// Built-in skill settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Enabled built-in skills. Dispatch order is fixed regardless of list order.
    #[serde(default = "default_enabled_skills")]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub weather: WeatherSkillConfig,
    #[serde(default)]
    pub files: FilesSkillConfig,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_skills(),
            weather: WeatherSkillConfig::default(),
            files: FilesSkillConfig::default(),
        }
    }
}

impl SkillsConfig {
    /// True when the named built-in skill should be registered.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|entry| entry.eq_ignore_ascii_case(name))
    }
}

fn default_enabled_skills() -> Vec<String> {
    BUILTIN_SKILLS.iter().map(|name| name.to_string()).collect()
}

/// Weather lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSkillConfig {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_weather_location")]
    pub default_location: String,
    #[serde(default = "default_weather_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherSkillConfig {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            default_location: default_weather_location(),
            timeout_secs: default_weather_timeout_secs(),
        }
    }
}

fn default_weather_endpoint() -> String {
    "https://wttr.in".to_string()
}

fn default_weather_location() -> String {
    "London".to_string()
}

fn default_weather_timeout_secs() -> u64 {
    10
}

/// File management skill settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilesSkillConfig {
    /// Directory new files and folders land in; defaults to the desktop.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl FilesSkillConfig {
    /// Resolved working directory for the files skill.
    pub fn root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        UserDirs::new()
            .and_then(|dirs| {
                dirs.desktop_dir()
                    .map(|dir| dir.to_path_buf())
                    .or_else(|| Some(dirs.home_dir().join("Desktop")))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Desktop action executor settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExecutorConfig {
    /// Extra spoken app names mapped to launch commands; override built-ins.
    #[serde(default)]
    pub app_aliases: BTreeMap<String, String>,
    /// Where screenshots are written; defaults to the downloads folder.
    #[serde(default)]
    pub screenshot_dir: Option<PathBuf>,
}
