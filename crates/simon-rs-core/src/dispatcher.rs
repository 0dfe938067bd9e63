//! Per-utterance orchestration: resolve an action, execute it, pick the reply.

use crate::classifier::Classifier;
use crate::commands::CommandRegistry;
use crate::error::SimonCoreError;
use crate::llm::OllamaClient;
use log::{debug, info, warn};
use simon_rs_config::SimonConfig;
use simon_rs_executor::{DesktopHost, Executor};
use simon_rs_memory::ConversationMemory;
use simon_rs_protocol::{Action, ActionStep, ChatProvider, Speaker};
use simon_rs_skills::{Skill, SkillDispatcher, builtin_dispatcher};
use std::sync::Arc;

/// Spoken when a single action could not be carried out.
pub const FAILED_RESPONSE: &str = "Sorry, I couldn't do that";

/// Which stage produced an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSource {
    /// A registered command, by name.
    Command(String),
    /// A skill, by name.
    Skill(String),
    Classifier,
}

/// An action and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub action: Action,
    pub source: ActionSource,
}

/// Result of handling one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The action as resolved, with its original response.
    pub action: Action,
    pub source: ActionSource,
    /// One entry per executor call, in order. Empty for speak-only actions.
    pub executed: Vec<bool>,
    /// Text to speak back.
    pub response: String,
}

/// Routes utterances through registered commands, skills and the classifier.
///
/// Owns the conversation history and the command registry; callers serialize
/// access so only one utterance is handled at a time.
pub struct Dispatcher {
    commands: CommandRegistry,
    skills: SkillDispatcher,
    classifier: Classifier,
    executor: Executor,
    history: ConversationMemory,
}

impl Dispatcher {
    pub fn new(
        commands: CommandRegistry,
        skills: SkillDispatcher,
        classifier: Classifier,
        executor: Executor,
    ) -> Self {
        Self {
            commands,
            skills,
            classifier,
            executor,
            history: ConversationMemory::default(),
        }
    }

    /// Replace the conversation history, typically to set its bound.
    pub fn with_history(mut self, history: ConversationMemory) -> Self {
        self.history = history;
        self
    }

    /// Assemble the dispatcher described by `config`.
    ///
    /// `announcer` receives fired timer reminders.
    pub fn from_config(
        config: &SimonConfig,
        provider: Arc<dyn ChatProvider>,
        host: Arc<dyn DesktopHost>,
        announcer: Option<Arc<dyn Speaker>>,
    ) -> Result<Self, SimonCoreError> {
        let commands = CommandRegistry::load(config.storage.commands_path());
        let skills = builtin_dispatcher(config, announcer)?;
        let classifier = Classifier::from_config(provider, &config.llm);
        let executor = Executor::new(host, &config.executor);
        Ok(Self::new(commands, skills, classifier, executor)
            .with_history(ConversationMemory::new(config.assistant.history_limit)))
    }

    /// Default dispatcher talking to the configured Ollama endpoint.
    pub fn with_ollama(
        config: &SimonConfig,
        host: Arc<dyn DesktopHost>,
        announcer: Option<Arc<dyn Speaker>>,
    ) -> Result<Self, SimonCoreError> {
        let provider = Arc::new(OllamaClient::new(&config.llm)?);
        Self::from_config(config, provider, host, announcer)
    }

    /// Pick the action for `utterance`: registered command, then skill, then classifier.
    pub async fn resolve(&mut self, utterance: &str) -> Resolution {
        if let Some(found) = self.commands.find(utterance) {
            debug!("matched registered command (name={})", found.name);
            return Resolution {
                action: Action::composite(
                    found.steps.to_vec(),
                    format!("Running your {} command.", found.name),
                ),
                source: ActionSource::Command(found.name.to_string()),
            };
        }
        if let Some(skill) = self.skills.find(utterance) {
            let name = skill.name().to_string();
            debug!("matched skill (name={name})");
            return Resolution {
                action: skill.execute(utterance).await,
                source: ActionSource::Skill(name),
            };
        }
        let context = self.skills.context();
        Resolution {
            action: self
                .classifier
                .classify(utterance, &mut self.history, &context)
                .await,
            source: ActionSource::Classifier,
        }
    }

    /// Resolve and execute `utterance`, returning what to say.
    pub async fn handle(&mut self, utterance: &str) -> Outcome {
        let Resolution { action, source } = self.resolve(utterance).await;
        info!(
            "handling utterance (source={source:?}, kind={}, target={:?})",
            action.kind, action.target
        );
        if action.is_composite() {
            let executed = self.run_steps(action.steps.clone()).await;
            return Outcome {
                response: action.response.clone(),
                action,
                source,
                executed,
            };
        }
        if action.kind.is_speak() {
            return Outcome {
                response: action.response.clone(),
                action,
                source,
                executed: Vec::new(),
            };
        }
        let step = ActionStep::new(action.kind.clone(), action.target.clone());
        let succeeded = self.run_steps(vec![step]).await.first().copied().unwrap_or(false);
        let response = if succeeded {
            action.response.clone()
        } else {
            FAILED_RESPONSE.to_string()
        };
        Outcome {
            action,
            source,
            executed: vec![succeeded],
            response,
        }
    }

    /// Execute every step in order off the async runtime. Failures do not stop the run.
    async fn run_steps(&self, steps: Vec<ActionStep>) -> Vec<bool> {
        let executor = self.executor.clone();
        let count = steps.len();
        let run = tokio::task::spawn_blocking(move || {
            steps
                .iter()
                .map(|step| executor.execute(&step.kind, step.target.as_deref()))
                .collect::<Vec<_>>()
        });
        match run.await {
            Ok(results) => results,
            Err(err) => {
                warn!("executor task failed (steps={count}): {err}");
                vec![false; count]
            }
        }
    }

    pub fn history(&self) -> &ConversationMemory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Register a command shortcut. False when it could not be saved.
    pub fn add_command(&mut self, name: &str, steps: Vec<ActionStep>) -> bool {
        self.commands.add(name, steps)
    }

    pub fn remove_command(&mut self, name: &str) -> bool {
        self.commands.remove(name)
    }

    pub fn list_commands(&self) -> Vec<String> {
        self.commands.list()
    }

    pub fn reload_commands(&mut self) {
        self.commands.reload();
    }

    pub fn skills(&self) -> &SkillDispatcher {
        &self.skills
    }
}
