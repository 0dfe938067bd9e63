//! Remember, recall and forget facts the user tells the assistant.

use crate::skill::Skill;
use async_trait::async_trait;
use log::warn;
use parking_lot::RwLock;
use simon_rs_memory::KnowledgeBase;
use simon_rs_protocol::Action;
use std::path::PathBuf;
use std::sync::Arc;

const TRIGGERS: &[&str] = &[
    "remember",
    "forget",
    "what is my",
    "what's my",
    "do you know my",
    "recall",
];
const RECALL_MARKERS: &[&str] = &[
    "what is my ",
    "what's my ",
    "do you know my ",
    "recall my ",
    "recall ",
];

/// Key/value memory about the user, persisted between runs.
#[derive(Debug, Clone)]
pub struct KnowledgeSkill {
    knowledge: Arc<RwLock<KnowledgeBase>>,
}

impl KnowledgeSkill {
    /// Load the fact store from `path`; unreadable files start empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self::from_base(KnowledgeBase::load(path))
    }

    pub fn from_base(knowledge: KnowledgeBase) -> Self {
        Self {
            knowledge: Arc::new(RwLock::new(knowledge)),
        }
    }

    /// Shared handle to the underlying store.
    pub fn knowledge(&self) -> Arc<RwLock<KnowledgeBase>> {
        self.knowledge.clone()
    }

    fn remember(&self, lowered: &str) -> Action {
        let text = lowered
            .replace("remember that ", "")
            .replace("remember ", "");
        let Some((key, value)) = text.split_once(" is ") else {
            return Action::speak("Try saying 'remember my favorite color is blue'.");
        };
        let key = key.replace("my ", "").trim().to_string();
        let value = value.trim().to_string();
        if key.is_empty() || value.is_empty() {
            return Action::speak("Try saying 'remember my favorite color is blue'.");
        }
        let reply = format!("Got it! I'll remember that your {key} is {value}.");
        match self.knowledge.write().remember(key, value) {
            Ok(()) => Action::speak(reply),
            Err(err) => {
                warn!("failed to persist fact: {err}");
                Action::speak("I'll remember that for now, but I couldn't save it.")
            }
        }
    }

    fn forget(&self, lowered: &str) -> Action {
        let query = lowered.replace("forget my ", "").replace("forget ", "");
        let mut knowledge = self.knowledge.write();
        let Some(key) = knowledge.find(&query).map(|(key, _)| key.to_string()) else {
            return Action::speak("I don't have that information stored.");
        };
        if let Err(err) = knowledge.forget(&key) {
            warn!("failed to persist forgotten fact (key={key}): {err}");
        }
        Action::speak(format!("Done, I've forgotten your {key}."))
    }

    fn recall(&self, lowered: &str) -> Action {
        let query = RECALL_MARKERS
            .iter()
            .find_map(|marker| lowered.split_once(marker).map(|(_, rest)| rest))
            .map(|rest| rest.trim().trim_end_matches('?').trim().to_string())
            .unwrap_or_default();
        let knowledge = self.knowledge.read();
        match knowledge.find(&query) {
            Some((key, value)) => Action::speak(format!("Your {key} is {value}.")),
            None => Action::speak(format!(
                "I don't know your {query}. Tell me to remember it!"
            )),
        }
    }
}

#[async_trait]
impl Skill for KnowledgeSkill {
    fn name(&self) -> &str {
        "knowledge"
    }

    fn description(&self) -> &str {
        "Remember facts and recall them later"
    }

    fn triggers(&self) -> &[&str] {
        TRIGGERS
    }

    async fn execute(&self, utterance: &str) -> Action {
        let lowered = utterance.to_lowercase();
        if lowered.contains("remember") {
            return self.remember(&lowered);
        }
        if lowered.contains("forget") {
            return self.forget(&lowered);
        }
        if TRIGGERS[2..].iter().any(|trigger| lowered.contains(trigger)) {
            return self.recall(&lowered);
        }
        Action::speak("I'm not sure what you want me to do with that information.")
    }

    fn context(&self) -> Option<String> {
        let knowledge = self.knowledge.read();
        if knowledge.is_empty() {
            return None;
        }
        let lines = knowledge
            .iter()
            .map(|(key, value)| format!("  - {key}: {value}"))
            .collect::<Vec<_>>();
        Some(format!("Known facts about the user:\n{}", lines.join("\n")))
    }
}
