//! Ordered, first-match-wins skill dispatch.

use crate::skill::Skill;
use log::{debug, info};
use simon_rs_protocol::{Action, SkillSummary};
use std::sync::Arc;

/// Fixed-order list of skills. The list is built once at startup; the first
/// skill whose trigger matches handles the utterance.
#[derive(Default, Clone)]
pub struct SkillDispatcher {
    skills: Vec<Arc<dyn Skill>>,
}

impl SkillDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a skill after every skill registered so far.
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        info!("registered skill (name={})", skill.name());
        self.skills.push(skill);
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// First skill able to handle the utterance, matched case-insensitively.
    pub fn find(&self, utterance: &str) -> Option<Arc<dyn Skill>> {
        let lowered = utterance.to_lowercase();
        self.skills
            .iter()
            .find(|skill| skill.can_handle(&lowered))
            .cloned()
    }

    /// Run the matching skill, if any.
    pub async fn dispatch(&self, utterance: &str) -> Option<Action> {
        let skill = self.find(utterance)?;
        debug!("dispatching to skill (name={})", skill.name());
        Some(skill.execute(utterance).await)
    }

    /// Context from every skill, newline-joined; empty contexts are skipped.
    pub fn context(&self) -> String {
        self.skills
            .iter()
            .filter_map(|skill| skill.context())
            .filter(|context| !context.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Name and description of every registered skill, in dispatch order.
    pub fn list(&self) -> Vec<SkillSummary> {
        self.skills.iter().map(|skill| skill.summary()).collect()
    }
}
