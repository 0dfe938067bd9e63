//! The skill contract.

use async_trait::async_trait;
use simon_rs_protocol::{Action, SkillSummary};

/// A keyword-triggered capability.
///
/// `can_handle` receives the lowercased utterance; `execute` receives it as
/// spoken. `execute` always produces an action: internal failures become a
/// spoken apology.
#[async_trait]
pub trait Skill: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Phrases that route an utterance to this skill.
    fn triggers(&self) -> &[&str];

    /// True when any trigger appears in the lowercased utterance.
    fn can_handle(&self, utterance: &str) -> bool {
        self.triggers()
            .iter()
            .any(|trigger| utterance.contains(trigger))
    }

    async fn execute(&self, utterance: &str) -> Action;

    /// Extra facts for the model prompt, if the skill holds any state.
    fn context(&self) -> Option<String> {
        None
    }

    fn summary(&self) -> SkillSummary {
        SkillSummary {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
