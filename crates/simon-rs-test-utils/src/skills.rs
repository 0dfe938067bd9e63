use async_trait::async_trait;
use parking_lot::Mutex;
use simon_rs_protocol::Action;
use simon_rs_skills::Skill;
use std::sync::Arc;

/// Skill answering with a fixed action whenever one of its triggers appears.
#[derive(Debug, Clone)]
pub struct StubSkill {
    name: String,
    triggers: Vec<&'static str>,
    action: Action,
    context: Option<String>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl StubSkill {
    pub fn new(name: impl Into<String>, triggers: Vec<&'static str>, action: Action) -> Self {
        Self {
            name: name.into(),
            triggers,
            action,
            context: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Utterances passed to `execute`.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Skill for StubSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Stub skill for tests"
    }

    fn triggers(&self) -> &[&str] {
        &self.triggers
    }

    async fn execute(&self, utterance: &str) -> Action {
        self.seen.lock().push(utterance.to_string());
        self.action.clone()
    }

    fn context(&self) -> Option<String> {
        self.context.clone()
    }
}
