//! Built-in skills bundled with Simon.

mod files;
mod knowledge;
mod timer;
mod weather;

use crate::{SkillDispatcher, SkillError};
use log::info;
use simon_rs_config::SimonConfig;
use simon_rs_protocol::Speaker;
use std::sync::Arc;

pub use files::FilesSkill;
pub use knowledge::KnowledgeSkill;
pub use timer::{
    ActiveTimer, MAX_TIMER_SECS, TimerSkill, describe_duration, extract_message,
    is_cancel_request, parse_duration,
};
pub use weather::WeatherSkill;

/// Build the dispatcher with every enabled built-in skill in fixed order:
/// weather, timer, knowledge, files.
///
/// `announcer` is used by the timer skill to speak reminders when they fire.
pub fn builtin_dispatcher(
    config: &SimonConfig,
    announcer: Option<Arc<dyn Speaker>>,
) -> Result<SkillDispatcher, SkillError> {
    let skills = &config.skills;
    let mut dispatcher = SkillDispatcher::new();
    if skills.is_enabled("weather") {
        dispatcher.register(Arc::new(WeatherSkill::new(&skills.weather)?));
    }
    if skills.is_enabled("timer") {
        dispatcher.register(Arc::new(TimerSkill::new(announcer)));
    }
    if skills.is_enabled("knowledge") {
        dispatcher.register(Arc::new(KnowledgeSkill::load(
            config.storage.knowledge_path(),
        )));
    }
    if skills.is_enabled("files") {
        dispatcher.register(Arc::new(FilesSkill::new(skills.files.root())));
    }
    info!("built-in skills ready (count={})", dispatcher.len());
    Ok(dispatcher)
}
