//! Skills: keyword-triggered handlers that answer an utterance without the
//! language model.

pub mod builtins;
pub mod dispatcher;
pub mod error;
pub mod skill;

/// Built-in skills and the default dispatcher builder.
pub use builtins::{
    FilesSkill, KnowledgeSkill, TimerSkill, WeatherSkill, builtin_dispatcher, parse_duration,
};
/// Ordered skill dispatcher.
pub use dispatcher::SkillDispatcher;
/// Skill error type.
pub use error::SkillError;
/// Skill trait.
pub use skill::Skill;
