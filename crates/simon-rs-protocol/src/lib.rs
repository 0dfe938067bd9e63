//! Shared types for the Simon assistant: actions, chat messages and the
//! collaborator seams (language model, speaker, microphone).

mod action;
mod chat;
mod error;
mod skill;
mod voice;

pub use action::{Action, ActionKind, ActionStep, DEFAULT_RESPONSE};
pub use chat::{ChatMessage, ChatOptions, ChatProvider, ConversationTurn, Role};
pub use error::{LlmError, VoiceError};
pub use skill::{SkillSummary, render_skill_summaries};
pub use voice::{Listener, Speaker};
