//! Test helpers shared across Simon crates.

pub mod host;
pub mod llm;
pub mod skills;
pub mod voice;

pub use host::{HostCall, RecordingHost};
pub use llm::{FailingLLM, FixedLLM, GatedLLM, RecordedChat, RecordingChatLLM};
pub use skills::StubSkill;
pub use voice::{Heard, RecordingSpeaker, ScriptedListener};
