//! Conversation history and persisted user facts for Simon.

pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod store;

/// Rolling conversation window.
pub use conversation::ConversationMemory;
/// Memory error type.
pub use error::MemoryError;
/// Persisted key/value facts.
pub use knowledge::KnowledgeBase;
/// JSON object file helpers.
pub use store::{read_json_file, write_json_file};
