//! Rolling window of recent conversation turns sent to the model as context.

use simon_rs_protocol::{ChatMessage, ConversationTurn, Role};
use std::collections::VecDeque;

/// Default number of turns kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
const SUMMARY_TURNS: usize = 3;
const SUMMARY_CHARS: usize = 50;

/// Bounded FIFO of conversation turns. The oldest turn is dropped first.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    max_turns: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationMemory {
    /// Create an empty memory keeping at most `max_turns` turns (minimum one).
    pub fn new(max_turns: usize) -> Self {
        let max_turns = max_turns.max(1);
        Self {
            turns: VecDeque::with_capacity(max_turns + 1),
            max_turns,
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn add_user(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::now(Role::User, content));
    }

    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::now(Role::Assistant, content));
    }

    fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Turns oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Turns as chat messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(ConversationTurn::to_message).collect()
    }

    /// Most recent thing the user said, or an empty string.
    pub fn last_user_message(&self) -> &str {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Short human-readable recap of the last few turns.
    pub fn summary(&self) -> String {
        if self.turns.is_empty() {
            return "No recent conversation.".to_string();
        }
        let skip = self.turns.len().saturating_sub(SUMMARY_TURNS);
        self.turns
            .iter()
            .skip(skip)
            .map(|turn| {
                let speaker = match turn.role {
                    Role::User => "User",
                    _ => "Simon",
                };
                format!("{speaker}: {}...", truncate_chars(&turn.content, SUMMARY_CHARS))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
