//! Language-model classification of free-form utterances into actions.

use chrono::{DateTime, Local};
use log::{debug, warn};
use serde_json::{Map, Value};
use simon_rs_config::LlmConfig;
use simon_rs_memory::ConversationMemory;
use simon_rs_protocol::{Action, ActionKind, ActionStep, ChatMessage, ChatOptions, ChatProvider};
use std::sync::Arc;

/// Instruction sent as the first message of every classification request.
pub const SYSTEM_PROMPT: &str = r#"You are Simon, a helpful desktop voice assistant. Your job is to understand user commands and return structured JSON responses.

You MUST respond with valid JSON only, no other text. The JSON must have this structure:
{
    "action": "<action type>",
    "target": "<target or null>",
    "response": "<what to say back to the user>"
}

Action types:
- "open_app": Open a desktop application. Target is the app name (e.g. "chrome", "notepad", "vscode", "spotify")
- "open_file": Open a file or folder. Target is the path
- "open_url": Open a website. Target is the URL
- "search_google": Search the web. Target is the search query
- "search_youtube": Search YouTube. Target is the search query
- "volume_up": Raise the volume. Target is null
- "volume_down": Lower the volume. Target is null
- "volume_mute": Toggle mute. Target is null
- "volume_set": Set the volume. Target is a whole number from 0 to 100
- "media_play_pause": Play or pause media. Target is null
- "media_next": Next track. Target is null
- "media_prev": Previous track. Target is null
- "lock_screen": Lock the computer. Target is null
- "screenshot": Take a screenshot. Target is null
- "shutdown": Shut down the computer. Target is null
- "restart": Restart the computer. Target is null
- "sleep": Put the computer to sleep. Target is null
- "speak": Just respond verbally, no action needed. Target is null

Examples:
User: "open chrome"
{"action": "open_app", "target": "chrome", "response": "Opening Chrome for you"}

User: "go to youtube"
{"action": "open_url", "target": "https://youtube.com", "response": "Opening YouTube"}

User: "search for rust tutorials"
{"action": "search_google", "target": "rust tutorials", "response": "Searching for rust tutorials"}

User: "play lofi music on youtube"
{"action": "search_youtube", "target": "lofi music", "response": "Searching YouTube for lofi music"}

User: "set the volume to 30"
{"action": "volume_set", "target": "30", "response": "Volume set to 30 percent"}

User: "what time is it"
{"action": "speak", "target": null, "response": "It's currently 3:45 PM"}

User: "open my documents folder"
{"action": "open_file", "target": "~/Documents", "response": "Opening your Documents folder"}

Always be concise and helpful in your responses."#;

const EMPTY_REPLY: &str = "I didn't understand that.";

/// Wraps a chat backend with the fixed prompt and reply parsing.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn ChatProvider>,
    options: ChatOptions,
}

impl Classifier {
    pub fn new(provider: Arc<dyn ChatProvider>, options: ChatOptions) -> Self {
        Self { provider, options }
    }

    /// Classifier using the configured model and temperature.
    pub fn from_config(provider: Arc<dyn ChatProvider>, config: &LlmConfig) -> Self {
        Self::new(
            provider,
            ChatOptions {
                model: config.model.clone(),
                temperature: config.temperature,
            },
        )
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// System instruction, prior turns oldest first, then the current command.
    pub fn build_messages(
        &self,
        utterance: &str,
        history: &ConversationMemory,
        context: &str,
        now: DateTime<Local>,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history.messages());
        messages.push(ChatMessage::user(user_prompt(utterance, context, now)));
        messages
    }

    /// Ask the model what to do with `utterance`.
    ///
    /// Never fails: transport errors become a spoken apology and leave the
    /// history untouched. Successful round trips append both turns.
    pub async fn classify(
        &self,
        utterance: &str,
        history: &mut ConversationMemory,
        context: &str,
    ) -> Action {
        let messages = self.build_messages(utterance, history, context, Local::now());
        match self.provider.chat(&messages, &self.options).await {
            Ok(reply) => {
                let action = parse_response(&reply);
                debug!(
                    "classified utterance (kind={}, target={:?})",
                    action.kind, action.target
                );
                history.add_user(utterance);
                history.add_assistant(action.response.clone());
                action
            }
            Err(err) => {
                warn!("classification request failed: {err}");
                Action::speak(format!("Sorry, I couldn't process that. {err}"))
            }
        }
    }
}

/// User turn carrying the clock, any skill context and the command.
pub fn user_prompt(utterance: &str, context: &str, now: DateTime<Local>) -> String {
    let clock = format!(
        "Current time: {}, Date: {}",
        now.format("%I:%M %p"),
        now.format("%A, %B %d, %Y")
    );
    let context = context.trim();
    if context.is_empty() {
        format!("{clock}\n\nUser command: {utterance}")
    } else {
        format!("{clock}\n\n{context}\n\nUser command: {utterance}")
    }
}

/// Turn a model reply into an action, tolerating code fences and plain text.
pub fn parse_response(reply: &str) -> Action {
    let trimmed = reply.trim();
    let payload = fenced_block(trimmed).unwrap_or(trimmed).trim();
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(object)) => action_from_object(&object),
        _ if trimmed.is_empty() => Action::speak(EMPTY_REPLY),
        _ => Action::speak(trimmed),
    }
}

/// Content of the first ```json block, else of the first ``` pair.
fn fenced_block(text: &str) -> Option<&str> {
    let body = match text.split_once("```json") {
        Some((_, rest)) => rest,
        None => text.split_once("```")?.1,
    };
    Some(body.split_once("```").map_or(body, |(inner, _)| inner))
}

fn action_from_object(object: &Map<String, Value>) -> Action {
    let kind = object
        .get("action")
        .and_then(Value::as_str)
        .map(ActionKind::from)
        .unwrap_or(ActionKind::Speak);
    let response = object
        .get("response")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let target = object.get("target");
    let mut action = Action::new(kind, target.and_then(target_text), response);
    if action.is_composite() {
        action.steps = object
            .get("steps")
            .or(target)
            .and_then(|value| serde_json::from_value::<Vec<ActionStep>>(value.clone()).ok())
            .unwrap_or_default();
    }
    action
}

fn target_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{fenced_block, parse_response, user_prompt};
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;
    use simon_rs_protocol::{Action, ActionKind, ActionStep};

    #[test]
    fn fences_prefer_json_tag() {
        assert_eq!(
            fenced_block("```\nplain\n```\n```json\n{}\n```"),
            Some("\n{}\n")
        );
        assert_eq!(fenced_block("```\n{\"a\":1}\n```"), Some("\n{\"a\":1}\n"));
        assert_eq!(fenced_block("no fence"), None);
    }

    #[test]
    fn missing_fields_fall_back() {
        let action = parse_response(r#"{"target": "chrome"}"#);
        assert_eq!(action.kind, ActionKind::Speak);
        assert_eq!(action.target.as_deref(), Some("chrome"));
        assert_eq!(action.response, "Done");

        let action = parse_response(r#"{"action": "volume_set", "target": 40, "response": ""}"#);
        assert_eq!(
            action,
            Action::new(ActionKind::VolumeSet, Some("40".to_string()), "Done")
        );
    }

    #[test]
    fn string_targets_are_kept_verbatim() {
        let action = parse_response(r#"{"action": "speak", "target": "", "response": "Hello there"}"#);
        assert_eq!(action.kind, ActionKind::Speak);
        assert_eq!(action.target.as_deref(), Some(""));
        assert_eq!(action.response, "Hello there");

        let action = parse_response(r#"{"action": "open_url", "target": " github.com ", "response": "Opening"}"#);
        assert_eq!(action.target.as_deref(), Some(" github.com "));
    }

    #[test]
    fn unknown_kinds_are_kept_for_refusal() {
        let action = parse_response(r#"{"action": "launch_rocket", "target": null, "response": "Launching"}"#);
        assert_eq!(action.kind, ActionKind::Other("launch_rocket".to_string()));
        assert_eq!(action.target, None);
    }

    #[test]
    fn composite_replies_carry_steps() {
        let action = parse_response(
            r#"{"action": "custom", "target": [{"action": "volume_mute"}, {"action": "open_app", "target": "spotify"}], "response": "Focus time"}"#,
        );
        assert!(action.is_composite());
        assert_eq!(action.target, None);
        assert_eq!(
            action.steps,
            vec![
                ActionStep::new("volume_mute", None),
                ActionStep::new("open_app", Some("spotify".to_string())),
            ]
        );
    }

    #[test]
    fn non_object_json_is_spoken() {
        assert_eq!(parse_response("42"), Action::speak("42"));
        assert_eq!(parse_response("  \"hello\"  "), Action::speak("\"hello\""));
        assert_eq!(parse_response("   "), Action::speak("I didn't understand that."));
    }

    #[test]
    fn prompt_includes_clock_and_context() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 0)
            .single()
            .expect("local time");
        assert_eq!(
            user_prompt("open chrome", "", now),
            "Current time: 02:07 PM, Date: Tuesday, March 05, 2024\n\nUser command: open chrome"
        );
        assert_eq!(
            user_prompt("what's my name", "Known facts about the user:\n  - name: Ada", now),
            "Current time: 02:07 PM, Date: Tuesday, March 05, 2024\n\nKnown facts about the user:\n  - name: Ada\n\nUser command: what's my name"
        );
    }
}
