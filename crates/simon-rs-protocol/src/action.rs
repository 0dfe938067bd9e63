//! The structured action contract shared by every producer and the executor.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Generic acknowledgement used when a producer has nothing better to say.
pub const DEFAULT_RESPONSE: &str = "Done";

/// Kind of desktop operation an action asks for.
///
/// Serialized as the snake_case wire names the language model emits. Unknown
/// names are preserved in [`ActionKind::Other`] so the executor can refuse them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    OpenApp,
    OpenFile,
    OpenUrl,
    SearchGoogle,
    SearchYoutube,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    VolumeSet,
    MediaPlayPause,
    MediaNext,
    MediaPrev,
    LockScreen,
    Screenshot,
    Shutdown,
    Restart,
    Sleep,
    Speak,
    /// Run a list of sub-actions.
    Custom,
    /// Any kind the executor does not know about.
    Other(String),
}

impl ActionKind {
    /// Every kind with a fixed wire name, in the order they are documented to the model.
    pub const KNOWN: [ActionKind; 19] = [
        ActionKind::OpenApp,
        ActionKind::OpenFile,
        ActionKind::OpenUrl,
        ActionKind::SearchGoogle,
        ActionKind::SearchYoutube,
        ActionKind::VolumeUp,
        ActionKind::VolumeDown,
        ActionKind::VolumeMute,
        ActionKind::VolumeSet,
        ActionKind::MediaPlayPause,
        ActionKind::MediaNext,
        ActionKind::MediaPrev,
        ActionKind::LockScreen,
        ActionKind::Screenshot,
        ActionKind::Shutdown,
        ActionKind::Restart,
        ActionKind::Sleep,
        ActionKind::Speak,
        ActionKind::Custom,
    ];

    /// Wire name for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::OpenApp => "open_app",
            ActionKind::OpenFile => "open_file",
            ActionKind::OpenUrl => "open_url",
            ActionKind::SearchGoogle => "search_google",
            ActionKind::SearchYoutube => "search_youtube",
            ActionKind::VolumeUp => "volume_up",
            ActionKind::VolumeDown => "volume_down",
            ActionKind::VolumeMute => "volume_mute",
            ActionKind::VolumeSet => "volume_set",
            ActionKind::MediaPlayPause => "media_play_pause",
            ActionKind::MediaNext => "media_next",
            ActionKind::MediaPrev => "media_prev",
            ActionKind::LockScreen => "lock_screen",
            ActionKind::Screenshot => "screenshot",
            ActionKind::Shutdown => "shutdown",
            ActionKind::Restart => "restart",
            ActionKind::Sleep => "sleep",
            ActionKind::Speak => "speak",
            ActionKind::Custom => "custom",
            ActionKind::Other(name) => name.as_str(),
        }
    }

    /// True when the kind only carries a spoken response.
    pub fn is_speak(&self) -> bool {
        matches!(self, ActionKind::Speak)
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        ActionKind::KNOWN
            .iter()
            .find(|kind| kind.as_str() == normalized)
            .cloned()
            .unwrap_or(ActionKind::Other(value.trim().to_string()))
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        ActionKind::from(value.as_str())
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a registered multi-step command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    #[serde(default, deserialize_with = "deserialize_target")]
    pub target: Option<String>,
}

impl ActionStep {
    /// Create a step from a kind and optional target.
    pub fn new(kind: impl Into<ActionKind>, target: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            target,
        }
    }
}

/// A structured, executable interpretation of one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    #[serde(default, deserialize_with = "deserialize_target")]
    pub target: Option<String>,
    #[serde(default = "default_response")]
    pub response: String,
    /// Sub-actions, only populated for [`ActionKind::Custom`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ActionStep>,
}

impl Action {
    /// Create a single action, falling back to the generic acknowledgement for empty responses.
    pub fn new(kind: impl Into<ActionKind>, target: Option<String>, response: impl Into<String>) -> Self {
        let response = response.into();
        Self {
            kind: kind.into(),
            target,
            response: if response.trim().is_empty() {
                default_response()
            } else {
                response
            },
            steps: Vec::new(),
        }
    }

    /// Speak-only action.
    pub fn speak(response: impl Into<String>) -> Self {
        Self::new(ActionKind::Speak, None, response)
    }

    /// Composite action running every step in order.
    pub fn composite(steps: Vec<ActionStep>, response: impl Into<String>) -> Self {
        let mut action = Self::new(ActionKind::Custom, None, response);
        action.steps = steps;
        action
    }

    pub fn is_composite(&self) -> bool {
        self.kind == ActionKind::Custom
    }
}

fn default_response() -> String {
    DEFAULT_RESPONSE.to_string()
}

/// Accept strings, numbers and booleans as targets; null or empty becomes `None`.
fn deserialize_target<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionKind, ActionStep};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn known_kinds_use_snake_case_wire_names() {
        let action: Action = serde_json::from_value(json!({
            "action": "media_play_pause",
            "target": null,
            "response": "Toggling playback"
        }))
        .expect("decode");
        assert_eq!(action.kind, ActionKind::MediaPlayPause);
        assert_eq!(action.target, None);
        assert_eq!(action.response, "Toggling playback");
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let action: Action =
            serde_json::from_value(json!({"action": "fly_drone", "response": "Up we go"}))
                .expect("decode");
        assert_eq!(action.kind, ActionKind::Other("fly_drone".to_string()));
        assert_eq!(action.kind.to_string(), "fly_drone");
    }

    #[test]
    fn numeric_target_is_stringified() {
        let step: ActionStep =
            serde_json::from_value(json!({"action": "volume_set", "target": 40})).expect("decode");
        assert_eq!(step.target.as_deref(), Some("40"));
    }

    #[test]
    fn empty_response_falls_back_to_acknowledgement() {
        let action = Action::new(ActionKind::LockScreen, None, "  ");
        assert_eq!(action.response, "Done");
    }

    #[test]
    fn composite_steps_are_not_serialized_for_single_actions() {
        let value = serde_json::to_value(Action::speak("hello")).expect("encode");
        assert_eq!(
            value,
            json!({"action": "speak", "target": null, "response": "hello"})
        );
    }
}
