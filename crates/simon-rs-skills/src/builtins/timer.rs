//! Countdown timers and reminders.
//!
//! Each timer runs as an independent tokio task. When it fires it is marked
//! inactive and its message is announced through the optional speaker.

use crate::skill::Skill;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::{info, warn};
use parking_lot::RwLock;
use regex::Regex;
use simon_rs_protocol::{Action, Speaker};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

const TRIGGERS: &[&str] = &[
    "timer",
    "remind",
    "reminder",
    "alarm",
    "wake me",
    "minutes",
    "seconds",
    "hours",
];
const DEFAULT_MESSAGE: &str = "Timer complete!";
const UNPARSEABLE: &str =
    "Sorry, I couldn't understand the duration. Try 'set a timer for 5 minutes'.";
/// Longest timer accepted, one week.
pub const MAX_TIMER_SECS: u64 = 7 * 24 * 3_600;
const TOO_LONG: &str = "Sorry, I can only set timers for up to a week.";

/// One regex per unit family; each family contributes at most once.
static DURATION_UNITS: LazyLock<Vec<(Regex, u64)>> = LazyLock::new(|| {
    [
        (r"(\d+)\s*(?:hours?|hrs?)\b", 3_600),
        (r"(\d+)\s*(?:minutes?|mins?)\b", 60),
        (r"(\d+)\s*(?:seconds?|secs?)\b", 1),
    ]
    .into_iter()
    .filter_map(|(pattern, multiplier)| Regex::new(pattern).ok().map(|re| (re, multiplier)))
    .collect()
});
static MESSAGE_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:to|that|about)\s+(.+)$").ok());
static TIMER_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:timer|number|#)\s*(\d+)").ok());
static CANCEL_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:cancel|stop)\b").ok());
static SCHEDULE_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:set|start|remind|wake me)\b").ok());

/// Total seconds named in the utterance, or `None` when no positive duration is present.
///
/// "5 minutes" is 300, "1 hour 30 minutes" is 5400.
pub fn parse_duration(utterance: &str) -> Option<u64> {
    let lowered = utterance.to_lowercase();
    let total = DURATION_UNITS
        .iter()
        .filter_map(|(re, multiplier)| {
            re.captures(&lowered)
                .and_then(|caps| caps.get(1))
                .and_then(|value| value.as_str().parse::<u64>().ok())
                .map(|value| value.saturating_mul(*multiplier))
        })
        .fold(0u64, u64::saturating_add);
    (total > 0).then_some(total)
}

/// True when the utterance asks to cancel rather than schedule.
///
/// "cancel my 5 minute timer" cancels; "set a timer for 5 minutes to stop the
/// oven" schedules, because a scheduling verb comes before "stop".
pub fn is_cancel_request(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    let first = |re: &LazyLock<Option<Regex>>| {
        re.as_ref()
            .and_then(|re| re.find(&lowered))
            .map(|found| found.start())
    };
    match (first(&CANCEL_WORD), first(&SCHEDULE_WORD)) {
        (Some(cancel), Some(schedule)) => cancel < schedule,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Reminder text after "to", "that" or "about", or the default message.
pub fn extract_message(utterance: &str) -> String {
    let lowered = utterance.to_lowercase();
    MESSAGE_MARKER
        .as_ref()
        .and_then(|re| re.captures(&lowered))
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
}

/// Spoken form of a duration: seconds below a minute, whole minutes below an hour, whole hours above.
pub fn describe_duration(seconds: u64) -> String {
    fn plural(count: u64, unit: &str) -> String {
        if count == 1 {
            format!("{count} {unit}")
        } else {
            format!("{count} {unit}s")
        }
    }
    if seconds < 60 {
        format!("{seconds} seconds")
    } else if seconds < 3_600 {
        plural(seconds / 60, "minute")
    } else {
        plural(seconds / 3_600, "hour")
    }
}

/// A scheduled timer. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTimer {
    pub id: u64,
    pub duration: Duration,
    pub message: String,
    pub end_time: DateTime<Local>,
    pub active: bool,
}

/// Sets, lists and cancels timers.
pub struct TimerSkill {
    timers: Arc<RwLock<Vec<ActiveTimer>>>,
    next_id: AtomicU64,
    announcer: Option<Arc<dyn Speaker>>,
}

impl Default for TimerSkill {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TimerSkill {
    /// Create a timer skill that announces fired timers through `announcer`.
    pub fn new(announcer: Option<Arc<dyn Speaker>>) -> Self {
        Self {
            timers: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
            announcer,
        }
    }

    /// Start a timer and return its id. Must be called inside a tokio runtime.
    ///
    /// Returns `None` without scheduling when the duration exceeds
    /// [`MAX_TIMER_SECS`] or the end time cannot be represented.
    pub fn schedule(&self, duration: Duration, message: impl Into<String>) -> Option<u64> {
        if duration.as_secs() > MAX_TIMER_SECS {
            warn!("timer rejected, too long (secs={})", duration.as_secs());
            return None;
        }
        let end_time = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|delta| Local::now().checked_add_signed(delta))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = message.into();
        self.timers.write().push(ActiveTimer {
            id,
            duration,
            message: message.clone(),
            end_time,
            active: true,
        });
        info!("timer scheduled (id={id}, secs={})", duration.as_secs());

        let timers = self.timers.clone();
        let announcer = self.announcer.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let fired = {
                let mut timers = timers.write();
                match timers.iter_mut().find(|timer| timer.id == id && timer.active) {
                    Some(timer) => {
                        timer.active = false;
                        true
                    }
                    None => false,
                }
            };
            if !fired {
                return;
            }
            info!("timer fired (id={id}, message={message})");
            if let Some(announcer) = announcer {
                if let Err(err) = announcer.speak(&message).await {
                    warn!("failed to announce timer (id={id}): {err}");
                }
            }
        });
        Some(id)
    }

    /// Deactivate a timer before it fires. Returns false for unknown or finished timers.
    pub fn cancel(&self, id: u64) -> bool {
        let mut timers = self.timers.write();
        match timers.iter_mut().find(|timer| timer.id == id && timer.active) {
            Some(timer) => {
                timer.active = false;
                info!("timer cancelled (id={id})");
                true
            }
            None => false,
        }
    }

    /// Deactivate every running timer and return how many were stopped.
    pub fn cancel_all(&self) -> usize {
        let mut timers = self.timers.write();
        let mut cancelled = 0;
        for timer in timers.iter_mut().filter(|timer| timer.active) {
            timer.active = false;
            cancelled += 1;
        }
        cancelled
    }

    /// Timers that have not fired or been cancelled.
    pub fn active_timers(&self) -> Vec<ActiveTimer> {
        self.timers
            .read()
            .iter()
            .filter(|timer| timer.active)
            .cloned()
            .collect()
    }

    fn cancel_from(&self, utterance: &str) -> Action {
        let lowered = utterance.to_lowercase();
        let requested = TIMER_ID
            .as_ref()
            .and_then(|re| re.captures(&lowered))
            .and_then(|caps| caps.get(1))
            .and_then(|value| value.as_str().parse::<u64>().ok());
        match requested {
            Some(id) if self.cancel(id) => Action::speak(format!("Cancelled timer {id}.")),
            Some(id) => Action::speak(format!("I don't have a timer {id} running.")),
            None => match self.cancel_all() {
                0 => Action::speak("There are no active timers."),
                1 => Action::speak("Cancelled your timer."),
                count => Action::speak(format!("Cancelled {count} timers.")),
            },
        }
    }
}

#[async_trait]
impl Skill for TimerSkill {
    fn name(&self) -> &str {
        "timer"
    }

    fn description(&self) -> &str {
        "Set timers, alarms, and reminders"
    }

    fn triggers(&self) -> &[&str] {
        TRIGGERS
    }

    async fn execute(&self, utterance: &str) -> Action {
        if is_cancel_request(utterance) {
            return self.cancel_from(utterance);
        }
        let Some(seconds) = parse_duration(utterance) else {
            return Action::speak(UNPARSEABLE);
        };
        match self.schedule(Duration::from_secs(seconds), extract_message(utterance)) {
            Some(_) => Action::speak(format!("Timer set for {}.", describe_duration(seconds))),
            None => Action::speak(TOO_LONG),
        }
    }

    fn context(&self) -> Option<String> {
        let now = Local::now();
        let lines = self
            .active_timers()
            .into_iter()
            .filter_map(|timer| {
                let remaining = (timer.end_time - now).num_seconds();
                (remaining > 0).then(|| {
                    format!(
                        "  - {}m {}s remaining: {}",
                        remaining / 60,
                        remaining % 60,
                        timer.message
                    )
                })
            })
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return None;
        }
        Some(format!("Active timers:\n{}", lines.join("\n")))
    }
}
