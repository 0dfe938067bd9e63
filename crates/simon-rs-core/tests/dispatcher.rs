use pretty_assertions::assert_eq;
use simon_rs_config::ExecutorConfig;
use simon_rs_core::{ActionSource, Classifier, CommandRegistry, Dispatcher, FAILED_RESPONSE};
use simon_rs_executor::{Executor, MediaKey, UserFolders, VolumeChange};
use simon_rs_protocol::{Action, ActionStep, ChatOptions, ChatProvider, Role};
use simon_rs_skills::SkillDispatcher;
use simon_rs_test_utils::{FixedLLM, HostCall, RecordingChatLLM, RecordingHost, StubSkill};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn dispatcher(
    dir: &Path,
    llm: impl ChatProvider + 'static,
    host: &RecordingHost,
    skills: SkillDispatcher,
) -> Dispatcher {
    let classifier = Classifier::new(
        Arc::new(llm),
        ChatOptions {
            model: "llama3.2".to_string(),
            temperature: 0.3,
        },
    );
    let executor = Executor::new(Arc::new(host.clone()), &ExecutorConfig::default())
        .with_folders(UserFolders::under(dir));
    Dispatcher::new(
        CommandRegistry::load(dir.join("commands.json")),
        skills,
        classifier,
        executor,
    )
}

fn step(kind: &str, target: Option<&str>) -> ActionStep {
    ActionStep::new(kind, target.map(str::to_string))
}

#[tokio::test]
async fn composite_runs_every_step_and_keeps_its_response() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let (llm, seen) = RecordingChatLLM::new("unused");
    let mut dispatcher = dispatcher(temp.path(), llm, &host, SkillDispatcher::new());
    assert!(dispatcher.add_command(
        "goodnight",
        vec![
            step("volume_mute", None),
            step("launch_rocket", None),
            step("media_play_pause", None),
        ],
    ));

    let outcome = dispatcher.handle("Hey, goodnight everyone").await;
    assert_eq!(outcome.source, ActionSource::Command("goodnight".to_string()));
    assert_eq!(outcome.executed, vec![true, false, true]);
    assert_eq!(outcome.response, "Running your goodnight command.");
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Volume(VolumeChange::ToggleMute),
            HostCall::Media(MediaKey::PlayPause),
        ]
    );
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn composite_continues_past_host_failures() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::failing();
    let mut dispatcher = dispatcher(temp.path(), FixedLLM::new("unused"), &host, SkillDispatcher::new());
    assert!(dispatcher.add_command(
        "focus",
        vec![step("volume_mute", None), step("open_url", Some("github.com"))],
    ));

    let outcome = dispatcher.handle("focus").await;
    assert_eq!(outcome.executed, vec![false, false]);
    assert_eq!(outcome.response, "Running your focus command.");
    assert_eq!(host.calls().len(), 2);
}

#[tokio::test]
async fn failed_single_action_apologizes() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::failing();
    let llm = FixedLLM::new(r#"{"action": "open_app", "target": "chrome", "response": "Opening Chrome"}"#);
    let mut dispatcher = dispatcher(temp.path(), llm, &host, SkillDispatcher::new());

    let outcome = dispatcher.handle("open chrome").await;
    assert_eq!(outcome.source, ActionSource::Classifier);
    assert_eq!(outcome.executed, vec![false]);
    assert_eq!(outcome.response, FAILED_RESPONSE);
    assert_eq!(outcome.action.response, "Opening Chrome");
}

#[tokio::test]
async fn successful_single_action_keeps_response() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let llm = FixedLLM::new(r#"{"action": "open_url", "target": "youtube.com", "response": "Opening YouTube"}"#);
    let mut dispatcher = dispatcher(temp.path(), llm, &host, SkillDispatcher::new());

    let outcome = dispatcher.handle("go to youtube").await;
    assert_eq!(outcome.executed, vec![true]);
    assert_eq!(outcome.response, "Opening YouTube");
    assert_eq!(
        host.calls(),
        vec![HostCall::OpenUrl("https://youtube.com".to_string())]
    );
}

#[tokio::test]
async fn speech_never_reaches_the_host() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let mut dispatcher = dispatcher(temp.path(), FixedLLM::new("It's 3 PM."), &host, SkillDispatcher::new());

    let outcome = dispatcher.handle("what time is it").await;
    assert_eq!(outcome.action, Action::speak("It's 3 PM."));
    assert!(outcome.executed.is_empty());
    assert_eq!(outcome.response, "It's 3 PM.");
    assert!(host.calls().is_empty());
    assert_eq!(dispatcher.history().len(), 2);
}

#[tokio::test]
async fn commands_come_before_skills_and_skills_before_the_model() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let (llm, seen) = RecordingChatLLM::new("model reply");
    let weather = StubSkill::new("weather", vec!["weather"], Action::speak("Sunny"));
    let mut skills = SkillDispatcher::new();
    skills.register(Arc::new(weather.clone()));
    let mut dispatcher = dispatcher(temp.path(), llm, &host, skills);
    assert!(dispatcher.add_command("weather report", vec![step("open_url", Some("wttr.in"))]));

    let resolution = dispatcher.resolve("weather report please").await;
    assert_eq!(resolution.source, ActionSource::Command("weather report".to_string()));

    let resolution = dispatcher.resolve("what's the weather like").await;
    assert_eq!(resolution.source, ActionSource::Skill("weather".to_string()));
    assert_eq!(resolution.action, Action::speak("Sunny"));
    assert_eq!(weather.seen(), vec!["what's the weather like".to_string()]);

    let resolution = dispatcher.resolve("tell me a joke").await;
    assert_eq!(resolution.source, ActionSource::Classifier);
    assert_eq!(resolution.action, Action::speak("model reply"));
    assert_eq!(seen.lock().len(), 1);
}

#[tokio::test]
async fn skill_context_reaches_the_model() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let (llm, seen) = RecordingChatLLM::new("Your name is Ada.");
    let facts = StubSkill::new("knowledge", vec!["remember"], Action::speak("ok"))
        .with_context("Known facts about the user:\n  - name: Ada");
    let mut skills = SkillDispatcher::new();
    skills.register(Arc::new(facts));
    let mut dispatcher = dispatcher(temp.path(), llm, &host, skills);

    dispatcher.handle("who am i").await;
    let seen = seen.lock();
    let prompt = &seen[0].messages.last().expect("user turn").content;
    assert!(prompt.contains("Known facts about the user:\n  - name: Ada"));
}

#[tokio::test]
async fn history_can_be_cleared() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let mut dispatcher = dispatcher(temp.path(), FixedLLM::new("Hi!"), &host, SkillDispatcher::new());

    dispatcher.handle("hello").await;
    let roles = dispatcher
        .history()
        .turns()
        .map(|turn| turn.role)
        .collect::<Vec<_>>();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);

    dispatcher.clear_history();
    assert!(dispatcher.history().is_empty());
}

#[tokio::test]
async fn command_management_round_trip() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let mut dispatcher = dispatcher(temp.path(), FixedLLM::new("ok"), &host, SkillDispatcher::new());

    assert!(dispatcher.add_command("Movie Time", vec![step("volume_set", Some("80"))]));
    assert_eq!(dispatcher.list_commands(), vec!["movie time".to_string()]);
    assert!(dispatcher.remove_command("movie time"));
    assert!(!dispatcher.remove_command("movie time"));
    dispatcher.reload_commands();
    assert!(dispatcher.list_commands().is_empty());
}
