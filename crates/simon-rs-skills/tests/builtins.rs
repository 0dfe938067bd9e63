use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use simon_rs_config::{
    FilesSkillConfig, SimonConfig, SkillsConfig, StorageConfig, WeatherSkillConfig,
};
use simon_rs_protocol::{Action, Speaker};
use simon_rs_skills::{
    KnowledgeSkill, Skill, SkillDispatcher, TimerSkill, WeatherSkill, builtin_dispatcher,
};
use simon_rs_test_utils::{RecordingSpeaker, StubSkill};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

async fn wttr(
    Path(location): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let format = params.get("format").cloned().unwrap_or_default();
    Json(json!({
        "current_condition": [{
            "temp_C": "21",
            "temp_F": "70",
            "weatherDesc": [{"value": format!("Sunny ({format})")}],
            "humidity": "40"
        }],
        "nearest_area": [{"areaName": [{"value": location}]}]
    }))
}

async fn spawn_weather_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

fn weather_config(endpoint: String) -> WeatherSkillConfig {
    WeatherSkillConfig {
        endpoint,
        default_location: "London".to_string(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn weather_reports_current_conditions() {
    let endpoint = spawn_weather_server(Router::new().route("/{location}", get(wttr))).await;
    let skill = WeatherSkill::new(&weather_config(endpoint)).expect("skill");

    let action = skill.execute("What's the weather in Oslo?").await;
    assert_eq!(
        action,
        Action::speak("In oslo, it's currently 21°C (70°F), sunny (j1), with 40% humidity.")
    );

    let action = skill.execute("is it cold, what's the forecast").await;
    assert_eq!(
        action.response,
        "In London, it's currently 21°C (70°F), sunny (j1), with 40% humidity."
    );
}

#[tokio::test]
async fn weather_failures_are_spoken() {
    let router = Router::new().route(
        "/{location}",
        get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let endpoint = spawn_weather_server(router).await;
    let skill = WeatherSkill::new(&weather_config(endpoint)).expect("skill");

    let action = skill.execute("weather").await;
    assert!(action.kind.is_speak());
    assert!(
        action
            .response
            .starts_with("Sorry, I couldn't get the weather:"),
        "unexpected response: {}",
        action.response
    );
}

#[tokio::test]
async fn timers_announce_when_they_fire() {
    let speaker = RecordingSpeaker::new();
    let announcer: Arc<dyn Speaker> = Arc::new(speaker.clone());
    let timers = TimerSkill::new(Some(announcer));

    let first = timers.schedule(Duration::from_millis(20), "tea is ready");
    let second = timers.schedule(Duration::from_secs(60), "never spoken");
    assert_eq!((first, second), (Some(1), Some(2)));
    assert_eq!(timers.active_timers().len(), 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(speaker.spoken(), vec!["tea is ready".to_string()]);
    assert_eq!(timers.active_timers().len(), 1);
    assert!(timers.context().expect("context").contains("never spoken"));

    let reply = timers.execute("cancel timer 2").await;
    assert_eq!(reply.response, "Cancelled timer 2.");
    assert!(timers.active_timers().is_empty());
    assert_eq!(timers.context(), None);
}

#[tokio::test]
async fn cancelled_timers_stay_silent() {
    let speaker = RecordingSpeaker::new();
    let announcer: Arc<dyn Speaker> = Arc::new(speaker.clone());
    let timers = TimerSkill::new(Some(announcer));

    let reply = timers
        .execute("Set a timer for 1 second to stretch")
        .await;
    assert_eq!(reply.response, "Timer set for 1 seconds.");
    assert_eq!(timers.execute("stop the timer").await.response, "Cancelled your timer.");

    tokio::time::sleep(Duration::from_millis(1_300)).await;
    assert!(speaker.spoken().is_empty());
}

#[tokio::test]
async fn knowledge_survives_reload() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("knowledge.json");

    let skill = KnowledgeSkill::load(&path);
    let reply = skill.execute("Remember that my dog's name is Rex").await;
    assert!(reply.kind.is_speak());

    let reloaded = KnowledgeSkill::load(&path);
    let context = reloaded.context().expect("context");
    assert!(context.starts_with("Known facts about the user:"));
    assert!(context.to_lowercase().contains("rex"));
}

#[tokio::test]
async fn builtin_dispatcher_registers_enabled_skills_in_order() {
    let temp = tempdir().expect("tempdir");
    let config = SimonConfig::builder()
        .storage(StorageConfig {
            commands_path: Some(temp.path().join("commands.json")),
            knowledge_path: Some(temp.path().join("knowledge.json")),
        })
        .skills(SkillsConfig {
            enabled: vec!["files".into(), "weather".into(), "timer".into(), "knowledge".into()],
            weather: WeatherSkillConfig::default(),
            files: FilesSkillConfig {
                root: Some(temp.path().to_path_buf()),
            },
        })
        .build();

    let dispatcher = builtin_dispatcher(&config, None).expect("dispatcher");
    let names = dispatcher
        .list()
        .into_iter()
        .map(|summary| summary.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["weather", "timer", "knowledge", "files"]);
}

#[tokio::test]
async fn builtin_dispatcher_skips_disabled_skills() {
    let temp = tempdir().expect("tempdir");
    let config = SimonConfig::builder()
        .skills(SkillsConfig {
            enabled: vec!["timer".into()],
            weather: WeatherSkillConfig::default(),
            files: FilesSkillConfig {
                root: Some(temp.path().to_path_buf()),
            },
        })
        .build();

    let dispatcher = builtin_dispatcher(&config, None).expect("dispatcher");
    assert_eq!(dispatcher.len(), 1);
    assert!(dispatcher.find("what's the weather").is_none());
    assert!(dispatcher.find("set a timer for 5 minutes").is_some());
}

#[tokio::test]
async fn first_matching_skill_wins() {
    let first = StubSkill::new("first", vec!["lights"], Action::speak("first"));
    let second = StubSkill::new("second", vec!["lights", "fan"], Action::speak("second"))
        .with_context("fan is on");
    let mut dispatcher = SkillDispatcher::new();
    dispatcher.register(Arc::new(first.clone()));
    dispatcher.register(Arc::new(second.clone()));

    let action = dispatcher.dispatch("Turn on the LIGHTS").await.expect("action");
    assert_eq!(action.response, "first");
    assert_eq!(first.seen(), vec!["Turn on the LIGHTS".to_string()]);
    assert!(second.seen().is_empty());

    let action = dispatcher.dispatch("fan speed").await.expect("action");
    assert_eq!(action.response, "second");
    assert_eq!(dispatcher.dispatch("play music").await, None);
    assert_eq!(dispatcher.context(), "fan is on");
}
