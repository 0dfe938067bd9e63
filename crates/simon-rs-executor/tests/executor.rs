use pretty_assertions::assert_eq;
use simon_rs_config::ExecutorConfig;
use simon_rs_executor::{
    Executor, MediaKey, PowerAction, UserFolders, VolumeChange, builtin_app_alias,
};
use simon_rs_protocol::ActionKind;
use simon_rs_test_utils::{HostCall, RecordingHost};
use std::sync::Arc;
use tempfile::tempdir;

fn executor_with(host: &RecordingHost, config: &ExecutorConfig, home: &std::path::Path) -> Executor {
    Executor::new(Arc::new(host.clone()), config).with_folders(UserFolders::under(home))
}

#[test]
fn speak_succeeds_without_touching_the_host() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::Speak, None));
    assert!(host.calls().is_empty());
}

#[test]
fn open_url_adds_scheme() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::OpenUrl, Some("github.com")));
    assert!(executor.execute(&ActionKind::OpenUrl, Some("http://example.com")));
    assert_eq!(
        host.calls(),
        vec![
            HostCall::OpenUrl("https://github.com".to_string()),
            HostCall::OpenUrl("http://example.com".to_string()),
        ]
    );
}

#[test]
fn searches_encode_the_query() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::SearchGoogle, Some("rust async traits")));
    assert!(executor.execute(&ActionKind::SearchYoutube, Some("lofi & chill")));
    assert_eq!(
        host.calls(),
        vec![
            HostCall::OpenUrl("https://www.google.com/search?q=rust%20async%20traits".to_string()),
            HostCall::OpenUrl(
                "https://www.youtube.com/results?search_query=lofi%20%26%20chill".to_string()
            ),
        ]
    );
}

#[test]
fn targeted_actions_fail_without_target() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(!executor.execute(&ActionKind::OpenApp, None));
    assert!(!executor.execute(&ActionKind::OpenUrl, Some("   ")));
    assert!(!executor.execute(&ActionKind::OpenApp, Some("")));
    assert!(!executor.execute(&ActionKind::SearchGoogle, None));
    assert!(host.calls().is_empty());
}

#[test]
fn volume_and_media_map_to_host_requests() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::VolumeUp, None));
    assert!(executor.execute(&ActionKind::VolumeDown, None));
    assert!(executor.execute(&ActionKind::VolumeMute, None));
    assert!(executor.execute(&ActionKind::VolumeSet, Some("40")));
    assert!(executor.execute(&ActionKind::MediaPlayPause, None));
    assert!(executor.execute(&ActionKind::MediaNext, None));
    assert!(executor.execute(&ActionKind::MediaPrev, None));
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Volume(VolumeChange::Up(10)),
            HostCall::Volume(VolumeChange::Down(10)),
            HostCall::Volume(VolumeChange::ToggleMute),
            HostCall::Volume(VolumeChange::Set(40)),
            HostCall::Media(MediaKey::PlayPause),
            HostCall::Media(MediaKey::Next),
            HostCall::Media(MediaKey::Previous),
        ]
    );
}

#[test]
fn volume_set_rejects_out_of_range_levels() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(!executor.execute(&ActionKind::VolumeSet, Some("150")));
    assert!(!executor.execute(&ActionKind::VolumeSet, Some("loud")));
    assert!(!executor.execute(&ActionKind::VolumeSet, None));
    assert!(host.calls().is_empty());
}

#[test]
fn power_and_lock_requests() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::LockScreen, None));
    assert!(executor.execute(&ActionKind::Shutdown, None));
    assert!(executor.execute(&ActionKind::Restart, None));
    assert!(executor.execute(&ActionKind::Sleep, None));
    assert_eq!(
        host.calls(),
        vec![
            HostCall::LockScreen,
            HostCall::Power(PowerAction::Shutdown),
            HostCall::Power(PowerAction::Restart),
            HostCall::Power(PowerAction::Sleep),
        ]
    );
}

#[test]
fn custom_and_unknown_kinds_are_refused() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(!executor.execute(&ActionKind::Custom, Some("anything")));
    assert!(!executor.execute(&ActionKind::from("launch_rocket"), None));
    assert!(host.calls().is_empty());
}

#[test]
fn host_failures_become_false() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::failing();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(!executor.execute(&ActionKind::VolumeUp, None));
    assert!(!executor.execute(&ActionKind::OpenUrl, Some("example.com")));
    assert_eq!(host.calls().len(), 2);
}

#[test]
fn configured_aliases_win_over_builtins() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let mut config = ExecutorConfig::default();
    config
        .app_aliases
        .insert("Chrome".to_string(), "chromium".to_string());
    let executor = executor_with(&host, &config, temp.path());

    assert!(executor.execute(&ActionKind::OpenApp, Some("chrome")));
    assert!(executor.execute(&ActionKind::OpenApp, Some("VS Code")));
    assert!(executor.execute(&ActionKind::OpenApp, Some("Obscure Tool")));

    let vscode = builtin_app_alias("vs code").expect("vs code alias").to_string();
    assert_eq!(
        host.calls(),
        vec![
            HostCall::LaunchApp("chromium".to_string()),
            HostCall::LaunchApp(vscode),
            HostCall::LaunchApp("obscure tool".to_string()),
        ]
    );
}

#[test]
fn open_file_expands_home() {
    let temp = tempdir().expect("tempdir");
    std::fs::write(temp.path().join("notes.txt"), "hi").expect("write");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    assert!(executor.execute(&ActionKind::OpenFile, Some("~/notes.txt")));
    assert_eq!(
        host.calls(),
        vec![HostCall::OpenPath(temp.path().join("notes.txt"))]
    );
}

#[test]
fn missing_paths_fall_back_to_named_folders() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());
    let folders = UserFolders::under(temp.path());

    assert_eq!(
        executor.resolve_path("C:/Users/someone/Documents/missing"),
        folders.documents
    );
    assert_eq!(executor.resolve_path("my downloads"), folders.downloads);
    assert_eq!(executor.resolve_path("~/Desktop"), folders.desktop);
    assert_eq!(
        executor.resolve_path("/definitely/not/here"),
        std::path::PathBuf::from("/definitely/not/here")
    );
}

#[test]
fn screenshots_go_to_configured_dir() {
    let temp = tempdir().expect("tempdir");
    let shots = temp.path().join("shots");
    let host = RecordingHost::new();
    let config = ExecutorConfig {
        screenshot_dir: Some(shots.clone()),
        ..ExecutorConfig::default()
    };
    let executor = executor_with(&host, &config, temp.path());

    assert!(executor.execute(&ActionKind::Screenshot, None));
    assert!(shots.is_dir());

    let calls = host.calls();
    assert_eq!(calls.len(), 1);
    let HostCall::Screenshot(path) = &calls[0] else {
        panic!("expected screenshot call, got {calls:?}");
    };
    assert_eq!(path.parent(), Some(shots.as_path()));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("file name");
    assert!(name.starts_with("screenshot_"));
    assert!(name.ends_with(".png"));
    assert_eq!(name.len(), "screenshot_20240101_120000.png".len());
}

#[test]
fn screenshots_default_to_downloads() {
    let temp = tempdir().expect("tempdir");
    let host = RecordingHost::new();
    let executor = executor_with(&host, &ExecutorConfig::default(), temp.path());

    let path = executor.screenshot_path();
    assert_eq!(path.parent(), Some(temp.path().join("Downloads").as_path()));
}
