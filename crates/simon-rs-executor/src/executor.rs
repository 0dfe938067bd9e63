//! Maps action kinds to desktop requests.

use crate::aliases::builtin_app_alias;
use crate::error::HostError;
use crate::host::{DesktopHost, MediaKey, PowerAction, VolumeChange};
use chrono::Local;
use directories::UserDirs;
use log::{debug, info, warn};
use simon_rs_config::ExecutorConfig;
use simon_rs_protocol::ActionKind;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const VOLUME_STEP: u8 = 10;
const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// Folders used for `~` expansion, open-file fallbacks and screenshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFolders {
    pub home: PathBuf,
    pub documents: PathBuf,
    pub downloads: PathBuf,
    pub desktop: PathBuf,
}

impl UserFolders {
    /// Folders of the current user, falling back to `<home>/<Name>`.
    pub fn detect() -> Option<Self> {
        let dirs = UserDirs::new()?;
        let home = dirs.home_dir().to_path_buf();
        Some(Self {
            documents: dirs
                .document_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| home.join("Documents")),
            downloads: dirs
                .download_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| home.join("Downloads")),
            desktop: dirs
                .desktop_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| home.join("Desktop")),
            home,
        })
    }

    /// Conventional layout below an arbitrary home directory.
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            documents: home.join("Documents"),
            downloads: home.join("Downloads"),
            desktop: home.join("Desktop"),
            home,
        }
    }
}

/// Executes single desktop actions through a [`DesktopHost`].
///
/// `execute` never fails loudly: unknown kinds, missing targets and host
/// errors all return `false`.
#[derive(Clone)]
pub struct Executor {
    host: Arc<dyn DesktopHost>,
    app_aliases: HashMap<String, String>,
    folders: Option<UserFolders>,
    screenshot_dir: Option<PathBuf>,
}

impl Executor {
    /// Create an executor for the given host using the current user's folders.
    pub fn new(host: Arc<dyn DesktopHost>, config: &ExecutorConfig) -> Self {
        Self {
            host,
            app_aliases: config
                .app_aliases
                .iter()
                .map(|(name, command)| (name.trim().to_lowercase(), command.clone()))
                .collect(),
            folders: UserFolders::detect(),
            screenshot_dir: config.screenshot_dir.clone(),
        }
    }

    /// Replace the folders used for path resolution.
    pub fn with_folders(mut self, folders: UserFolders) -> Self {
        self.folders = Some(folders);
        self
    }

    /// Run one action. Returns true on success.
    pub fn execute(&self, kind: &ActionKind, target: Option<&str>) -> bool {
        let target = target.map(str::trim).filter(|value| !value.is_empty());
        let result = match kind {
            ActionKind::Speak => return true,
            ActionKind::OpenApp => with_target(target, |name| self.open_app(name)),
            ActionKind::OpenFile => with_target(target, |path| self.open_file(path)),
            ActionKind::OpenUrl => with_target(target, |url| self.open_url(url)),
            ActionKind::SearchGoogle => {
                with_target(target, |query| self.search(GOOGLE_SEARCH_URL, query))
            }
            ActionKind::SearchYoutube => {
                with_target(target, |query| self.search(YOUTUBE_SEARCH_URL, query))
            }
            ActionKind::VolumeUp => self.host.volume(VolumeChange::Up(VOLUME_STEP)),
            ActionKind::VolumeDown => self.host.volume(VolumeChange::Down(VOLUME_STEP)),
            ActionKind::VolumeMute => self.host.volume(VolumeChange::ToggleMute),
            ActionKind::VolumeSet => match target.and_then(parse_volume_level) {
                Some(level) => self.host.volume(VolumeChange::Set(level)),
                None => {
                    warn!("invalid volume level (target={target:?})");
                    return false;
                }
            },
            ActionKind::MediaPlayPause => self.host.media(MediaKey::PlayPause),
            ActionKind::MediaNext => self.host.media(MediaKey::Next),
            ActionKind::MediaPrev => self.host.media(MediaKey::Previous),
            ActionKind::LockScreen => self.host.lock_screen(),
            ActionKind::Screenshot => self.screenshot(),
            ActionKind::Shutdown => self.host.power(PowerAction::Shutdown),
            ActionKind::Restart => self.host.power(PowerAction::Restart),
            ActionKind::Sleep => self.host.power(PowerAction::Sleep),
            ActionKind::Custom | ActionKind::Other(_) => {
                warn!("refusing unsupported action (kind={kind})");
                return false;
            }
        };
        match result {
            Ok(()) => {
                info!("action executed (kind={kind}, target={target:?})");
                true
            }
            Err(err) => {
                warn!("action failed (kind={kind}, target={target:?}): {err}");
                false
            }
        }
    }

    /// Launch command for a spoken app name: configured aliases, then built-ins, then the name itself.
    pub fn resolve_app(&self, name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        if let Some(command) = self.app_aliases.get(&lowered) {
            return command.clone();
        }
        builtin_app_alias(&lowered)
            .map(str::to_string)
            .unwrap_or(lowered)
    }

    /// Expand `~` and fall back to a well-known folder when a missing path names one.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = match (&self.folders, raw.strip_prefix('~')) {
            (Some(folders), Some(rest)) => {
                folders.home.join(rest.trim_start_matches(['/', '\\']))
            }
            _ => PathBuf::from(raw),
        };
        if path.exists() {
            return path;
        }
        let Some(folders) = &self.folders else {
            return path;
        };
        let lowered = raw.to_lowercase();
        if lowered.contains("documents") {
            folders.documents.clone()
        } else if lowered.contains("downloads") {
            folders.downloads.clone()
        } else if lowered.contains("desktop") {
            folders.desktop.clone()
        } else {
            path
        }
    }

    /// Where the next screenshot is written.
    pub fn screenshot_path(&self) -> PathBuf {
        let dir = self
            .screenshot_dir
            .clone()
            .or_else(|| self.folders.as_ref().map(|folders| folders.downloads.clone()))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!(
            "screenshot_{}.png",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    }

    fn open_app(&self, name: &str) -> Result<(), HostError> {
        let command = self.resolve_app(name);
        debug!("launching app (name={name}, command={command})");
        self.host.launch_app(&command)
    }

    fn open_file(&self, raw: &str) -> Result<(), HostError> {
        let path = self.resolve_path(raw);
        self.host.open_path(&path)
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        self.host.open_url(&normalize_url(url))
    }

    fn search(&self, base: &str, query: &str) -> Result<(), HostError> {
        self.host
            .open_url(&format!("{base}{}", urlencoding::encode(query)))
    }

    fn screenshot(&self) -> Result<(), HostError> {
        let path = self.screenshot_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.host.screenshot(&path)
    }
}

fn with_target(
    target: Option<&str>,
    handler: impl FnOnce(&str) -> Result<(), HostError>,
) -> Result<(), HostError> {
    match target {
        Some(value) => handler(value),
        None => Err(HostError::NotFound("action target".to_string())),
    }
}

/// Prefix `https://` unless the URL already names http or https.
pub(crate) fn normalize_url(url: &str) -> String {
    let lowered = url.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Integer volume level in 0..=100, tolerating a trailing percent sign.
pub(crate) fn parse_volume_level(raw: &str) -> Option<u8> {
    let level = raw.trim().trim_end_matches('%').trim().parse::<u8>().ok()?;
    (level <= 100).then_some(level)
}
