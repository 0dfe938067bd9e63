//! Host backed by the platform's own command-line helpers.
//!
//! Linux uses xdg-open, pactl, playerctl, loginctl and systemctl. macOS uses
//! open, osascript, pmset and screencapture. Windows uses `start`, rundll32
//! and shutdown. Anything without a helper reports `HostError::Unsupported`.

use super::{DesktopHost, MediaKey, PowerAction, VolumeChange};
use crate::error::HostError;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Seconds the power helpers wait so the spoken reply can finish.
const POWER_DELAY_SECS: u64 = 5;

/// Host driving the real desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }
}

/// Resolve a helper program on PATH.
fn locate(program: &str) -> Result<PathBuf, HostError> {
    which::which(program).map_err(|_| HostError::NotFound(program.to_string()))
}

/// Run a helper to completion and require a zero exit status.
fn run(program: &str, args: &[&str]) -> Result<(), HostError> {
    let path = locate(program)?;
    debug!("running helper (program={program}, args={args:?})");
    let status = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(HostError::CommandFailed {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

/// Start a program without waiting for it to exit.
fn spawn_detached(path: &Path, args: &[&str]) -> Result<(), HostError> {
    debug!("spawning (program={}, args={args:?})", path.display());
    Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// Run the first helper that is installed.
#[cfg(all(unix, not(target_os = "macos")))]
fn run_first(candidates: &[(&str, &[&str])]) -> Result<(), HostError> {
    let mut last = HostError::NotFound(
        candidates
            .iter()
            .map(|(program, _)| *program)
            .collect::<Vec<_>>()
            .join(", "),
    );
    for (program, args) in candidates {
        match run(program, args) {
            Ok(()) => return Ok(()),
            Err(HostError::NotFound(_)) => continue,
            Err(err) => last = err,
        }
    }
    Err(last)
}

impl DesktopHost for SystemHost {
    fn launch_app(&self, command: &str) -> Result<(), HostError> {
        #[cfg(target_os = "windows")]
        {
            run("cmd", &["/C", "start", "", command])
        }
        #[cfg(target_os = "macos")]
        {
            match locate(command) {
                Ok(path) => spawn_detached(&path, &[]),
                Err(_) => run("open", &["-a", command]),
            }
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let mut parts = command.split_whitespace();
            let program = parts
                .next()
                .ok_or_else(|| HostError::NotFound(command.to_string()))?;
            let args = parts.collect::<Vec<_>>();
            match locate(program) {
                Ok(path) => spawn_detached(&path, &args),
                Err(_) => run("gtk-launch", &[command])
                    .map_err(|_| HostError::NotFound(command.to_string())),
            }
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = command;
            Err(HostError::Unsupported("launch_app"))
        }
    }

    fn open_path(&self, path: &Path) -> Result<(), HostError> {
        if !path.exists() {
            return Err(HostError::NotFound(path.display().to_string()));
        }
        let display = path.to_string_lossy();
        #[cfg(target_os = "windows")]
        {
            run("cmd", &["/C", "start", "", &*display])
        }
        #[cfg(target_os = "macos")]
        {
            run("open", &[&*display])
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            spawn_detached(&locate("xdg-open")?, &[&*display])
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = display;
            Err(HostError::Unsupported("open_path"))
        }
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        webbrowser::open(url)?;
        Ok(())
    }

    fn volume(&self, change: VolumeChange) -> Result<(), HostError> {
        #[cfg(target_os = "macos")]
        {
            let script = match change {
                VolumeChange::Up(step) => format!(
                    "set volume output volume ((output volume of (get volume settings)) + {step})"
                ),
                VolumeChange::Down(step) => format!(
                    "set volume output volume ((output volume of (get volume settings)) - {step})"
                ),
                VolumeChange::ToggleMute => {
                    "set volume output muted not (output muted of (get volume settings))"
                        .to_string()
                }
                VolumeChange::Set(level) => format!("set volume output volume {level}"),
            };
            run("osascript", &["-e", &script])
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let sink = "@DEFAULT_SINK@";
            match change {
                VolumeChange::Up(step) => {
                    run("pactl", &["set-sink-volume", sink, &format!("+{step}%")])
                }
                VolumeChange::Down(step) => {
                    run("pactl", &["set-sink-volume", sink, &format!("-{step}%")])
                }
                VolumeChange::ToggleMute => run("pactl", &["set-sink-mute", sink, "toggle"]),
                VolumeChange::Set(level) => {
                    run("pactl", &["set-sink-volume", sink, &format!("{level}%")])
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = change;
            Err(HostError::Unsupported("volume"))
        }
    }

    fn media(&self, key: MediaKey) -> Result<(), HostError> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let command = match key {
                MediaKey::PlayPause => "play-pause",
                MediaKey::Next => "next",
                MediaKey::Previous => "previous",
            };
            run("playerctl", &[command])
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            let _ = key;
            Err(HostError::Unsupported("media"))
        }
    }

    fn lock_screen(&self) -> Result<(), HostError> {
        #[cfg(target_os = "windows")]
        {
            run("rundll32.exe", &["user32.dll,LockWorkStation"])
        }
        #[cfg(target_os = "macos")]
        {
            run("pmset", &["displaysleepnow"])
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            run_first(&[
                ("loginctl", &["lock-session"]),
                ("xdg-screensaver", &["lock"]),
            ])
        }
        #[cfg(not(any(unix, windows)))]
        {
            Err(HostError::Unsupported("lock_screen"))
        }
    }

    fn screenshot(&self, path: &Path) -> Result<(), HostError> {
        let target = path.to_string_lossy();
        #[cfg(target_os = "macos")]
        {
            run("screencapture", &["-x", &*target])
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            run_first(&[
                ("gnome-screenshot", &["-f", &*target]),
                ("grim", &[&*target]),
                ("import", &["-window", "root", &*target]),
            ])
        }
        #[cfg(not(unix))]
        {
            let _ = target;
            Err(HostError::Unsupported("screenshot"))
        }
    }

    fn power(&self, action: PowerAction) -> Result<(), HostError> {
        #[cfg(target_os = "windows")]
        {
            let delay = POWER_DELAY_SECS.to_string();
            match action {
                PowerAction::Shutdown => run("shutdown", &["/s", "/t", &delay]),
                PowerAction::Restart => run("shutdown", &["/r", "/t", &delay]),
                PowerAction::Sleep => {
                    run("rundll32.exe", &["powrprof.dll,SetSuspendState", "Sleep"])
                }
            }
        }
        #[cfg(unix)]
        {
            #[cfg(target_os = "macos")]
            let command = match action {
                PowerAction::Shutdown => "osascript -e 'tell app \"System Events\" to shut down'",
                PowerAction::Restart => "osascript -e 'tell app \"System Events\" to restart'",
                PowerAction::Sleep => "pmset sleepnow",
            };
            #[cfg(not(target_os = "macos"))]
            let command = match action {
                PowerAction::Shutdown => "systemctl poweroff",
                PowerAction::Restart => "systemctl reboot",
                PowerAction::Sleep => "systemctl suspend",
            };
            let script = format!("sleep {POWER_DELAY_SECS} && {command}");
            spawn_detached(&locate("sh")?, &["-c", &script])
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = action;
            Err(HostError::Unsupported("power"))
        }
    }
}
