use parking_lot::Mutex;
use simon_rs_executor::{DesktopHost, HostError, MediaKey, PowerAction, VolumeChange};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A request received by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    LaunchApp(String),
    OpenPath(PathBuf),
    OpenUrl(String),
    Volume(VolumeChange),
    Media(MediaKey),
    LockScreen,
    Screenshot(PathBuf),
    Power(PowerAction),
}

/// Desktop host that records requests instead of performing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that records requests and then reports failure for each.
    pub fn failing() -> Self {
        let host = Self::default();
        host.set_failing(true);
        host
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: HostCall) -> Result<(), HostError> {
        self.calls.lock().push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(HostError::Unsupported("recording host set to fail"))
        } else {
            Ok(())
        }
    }
}

impl DesktopHost for RecordingHost {
    fn launch_app(&self, command: &str) -> Result<(), HostError> {
        self.record(HostCall::LaunchApp(command.to_string()))
    }

    fn open_path(&self, path: &Path) -> Result<(), HostError> {
        self.record(HostCall::OpenPath(path.to_path_buf()))
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        self.record(HostCall::OpenUrl(url.to_string()))
    }

    fn volume(&self, change: VolumeChange) -> Result<(), HostError> {
        self.record(HostCall::Volume(change))
    }

    fn media(&self, key: MediaKey) -> Result<(), HostError> {
        self.record(HostCall::Media(key))
    }

    fn lock_screen(&self) -> Result<(), HostError> {
        self.record(HostCall::LockScreen)
    }

    fn screenshot(&self, path: &Path) -> Result<(), HostError> {
        self.record(HostCall::Screenshot(path.to_path_buf()))
    }

    fn power(&self, action: PowerAction) -> Result<(), HostError> {
        self.record(HostCall::Power(action))
    }
}
