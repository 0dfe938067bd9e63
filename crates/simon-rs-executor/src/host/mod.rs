//! Desktop host interface and bundled implementations.

mod noop;
mod system;

pub use noop::NoopHost;
pub use system::SystemHost;

use crate::error::HostError;
use std::path::Path;

/// Relative or absolute change to the output volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Raise by a percentage of full scale.
    Up(u8),
    /// Lower by a percentage of full scale.
    Down(u8),
    ToggleMute,
    /// Set an absolute level, 0 to 100.
    Set(u8),
}

/// Media transport key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKey {
    PlayPause,
    Next,
    Previous,
}

/// Power state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Shutdown,
    Restart,
    Sleep,
}

/// Operating system seam used by the executor.
///
/// Requests arrive fully resolved (alias applied, path expanded, URL built).
/// Implementations are synchronous and best-effort.
pub trait DesktopHost: Send + Sync {
    /// Launch an application by command or registered name.
    fn launch_app(&self, command: &str) -> Result<(), HostError>;

    /// Open a file or folder with its default handler.
    fn open_path(&self, path: &Path) -> Result<(), HostError>;

    /// Open a URL in the default browser.
    fn open_url(&self, url: &str) -> Result<(), HostError>;

    fn volume(&self, change: VolumeChange) -> Result<(), HostError>;

    fn media(&self, key: MediaKey) -> Result<(), HostError>;

    fn lock_screen(&self) -> Result<(), HostError>;

    /// Capture the screen into `path` (PNG).
    fn screenshot(&self, path: &Path) -> Result<(), HostError>;

    fn power(&self, action: PowerAction) -> Result<(), HostError>;
}
