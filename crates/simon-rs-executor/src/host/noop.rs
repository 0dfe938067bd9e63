//! Host that refuses every request.

use super::{DesktopHost, MediaKey, PowerAction, VolumeChange};
use crate::error::HostError;
use log::debug;
use std::path::Path;

/// Host with no desktop capabilities, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl NoopHost {
    pub fn new() -> Self {
        Self
    }
}

impl DesktopHost for NoopHost {
    fn launch_app(&self, command: &str) -> Result<(), HostError> {
        debug!("noop host refused launch (command={command})");
        Err(HostError::Unsupported("launch_app"))
    }

    fn open_path(&self, _path: &Path) -> Result<(), HostError> {
        Err(HostError::Unsupported("open_path"))
    }

    fn open_url(&self, _url: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("open_url"))
    }

    fn volume(&self, _change: VolumeChange) -> Result<(), HostError> {
        Err(HostError::Unsupported("volume"))
    }

    fn media(&self, _key: MediaKey) -> Result<(), HostError> {
        Err(HostError::Unsupported("media"))
    }

    fn lock_screen(&self) -> Result<(), HostError> {
        Err(HostError::Unsupported("lock_screen"))
    }

    fn screenshot(&self, _path: &Path) -> Result<(), HostError> {
        Err(HostError::Unsupported("screenshot"))
    }

    fn power(&self, _action: PowerAction) -> Result<(), HostError> {
        Err(HostError::Unsupported("power"))
    }
}
