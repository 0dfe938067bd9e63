//! Desktop action execution for Simon.
//!
//! The [`Executor`] turns an action kind and target into a concrete desktop
//! request and hands it to a [`DesktopHost`]. Every outcome collapses to a
//! boolean; nothing here raises past `execute`.

mod aliases;
mod error;
mod executor;
mod host;

/// Built-in spoken-name to launch-command table.
pub use aliases::builtin_app_alias;
/// Host error type.
pub use error::HostError;
/// Action executor and the user folders it resolves paths against.
pub use executor::{Executor, UserFolders};
/// Host seam and bundled implementations.
pub use host::{DesktopHost, MediaKey, NoopHost, PowerAction, SystemHost, VolumeChange};
