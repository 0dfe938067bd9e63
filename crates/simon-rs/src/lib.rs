//! Public SDK surface for Simon.
//!
//! This crate re-exports the building blocks of the assistant and provides
//! the console voice adapters used by the `simon` binary.

pub mod console;

/// Re-export for convenience.
pub use simon_rs_config as config;
pub use simon_rs_core as core;
/// Re-export for convenience.
pub use simon_rs_executor as executor;
/// Re-export for convenience.
pub use simon_rs_memory as memory;
/// Re-export for convenience.
pub use simon_rs_protocol as protocol;
pub use simon_rs_skills as skills;

/// Initialize `env_logger` with millisecond timestamps and `RUST_LOG` filtering.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
