//! Errors raised inside skills. They never leave `Skill::execute`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Storage(#[from] simon_rs_memory::MemoryError),
    /// A remote payload was missing an expected field.
    #[error("unexpected response: missing {0}")]
    MissingField(&'static str),
}
