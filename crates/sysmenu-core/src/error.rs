use std::path::PathBuf;

use crate::hook::HookKind;

/// Errors surfaced by the core.
///
/// Per-window handling never returns these to the message pump; they
/// are reserved for startup, persistence and user-initiated actions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize window state: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to install the {0} hook")]
    Hook(HookKind),

    #[error("failed to launch {file}: {reason}")]
    Launch { file: String, reason: String },

    #[error("screenshot: {0}")]
    Image(String),

    #[error("companion process: {0}")]
    Companion(String),

    #[error("{0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
