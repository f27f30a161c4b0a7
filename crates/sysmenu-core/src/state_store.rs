//! Persisted window states, one TOML file per host bitness.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::window::{WindowIdentity, WindowState};

/// Store file name for a host of the given bitness. The two hosts
/// never share a file.
pub fn file_name(is_64bit: bool) -> &'static str {
    if is_64bit { "windows64.toml" } else { "windows.toml" }
}

/// Store file name for the running host.
pub fn host_file_name() -> &'static str {
    file_name(cfg!(target_pointer_width = "64"))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    window: Vec<WindowState>,
}

/// Persisted states, at most one per [`WindowIdentity`].
#[derive(Debug, Default)]
pub struct WindowStateStore {
    path: Option<PathBuf>,
    entries: Vec<WindowState>,
}

impl WindowStateStore {
    /// An unbacked store; [`save`](Self::save) is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Reads the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; the next save overwrites it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<StoreFile>(&content) {
                Ok(file) => file.window,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring corrupt window store: {e}");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read window store: {e}");
                Vec::new()
            }
        };
        tracing::debug!(path = %path.display(), count = entries.len(), "window store loaded");
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes every entry back to disk.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = StoreFile {
            window: self.entries.clone(),
        };
        std::fs::write(path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn find(&self, identity: &WindowIdentity) -> Option<&WindowState> {
        self.entries.iter().find(|s| identity.matches(s))
    }

    /// Inserts `state`, replacing any entry with the same identity.
    /// States without an identity are ignored.
    pub fn replace(&mut self, state: &WindowState) {
        let Some(identity) = state.identity() else {
            return;
        };
        self.remove(&identity);
        self.entries.push(state.clone());
    }

    pub fn remove(&mut self, identity: &WindowIdentity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| !identity.matches(s));
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WindowState] {
        &self.entries
    }
}
