use serde::{Deserialize, Serialize};

use crate::menu_id::{Alignment, Priority};

/// Window class of console host windows. Their executable path is not
/// stable across sessions, so they are keyed by class alone.
pub const CONSOLE_CLASS: &str = "ConsoleWindowClass";

/// Persistable snapshot of a window's customized attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowState {
    pub class_name: String,
    pub process_path: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Title of the resize preset that produced the size, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_preset: Option<String>,
    /// Transparency in percent (0 is opaque).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparency: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    pub always_on_top: bool,
    pub hide_for_alt_tab: bool,
    pub minimize_to_tray_always: bool,
    pub disable_minimize_button: bool,
    pub disable_maximize_button: bool,
    pub disable_close_button: bool,
    pub rolled_up: bool,
}

impl WindowState {
    pub fn identity(&self) -> Option<WindowIdentity> {
        WindowIdentity::of(&self.class_name, Some(&self.process_path))
    }
}

/// Key used to match persisted state to a live window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowIdentity {
    /// Console windows: class name alone.
    Console { class: String },
    /// Everything else: class name plus executable path.
    Program { class: String, path: String },
}

impl WindowIdentity {
    /// Builds the key for a window. Returns `None` when the class is
    /// empty, or when a non-console window has no resolvable path.
    pub fn of(class: &str, path: Option<&str>) -> Option<Self> {
        if class.is_empty() {
            return None;
        }
        if class == CONSOLE_CLASS {
            return Some(Self::Console {
                class: class.to_string(),
            });
        }
        let path = path.filter(|p| !p.is_empty())?;
        Some(Self::Program {
            class: class.to_string(),
            path: path.to_string(),
        })
    }

    /// Whether a stored entry belongs to this key.
    ///
    /// Paths compare case-insensitively, as the file system does.
    pub fn matches(&self, state: &WindowState) -> bool {
        match self {
            Self::Console { class } => state.class_name == *class,
            Self::Program { class, path } => {
                state.class_name == *class && state.process_path.eq_ignore_ascii_case(path)
            }
        }
    }
}
