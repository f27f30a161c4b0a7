mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::keys;
use crate::log::LogConfig;
use crate::menu_id::{self, RANGE_LEN};

pub use loader::{config_dir, config_path, load, try_load};

/// Top-level settings for sysmenu.
///
/// Loaded from `~/.config/sysmenu/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`. The host keeps
/// the settings behind an `Arc` and never mutates them in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Executable file names whose windows are never augmented.
    pub process_exclusions: Vec<String>,
    /// How requested preset dimensions become window dimensions.
    pub sizer: Sizer,
    /// Minimize the foreground window to the tray with Ctrl+Shift+Down.
    pub minimize_to_tray_shortcut: bool,
    /// Which parts of a window's state are restored from the store.
    pub save_selected_items: SavedItems,
    pub menu: MenuConfig,
    pub closer: Closer,
    pub logging: LogConfig,
}

/// Translation of preset dimensions into window dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sizer {
    /// The preset is the outer window size, including the invisible frame.
    #[default]
    WindowWithMargins,
    /// The preset is the visible window size; the invisible frame is added.
    WindowWithoutMargins,
    /// The preset is the client area; the non-client area is added.
    ClientArea,
}

/// Per-attribute switches for restoring persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedItems {
    pub size: bool,
    pub transparency: bool,
    pub priority: bool,
    pub alignment: bool,
    pub always_on_top: bool,
    pub hide_for_alt_tab: bool,
    pub minimize_to_tray_always: bool,
    pub buttons: bool,
    pub rollup: bool,
}

impl Default for SavedItems {
    fn default() -> Self {
        Self {
            size: true,
            transparency: true,
            priority: true,
            alignment: true,
            always_on_top: true,
            hide_for_alt_tab: true,
            minimize_to_tray_always: true,
            buttons: true,
            rollup: true,
        }
    }
}

/// Menu item visibility, hotkeys and the dynamic item lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Configuration names of fixed items that are not inserted.
    pub hidden: Vec<String>,
    pub hotkey: Vec<HotkeyBinding>,
    pub window_size: Vec<WindowSizeItem>,
    pub start_program: Vec<StartProgramItem>,
}

/// Binds a key combination to a fixed menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub item: String,
    pub keys: Vec<String>,
}

/// A resize preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSizeItem {
    pub title: String,
    pub width: i32,
    pub height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default)]
    pub keys: Vec<String>,
}

/// A launch template run against the window's process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartProgramItem {
    pub title: String,
    pub file_name: String,
    pub arguments: String,
    pub begin_parameter: String,
    pub end_parameter: String,
    pub show_window: bool,
    pub run_as: RunAs,
    pub use_window_working_directory: bool,
}

impl Default for StartProgramItem {
    fn default() -> Self {
        Self {
            title: String::new(),
            file_name: String::new(),
            arguments: String::new(),
            begin_parameter: "{".into(),
            end_parameter: "}".into(),
            show_window: true,
            run_as: RunAs::Normal,
            use_window_working_directory: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAs {
    #[default]
    Normal,
    Administrator,
}

/// The window-closer shortcut.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Closer {
    pub kind: CloserKind,
    /// Key combination. Used alone when `mouse_button` is `none`,
    /// otherwise held while the button is pressed.
    pub keys: Vec<String>,
    pub mouse_button: CloserButton,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloserKind {
    #[default]
    CloseForegroundWindow,
    CloseWindowUnderCursor,
    KillProcessWithForegroundWindow,
    KillProcessWithWindowUnderCursor,
}

impl CloserKind {
    pub fn targets_cursor(self) -> bool {
        matches!(
            self,
            Self::CloseWindowUnderCursor | Self::KillProcessWithWindowUnderCursor
        )
    }

    pub fn kills_process(self) -> bool {
        matches!(
            self,
            Self::KillProcessWithForegroundWindow | Self::KillProcessWithWindowUnderCursor
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloserButton {
    #[default]
    None,
    Left,
    Right,
    Middle,
}

impl Settings {
    /// Normalizes values loaded from disk.
    ///
    /// Lower-cases exclusions, drops dynamic entries that would overflow
    /// their identifier range and restores empty parameter delimiters.
    pub fn validate(&mut self) {
        for name in &mut self.process_exclusions {
            *name = name.trim().to_lowercase();
        }
        self.process_exclusions.retain(|n| !n.is_empty());

        let cap = RANGE_LEN as usize;
        self.menu.window_size.truncate(cap);
        self.menu.start_program.truncate(cap);

        for item in &mut self.menu.start_program {
            if item.begin_parameter.is_empty() {
                item.begin_parameter = "{".into();
            }
            if item.end_parameter.is_empty() {
                item.end_parameter = "}".into();
            }
        }

        if self.closer.keys.len() > keys::MAX_COMBINATION {
            self.closer.keys.clear();
        }
        self.logging.max_file_mb = self.logging.max_file_mb.clamp(1, 512);
    }

    /// Whether a process executable (file name only) is excluded.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.process_exclusions.iter().any(|e| *e == name)
    }

    /// Whether a fixed item is visible in the augmented menu.
    pub fn is_visible(&self, id: u32) -> bool {
        !self
            .menu
            .hidden
            .iter()
            .any(|name| menu_id::id_from_name(name) == Some(id))
    }

    /// Resolves every configured hotkey to `(command id, virtual keys)`.
    ///
    /// Item hotkeys and preset hotkeys are included; a closer without a
    /// mouse button contributes [`menu_id::CLOSER`]. Invalid entries are
    /// skipped with a warning.
    pub fn hotkeys(&self) -> Vec<(u32, Vec<u32>)> {
        let mut out = Vec::new();

        for binding in &self.menu.hotkey {
            let id = menu_id::id_from_name(&binding.item);
            match (id, keys::parse_combination(&binding.keys)) {
                (Some(id), Some(vks)) => out.push((id, vks)),
                _ => tracing::warn!(item = %binding.item, "ignoring invalid hotkey binding"),
            }
        }

        for (i, preset) in self.menu.window_size.iter().enumerate() {
            if preset.keys.is_empty() {
                continue;
            }
            match keys::parse_combination(&preset.keys) {
                Some(vks) => out.push((menu_id::size_preset(i), vks)),
                None => tracing::warn!(title = %preset.title, "ignoring invalid preset hotkey"),
            }
        }

        if self.closer.mouse_button == CloserButton::None
            && let Some(vks) = keys::parse_combination(&self.closer.keys)
        {
            out.push((menu_id::CLOSER, vks));
        }

        out
    }

    /// Display text of the hotkey bound to `id`, if any.
    pub fn hotkey_text(&self, id: u32) -> Option<String> {
        if let menu_id::MenuCommand::SizePreset(i) = menu_id::resolve(id) {
            return self
                .menu
                .window_size
                .get(i)
                .filter(|p| !p.keys.is_empty())
                .map(|p| keys::display_combination(&p.keys));
        }
        self.menu
            .hotkey
            .iter()
            .find(|b| menu_id::id_from_name(&b.item) == Some(id))
            .map(|b| keys::display_combination(&b.keys))
    }

    /// The closer's modifier keys when it is driven by a mouse button.
    pub fn closer_mouse_keys(&self) -> Option<(CloserButton, Vec<u32>)> {
        if self.closer.mouse_button == CloserButton::None {
            return None;
        }
        let vks = if self.closer.keys.is_empty() {
            Vec::new()
        } else {
            keys::parse_combination(&self.closer.keys)?
        };
        Some((self.closer.mouse_button, vks))
    }
}
