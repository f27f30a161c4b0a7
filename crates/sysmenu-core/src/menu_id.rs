//! The flat menu-command identifier namespace.
//!
//! OS system commands live at `0xF000` and above. Fixed custom commands
//! occupy `0x0010..0x0200`. Each dynamic block (move to monitor, resize
//! preset, start program) spans [`RANGE_LEN`] identifiers from its base,
//! so `base + i` always recovers configuration entry `i`.

use serde::{Deserialize, Serialize};

pub const SC_SIZE: u32 = 0xF000;
pub const SC_MOVE: u32 = 0xF010;
pub const SC_MINIMIZE: u32 = 0xF020;
pub const SC_MAXIMIZE: u32 = 0xF030;
pub const SC_CLOSE: u32 = 0xF060;
pub const SC_RESTORE: u32 = 0xF120;

pub const INFORMATION: u32 = 0x0010;
pub const ROLLUP: u32 = 0x0011;
pub const AERO_GLASS: u32 = 0x0012;
pub const TOPMOST: u32 = 0x0013;
pub const SEND_TO_BOTTOM: u32 = 0x0014;
pub const OPEN_FILE_IN_EXPLORER: u32 = 0x0015;
pub const COPY_WINDOW_TITLE: u32 = 0x0016;
pub const COPY_FULL_PROCESS_PATH: u32 = 0x0017;
pub const CLEAR_CLIPBOARD: u32 = 0x0018;
pub const DRAG_BY_MOUSE: u32 = 0x0019;
pub const MINIMIZE_TO_TRAY: u32 = 0x001A;
pub const MINIMIZE_ALWAYS_TO_TRAY: u32 = 0x001B;
pub const SUSPEND_TO_TRAY: u32 = 0x001C;
pub const HIDE_FOR_ALT_TAB: u32 = 0x001D;
pub const CLICK_THROUGH: u32 = 0x001E;
pub const MINIMIZE_OTHER_WINDOWS: u32 = 0x001F;
pub const CLOSE_OTHER_WINDOWS: u32 = 0x0020;
pub const DISABLE_MINIMIZE_BUTTON: u32 = 0x0021;
pub const DISABLE_MAXIMIZE_BUTTON: u32 = 0x0022;
pub const DISABLE_CLOSE_BUTTON: u32 = 0x0023;
pub const SAVE_SELECTED_ITEMS: u32 = 0x0024;
pub const SAVE_SCREENSHOT: u32 = 0x0025;
pub const COPY_SCREENSHOT: u32 = 0x0026;
pub const COPY_WINDOW_TEXT: u32 = 0x0027;

pub const SIZE_DEFAULT: u32 = 0x0030;
pub const SIZE_CUSTOM: u32 = 0x0031;

pub const TRANS_DEFAULT: u32 = 0x0040;
pub const TRANS_CUSTOM: u32 = 0x0041;
/// `TRANS_00 + k` is the preset for `k * 10` percent transparency.
pub const TRANS_00: u32 = 0x0050;
pub const TRANS_100: u32 = TRANS_00 + 10;

pub const ALIGN_DEFAULT: u32 = 0x0060;
pub const ALIGN_CUSTOM: u32 = 0x0061;
const ALIGN_FIRST: u32 = 0x0070;

const PRIORITY_FIRST: u32 = 0x0080;

/// Internal command raised by the window-closer key combination.
/// Never inserted into a menu.
pub const CLOSER: u32 = 0x01F0;

pub const MOVE_TO_BASE: u32 = 0x0200;
pub const SIZE_PRESET_BASE: u32 = 0x0300;
pub const START_PROGRAM_BASE: u32 = 0x0400;
pub const RANGE_LEN: u32 = 0x0100;

/// Commands that describe transient window states and are never persisted.
pub const TRANSIENT: [u32; 6] = [SC_MOVE, SC_MINIMIZE, SC_MAXIMIZE, SC_RESTORE, SC_SIZE, SC_CLOSE];

/// A decoded command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Fixed(u32),
    MoveTo(usize),
    SizePreset(usize),
    StartProgram(usize),
}

/// Resolves an identifier into a fixed command or a dynamic range index.
pub fn resolve(id: u32) -> MenuCommand {
    let in_range = |base: u32| (base..base + RANGE_LEN).contains(&id);
    if in_range(MOVE_TO_BASE) {
        MenuCommand::MoveTo((id - MOVE_TO_BASE) as usize)
    } else if in_range(SIZE_PRESET_BASE) {
        MenuCommand::SizePreset((id - SIZE_PRESET_BASE) as usize)
    } else if in_range(START_PROGRAM_BASE) {
        MenuCommand::StartProgram((id - START_PROGRAM_BASE) as usize)
    } else {
        MenuCommand::Fixed(id)
    }
}

pub fn move_to(index: usize) -> u32 {
    MOVE_TO_BASE + index as u32
}

pub fn size_preset(index: usize) -> u32 {
    SIZE_PRESET_BASE + index as u32
}

pub fn start_program(index: usize) -> u32 {
    START_PROGRAM_BASE + index as u32
}

/// Preset identifier for a transparency percentage (multiple of ten).
pub fn transparency(percent: u8) -> Option<u32> {
    (percent <= 100 && percent % 10 == 0).then(|| TRANS_00 + u32::from(percent / 10))
}

/// Transparency percentage for a preset identifier.
pub fn transparency_percent(id: u32) -> Option<u8> {
    (TRANS_00..=TRANS_100)
        .contains(&id)
        .then(|| ((id - TRANS_00) * 10) as u8)
}

/// Mutually exclusive groups of checkable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Size,
    Transparency,
    Alignment,
    Priority,
}

impl Group {
    pub fn contains(self, id: u32) -> bool {
        match self {
            Self::Size => {
                id == SIZE_DEFAULT || id == SIZE_CUSTOM || matches!(resolve(id), MenuCommand::SizePreset(_))
            }
            Self::Transparency => {
                id == TRANS_DEFAULT || id == TRANS_CUSTOM || (TRANS_00..=TRANS_100).contains(&id)
            }
            Self::Alignment => {
                id == ALIGN_DEFAULT || id == ALIGN_CUSTOM || Alignment::from_id(id).is_some()
            }
            Self::Priority => Priority::from_id(id).is_some(),
        }
    }
}

/// Process priority classes, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    RealTime,
    High,
    AboveNormal,
    Normal,
    BelowNormal,
    Idle,
}

impl Priority {
    pub const ALL: [Priority; 6] = [
        Self::RealTime,
        Self::High,
        Self::AboveNormal,
        Self::Normal,
        Self::BelowNormal,
        Self::Idle,
    ];

    pub fn id(self) -> u32 {
        PRIORITY_FIRST + self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        let index = id.checked_sub(PRIORITY_FIRST)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::RealTime => "Real Time",
            Self::High => "High",
            Self::AboveNormal => "Above Normal",
            Self::Normal => "Normal",
            Self::BelowNormal => "Below Normal",
            Self::Idle => "Idle",
        }
    }
}

/// Window alignment presets within the monitor work area, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    CenterHorizontally,
    CenterVertically,
}

impl Alignment {
    pub const ALL: [Alignment; 11] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
        Self::CenterHorizontally,
        Self::CenterVertically,
    ];

    pub fn id(self) -> u32 {
        ALIGN_FIRST + self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        let index = id.checked_sub(ALIGN_FIRST)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::TopLeft => "Top Left",
            Self::TopCenter => "Top Center",
            Self::TopRight => "Top Right",
            Self::MiddleLeft => "Middle Left",
            Self::MiddleCenter => "Middle Center",
            Self::MiddleRight => "Middle Right",
            Self::BottomLeft => "Bottom Left",
            Self::BottomCenter => "Bottom Center",
            Self::BottomRight => "Bottom Right",
            Self::CenterHorizontally => "Center Horizontally",
            Self::CenterVertically => "Center Vertically",
        }
    }
}

/// Configuration names of the fixed, toggle-style items.
///
/// Used for `menu.hidden` and `[[menu.hotkey]]` entries in the config.
pub const ITEM_NAMES: &[(&str, u32, &str)] = &[
    ("information", INFORMATION, "Information"),
    ("roll_up", ROLLUP, "Roll Up"),
    ("aero_glass", AERO_GLASS, "Aero Glass"),
    ("topmost", TOPMOST, "Always On Top"),
    ("send_to_bottom", SEND_TO_BOTTOM, "Send To Bottom"),
    ("open_in_explorer", OPEN_FILE_IN_EXPLORER, "Open File In Explorer"),
    ("save_screenshot", SAVE_SCREENSHOT, "Save Screenshot"),
    ("copy_screenshot", COPY_SCREENSHOT, "Copy Screenshot"),
    ("copy_text", COPY_WINDOW_TEXT, "Copy Window Text"),
    ("copy_title", COPY_WINDOW_TITLE, "Copy Window Title"),
    ("copy_process_path", COPY_FULL_PROCESS_PATH, "Copy Full Process Path"),
    ("clear_clipboard", CLEAR_CLIPBOARD, "Clear Clipboard"),
    ("drag_by_mouse", DRAG_BY_MOUSE, "Drag By Mouse"),
    ("minimize_to_tray", MINIMIZE_TO_TRAY, "Minimize To Tray"),
    ("minimize_always_to_tray", MINIMIZE_ALWAYS_TO_TRAY, "Minimize Always To Tray"),
    ("suspend_to_tray", SUSPEND_TO_TRAY, "Suspend To Tray"),
    ("hide_for_alt_tab", HIDE_FOR_ALT_TAB, "Hide For Alt+Tab"),
    ("click_through", CLICK_THROUGH, "Click Through"),
    ("minimize_other_windows", MINIMIZE_OTHER_WINDOWS, "Minimize Other Windows"),
    ("close_other_windows", CLOSE_OTHER_WINDOWS, "Close Other Windows"),
    ("disable_minimize_button", DISABLE_MINIMIZE_BUTTON, "Disable Minimize Button"),
    ("disable_maximize_button", DISABLE_MAXIMIZE_BUTTON, "Disable Maximize Button"),
    ("disable_close_button", DISABLE_CLOSE_BUTTON, "Disable Close Button"),
    ("save_selected_items", SAVE_SELECTED_ITEMS, "Save Selected Items"),
    ("size_default", SIZE_DEFAULT, "Default"),
    ("size_custom", SIZE_CUSTOM, "Custom..."),
    ("transparency_default", TRANS_DEFAULT, "Default"),
    ("transparency_custom", TRANS_CUSTOM, "Custom..."),
    ("align_default", ALIGN_DEFAULT, "Default"),
    ("align_custom", ALIGN_CUSTOM, "Custom..."),
];

/// Looks up a fixed item by its configuration name (case-insensitive).
pub fn id_from_name(name: &str) -> Option<u32> {
    ITEM_NAMES
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, id, _)| *id)
}

pub fn title(id: u32) -> Option<&'static str> {
    ITEM_NAMES
        .iter()
        .find(|(_, i, _)| *i == id)
        .map(|(_, _, t)| *t)
}
