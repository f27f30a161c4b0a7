pub mod geometry;
mod state;

use std::cell::OnceCell;

use crate::config::{SavedItems, WindowSizeItem};
use crate::menu::{Menu, MenuLayout};
use crate::menu_id::{self, Alignment, Group, Priority};
use crate::rect::{Margins, Point, Rect, Size};

pub use state::{CONSOLE_CLASS, WindowIdentity, WindowState};

/// The owning process of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Main module path. `None` when the process cannot be queried.
    pub path: Option<String>,
}

impl ProcessInfo {
    /// Executable file name, e.g. `notepad.exe`.
    ///
    /// Splits on both separators so Windows paths parse the same on
    /// every host.
    pub fn file_name(&self) -> Option<String> {
        let path = self.path.as_deref()?;
        path.rsplit(['\\', '/'])
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Executable name without extension, e.g. `notepad`.
    pub fn name(&self) -> Option<String> {
        let file_name = self.file_name()?;
        match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => Some(stem.to_string()),
            _ => Some(file_name),
        }
    }
}

/// Runtime attributes read back from the OS when a window is adopted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeFlags {
    pub topmost: bool,
    pub tool_window: bool,
    pub minimize_disabled: bool,
    pub maximize_disabled: bool,
    pub close_disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleButton {
    Minimize,
    Maximize,
    Close,
}

/// A single mutation applied to a native window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Bounds(Rect),
    Position(Point),
    ShowNormal,
    /// Layered-window alpha; `None` removes the layered style.
    Alpha(Option<u8>),
    Topmost(bool),
    ToolWindow(bool),
    ClickThrough(bool),
    AeroGlass(bool),
    DisableButton(TitleButton, bool),
    Priority(Priority),
    SendToBottom,
    /// Hide the window behind a notification-area icon, or bring it back.
    TrayIcon(bool),
    /// Suspend or resume every thread of the owning process.
    Suspend(bool),
    /// Revert the system menu to the OS default.
    RestoreMenu,
}

/// Native operations on one window.
///
/// Implemented by the platform crate and by in-memory fakes in tests.
/// Queries return `None` or defaults when the window has gone away;
/// `apply` reports failure as `false` and never panics.
pub trait WindowOps {
    fn class_name(&self) -> String;
    fn title(&self) -> String;
    fn process(&self) -> Option<ProcessInfo>;
    fn rect(&self) -> Option<Rect>;
    fn client_size(&self) -> Option<Size>;
    fn margins(&self) -> Margins;
    fn caption_height(&self) -> i32;
    /// Work area of the monitor currently holding the window.
    fn work_area(&self) -> Option<Rect>;
    fn runtime(&self) -> RuntimeFlags;
    fn priority(&self) -> Option<Priority>;
    fn exists(&self) -> bool;
    /// Appends the layout to the system menu. `false` leaves the window untracked.
    fn augment_menu(&mut self, layout: &MenuLayout) -> bool;
    fn set_checked(&mut self, id: u32, checked: bool);
    fn apply(&mut self, change: Change) -> bool;
}

/// Details shown by the "Information" command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: usize,
    pub title: String,
    pub class_name: String,
    pub rect: Option<Rect>,
    pub process_id: Option<u32>,
    pub process_path: Option<String>,
}

/// One tracked top-level window.
pub struct Window {
    handle: usize,
    ops: Box<dyn WindowOps>,
    process: OnceCell<Option<ProcessInfo>>,
    pub menu: Menu,
    pub state: WindowState,
    default_rect: Option<Rect>,
    rollup_rect: Option<Rect>,
    size_preset: Option<String>,
    transparency: Option<u8>,
    alignment: Option<Alignment>,
    priority: Option<Priority>,
    in_tray: bool,
    suspended: bool,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("handle", &format_args!("0x{:X}", self.handle))
            .field("menu", &self.menu)
            .field("in_tray", &self.in_tray)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub fn new(handle: usize, ops: Box<dyn WindowOps>) -> Self {
        Self {
            handle,
            ops,
            process: OnceCell::new(),
            menu: Menu::default(),
            state: WindowState::default(),
            default_rect: None,
            rollup_rect: None,
            size_preset: None,
            transparency: None,
            alignment: None,
            priority: None,
            in_tray: false,
            suspended: false,
        }
    }

    pub fn handle(&self) -> usize {
        self.handle
    }

    pub fn class_name(&self) -> String {
        self.ops.class_name()
    }

    pub fn title(&self) -> String {
        self.ops.title()
    }

    /// Owning process, resolved on first use and cached.
    pub fn process(&self) -> Option<&ProcessInfo> {
        self.process.get_or_init(|| self.ops.process()).as_ref()
    }

    pub fn process_path(&self) -> Option<&str> {
        self.process().and_then(|p| p.path.as_deref())
    }

    pub fn identity(&self) -> Option<WindowIdentity> {
        WindowIdentity::of(&self.class_name(), self.process_path())
    }

    pub fn rect(&self) -> Option<Rect> {
        self.ops.rect()
    }

    pub fn exists(&self) -> bool {
        self.ops.exists()
    }

    pub fn in_tray(&self) -> bool {
        self.in_tray
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn info(&self) -> WindowInfo {
        WindowInfo {
            handle: self.handle,
            title: self.title(),
            class_name: self.class_name(),
            rect: self.rect(),
            process_id: self.process().map(|p| p.pid),
            process_path: self.process_path().map(str::to_string),
        }
    }

    pub fn frame(&self) -> Option<geometry::FrameMetrics> {
        Some(geometry::FrameMetrics {
            window: self.ops.rect()?,
            client: self.ops.client_size()?,
            margins: self.ops.margins(),
        })
    }

    pub fn work_area(&self) -> Option<Rect> {
        self.ops.work_area()
    }

    pub fn augment_menu(&mut self, layout: &MenuLayout) -> bool {
        self.ops.augment_menu(layout)
    }

    pub fn apply(&mut self, change: Change) -> bool {
        self.ops.apply(change)
    }

    pub fn is_checked(&self, id: u32) -> bool {
        self.menu.is_checked(id)
    }

    /// Sets a check mark in both the model and the native menu.
    pub fn check(&mut self, id: u32, checked: bool) {
        self.menu.set_checked(id, checked);
        self.ops.set_checked(id, checked);
    }

    /// Flips a toggle item and returns its new state.
    pub fn toggle(&mut self, id: u32) -> bool {
        let on = !self.is_checked(id);
        self.check(id, on);
        on
    }

    pub fn uncheck_group(&mut self, group: Group) {
        for id in self.menu.checked_in(group) {
            self.check(id, false);
        }
        if group == Group::Size {
            self.size_preset = None;
        }
    }

    /// Unchecks the whole group, then checks `id`.
    pub fn select(&mut self, group: Group, id: u32) {
        self.uncheck_group(group);
        self.check(id, true);
    }

    /// Mirrors current runtime attributes into the menu check marks.
    pub fn sync_runtime_checks(&mut self) {
        let flags = self.ops.runtime();
        self.check(menu_id::TOPMOST, flags.topmost);
        self.check(menu_id::HIDE_FOR_ALT_TAB, flags.tool_window);
        self.check(menu_id::DISABLE_MINIMIZE_BUTTON, flags.minimize_disabled);
        self.check(menu_id::DISABLE_MAXIMIZE_BUTTON, flags.maximize_disabled);
        self.check(menu_id::DISABLE_CLOSE_BUTTON, flags.close_disabled);
        if let Some(priority) = self.ops.priority() {
            self.priority = Some(priority);
            self.select(Group::Priority, priority.id());
        }
    }

    /// Remembers the current geometry as the "Default" size and position.
    pub fn save_default_rect(&mut self) {
        if let Some(rect) = self.ops.rect() {
            self.default_rect = Some(rect);
        }
    }

    pub fn default_rect(&self) -> Option<Rect> {
        self.default_rect
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> bool {
        self.apply(Change::Bounds(bounds))
    }

    /// Resizes keeping the current position unless one is given.
    pub fn set_size(&mut self, size: Size, left: Option<i32>, top: Option<i32>) -> bool {
        let Some(current) = self.ops.rect() else {
            return false;
        };
        let bounds = Rect::new(
            left.unwrap_or(current.x),
            top.unwrap_or(current.y),
            size.width,
            size.height,
        );
        self.set_bounds(bounds)
    }

    /// Applies a resize preset and records it for persistence.
    pub fn apply_preset(&mut self, preset: &WindowSizeItem, size: Size) -> bool {
        let applied = self.set_size(size, preset.left, preset.top);
        self.size_preset = Some(preset.title.clone());
        applied
    }

    /// Transparency in percent; `None` restores full opacity.
    pub fn set_transparency(&mut self, percent: Option<u8>) {
        let percent = percent.map(|p| p.min(100));
        let alpha = percent.map(|p| (u32::from(100 - p) * 255 / 100) as u8);
        self.transparency = percent;
        self.apply(Change::Alpha(alpha));
    }

    pub fn transparency(&self) -> Option<u8> {
        self.transparency
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> bool {
        let (Some(rect), Some(work)) = (self.ops.rect(), self.ops.work_area()) else {
            return false;
        };
        self.alignment = Some(alignment);
        let position = geometry::aligned_position(rect, work, alignment);
        self.apply(Change::Position(position))
    }

    /// Forgets the alignment preset (custom or default position).
    pub fn clear_alignment(&mut self) {
        self.alignment = None;
    }

    pub fn set_priority(&mut self, priority: Priority) -> bool {
        self.priority = Some(priority);
        self.apply(Change::Priority(priority))
    }

    pub fn is_rolled_up(&self) -> bool {
        self.rollup_rect.is_some()
    }

    pub fn roll_up(&mut self) -> bool {
        if self.rollup_rect.is_some() {
            return false;
        }
        let Some(rect) = self.ops.rect() else {
            return false;
        };
        let caption = self.ops.caption_height();
        self.rollup_rect = Some(rect);
        self.apply(Change::Bounds(geometry::rolled_up(rect, caption)))
    }

    pub fn unroll(&mut self) -> bool {
        match self.rollup_rect.take() {
            Some(rect) => self.apply(Change::Bounds(rect)),
            None => false,
        }
    }

    /// Forgets a pending roll-up after an explicit resize.
    pub fn discard_rollup(&mut self) {
        self.rollup_rect = None;
        self.check(menu_id::ROLLUP, false);
    }

    pub fn minimize_to_tray(&mut self) -> bool {
        if self.in_tray {
            return true;
        }
        self.in_tray = self.apply(Change::TrayIcon(true));
        self.in_tray
    }

    pub fn suspend(&mut self) -> bool {
        if !self.suspended {
            self.suspended = self.apply(Change::Suspend(true));
        }
        self.suspended
    }

    /// Removes the tray placeholder, resuming the process if needed.
    pub fn restore_from_tray(&mut self) {
        if self.suspended {
            self.apply(Change::Suspend(false));
            self.suspended = false;
        }
        if self.in_tray {
            self.apply(Change::TrayIcon(false));
            self.in_tray = false;
        }
    }

    /// Re-captures the persistable snapshot from the live window.
    pub fn refresh_state(&mut self) {
        let class_name = self.class_name();
        let process_path = self.process_path().unwrap_or_default().to_string();
        let rect = self.rollup_rect.or_else(|| self.ops.rect()).unwrap_or_default();

        self.state = WindowState {
            class_name,
            process_path,
            left: rect.x,
            top: rect.y,
            width: rect.width,
            height: rect.height,
            size_preset: self.size_preset.clone(),
            transparency: self.transparency,
            priority: self.priority,
            alignment: self.alignment,
            always_on_top: self.is_checked(menu_id::TOPMOST),
            hide_for_alt_tab: self.is_checked(menu_id::HIDE_FOR_ALT_TAB),
            minimize_to_tray_always: self.is_checked(menu_id::MINIMIZE_ALWAYS_TO_TRAY),
            disable_minimize_button: self.is_checked(menu_id::DISABLE_MINIMIZE_BUTTON),
            disable_maximize_button: self.is_checked(menu_id::DISABLE_MAXIMIZE_BUTTON),
            disable_close_button: self.is_checked(menu_id::DISABLE_CLOSE_BUTTON),
            rolled_up: self.is_rolled_up(),
        };
    }

    /// Applies a persisted snapshot, restoring only the enabled parts.
    ///
    /// Check marks are updated so the menu matches the applied state.
    pub fn apply_state(&mut self, state: &WindowState, saved: &SavedItems, presets: &[WindowSizeItem]) {
        if saved.size && state.width > 0 && state.height > 0 {
            let bounds = Rect::new(state.left, state.top, state.width, state.height);
            self.set_bounds(bounds);
            let preset = state
                .size_preset
                .as_deref()
                .and_then(|title| presets.iter().position(|p| p.title == title));
            if let Some(index) = preset {
                self.select(Group::Size, menu_id::size_preset(index));
                self.size_preset = state.size_preset.clone();
            }
        }

        if saved.alignment
            && let Some(alignment) = state.alignment
        {
            self.select(Group::Alignment, alignment.id());
            self.set_alignment(alignment);
        }

        if saved.transparency
            && let Some(percent) = state.transparency
        {
            let id = menu_id::transparency(percent).unwrap_or(menu_id::TRANS_CUSTOM);
            self.select(Group::Transparency, id);
            self.set_transparency(Some(percent));
        }

        if saved.priority
            && let Some(priority) = state.priority
        {
            self.select(Group::Priority, priority.id());
            self.set_priority(priority);
        }

        if saved.always_on_top && state.always_on_top {
            self.check(menu_id::TOPMOST, true);
            self.apply(Change::Topmost(true));
        }

        if saved.hide_for_alt_tab && state.hide_for_alt_tab {
            self.check(menu_id::HIDE_FOR_ALT_TAB, true);
            self.apply(Change::ToolWindow(true));
        }

        if saved.buttons {
            let buttons = [
                (menu_id::DISABLE_MINIMIZE_BUTTON, TitleButton::Minimize, state.disable_minimize_button),
                (menu_id::DISABLE_MAXIMIZE_BUTTON, TitleButton::Maximize, state.disable_maximize_button),
                (menu_id::DISABLE_CLOSE_BUTTON, TitleButton::Close, state.disable_close_button),
            ];
            for (id, button, disabled) in buttons {
                if disabled {
                    self.check(id, true);
                    self.apply(Change::DisableButton(button, true));
                }
            }
        }

        if saved.minimize_to_tray_always && state.minimize_to_tray_always {
            self.check(menu_id::MINIMIZE_ALWAYS_TO_TRAY, true);
        }

        if saved.rollup && state.rolled_up && self.roll_up() {
            self.check(menu_id::ROLLUP, true);
        }

        self.state = state.clone();
    }

    /// Reverts everything the host changed so the window survives us.
    pub fn dispose(&mut self) {
        self.restore_from_tray();
        if self.ops.exists() {
            self.apply(Change::RestoreMenu);
        }
    }
}
