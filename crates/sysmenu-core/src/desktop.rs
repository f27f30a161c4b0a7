use std::path::PathBuf;
use std::time::Duration;

use crate::Result;
use crate::bridge::BridgeMessage;
use crate::config::RunAs;
use crate::menu::Monitor;
use crate::rect::{Point, Size};
use crate::screenshot::Screenshot;
use crate::window::{ProcessInfo, WindowInfo, WindowOps};

/// A program launch requested by a "Start Program" item or by
/// "Open File In Explorer".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub file_name: String,
    pub arguments: String,
    pub show_window: bool,
    pub run_as: RunAs,
    pub working_directory: Option<String>,
}

/// Everything the core needs from the desktop beyond a single window.
///
/// Queries return `None`/`false` when the answer is unavailable; the
/// core treats that as a transient race and does nothing.
pub trait Desktop {
    /// Opens a native window for tracking.
    fn open(&self, hwnd: usize) -> Option<Box<dyn WindowOps>>;

    /// Whether `pid` has the same pointer width as the host process.
    /// Evaluated on every call, never cached.
    fn is_host_bitness(&self, pid: u32) -> bool;

    fn monitors(&self) -> Vec<Monitor>;
    fn foreground_window(&self) -> Option<usize>;
    fn cursor_position(&self) -> Option<Point>;
    /// Top-level window under a screen point.
    fn root_window_at(&self, point: Point) -> Option<usize>;
    fn has_system_menu(&self, hwnd: usize) -> bool;
    fn process_of(&self, hwnd: usize) -> Option<ProcessInfo>;
    fn is_key_down(&self, vk: u32) -> bool;
    /// Visible windows that appear in the Alt+Tab list.
    fn alt_tab_windows(&self) -> Vec<usize>;
    /// Renders a window, including any parts covered by other windows.
    fn capture(&self, hwnd: usize) -> Option<Screenshot>;
    /// Text of the window's child controls, one control per line.
    fn window_text(&self, hwnd: usize) -> Option<String>;

    fn post_sys_command(&mut self, hwnd: usize, command: u32);
    fn post_close(&mut self, hwnd: usize);
    fn terminate_process(&mut self, pid: u32) -> bool;
    fn launch(&mut self, request: &LaunchRequest) -> Result<()>;

    /// Asks the user for a start-program parameter. `None` is cancel.
    fn prompt_parameter(&mut self, name: &str) -> Option<String>;
    fn prompt_size(&mut self, current: Size) -> Option<Size>;
    fn prompt_position(&mut self, current: Point) -> Option<Point>;
    /// Asks for a transparency percentage.
    fn prompt_transparency(&mut self, current: u8) -> Option<u8>;
    /// Asks where to save a capture, starting from `suggested`.
    fn prompt_save_path(&mut self, suggested: &str) -> Option<PathBuf>;

    fn show_info(&mut self, info: &WindowInfo);
    /// Replaces the clipboard text, or clears it with `None`.
    fn set_clipboard(&mut self, text: Option<&str>) -> bool;
    fn set_clipboard_image(&mut self, shot: &Screenshot) -> bool;
    /// Synchronous error notice.
    fn notify_error(&mut self, title: &str, message: &str);

    /// Delivers a bridge message to the companion host window.
    fn send_to_companion(&mut self, target: usize, message: &BridgeMessage) -> bool;

    fn sleep(&mut self, duration: Duration);
}
