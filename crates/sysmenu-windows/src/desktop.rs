use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use sysmenu_core::{
    BridgeMessage, Desktop, LaunchRequest, Monitor, Point, ProcessInfo, Result, Screenshot, Size, WindowInfo,
    WindowOps,
};
use windows::Win32::Foundation::{HWND, LPARAM, POINT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOT, GetAncestor, GetCursorPos, GetForegroundWindow, GetSystemMenu, IsMenu, PostMessageW,
    WM_CLOSE, WM_SYSCOMMAND, WindowFromPoint,
};

use crate::window::WinWindow;
use crate::{bridge, clipboard, enumerate, hwnd, launch, monitor, process, prompt, screenshot};

/// The Win32 desktop as seen from one host window.
pub struct WinDesktop {
    host: HWND,
}

impl WinDesktop {
    pub fn new(host: HWND) -> Self {
        Self { host }
    }
}

fn non_null(hwnd: HWND) -> Option<usize> {
    (!hwnd.is_invalid()).then_some(hwnd.0 as usize)
}

fn format_info(info: &WindowInfo) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Handle:\t0x{:X}", info.handle);
    let _ = writeln!(text, "Title:\t{}", info.title);
    let _ = writeln!(text, "Class:\t{}", info.class_name);
    if let Some(rect) = info.rect {
        let _ = writeln!(
            text,
            "Bounds:\t{}, {}  {} x {}",
            rect.x, rect.y, rect.width, rect.height
        );
    }
    if let Some(pid) = info.process_id {
        let _ = writeln!(text, "Process:\t{pid}");
    }
    if let Some(path) = &info.process_path {
        let _ = writeln!(text, "Path:\t{path}");
    }
    text
}

impl Desktop for WinDesktop {
    fn open(&self, handle: usize) -> Option<Box<dyn WindowOps>> {
        Some(Box::new(WinWindow::new(hwnd(handle), self.host)))
    }

    fn is_host_bitness(&self, pid: u32) -> bool {
        process::matches_host_bitness(pid)
    }

    fn monitors(&self) -> Vec<Monitor> {
        monitor::enumerate_monitors()
    }

    fn foreground_window(&self) -> Option<usize> {
        // SAFETY: no preconditions.
        non_null(unsafe { GetForegroundWindow() })
    }

    fn cursor_position(&self) -> Option<Point> {
        let mut point = POINT::default();
        // SAFETY: writes into a local.
        unsafe { GetCursorPos(&mut point) }.ok()?;
        Some(Point::new(point.x, point.y))
    }

    fn root_window_at(&self, point: Point) -> Option<usize> {
        // SAFETY: no preconditions.
        unsafe {
            let child = WindowFromPoint(POINT { x: point.x, y: point.y });
            if child.is_invalid() {
                return None;
            }
            non_null(GetAncestor(child, GA_ROOT))
        }
    }

    fn has_system_menu(&self, handle: usize) -> bool {
        // SAFETY: reads the window's menu without reverting it.
        unsafe {
            let menu = GetSystemMenu(hwnd(handle), false);
            !menu.is_invalid() && IsMenu(menu).as_bool()
        }
    }

    fn process_of(&self, handle: usize) -> Option<ProcessInfo> {
        process::process_of_window(hwnd(handle))
    }

    fn is_key_down(&self, vk: u32) -> bool {
        // SAFETY: no preconditions; the high bit is the "down" state.
        unsafe { GetAsyncKeyState(vk as i32) < 0 }
    }

    fn alt_tab_windows(&self) -> Vec<usize> {
        enumerate::alt_tab_windows()
    }

    fn capture(&self, handle: usize) -> Option<Screenshot> {
        screenshot::capture(hwnd(handle))
    }

    fn window_text(&self, handle: usize) -> Option<String> {
        screenshot::child_text(hwnd(handle))
    }

    fn post_sys_command(&mut self, handle: usize, command: u32) {
        // SAFETY: posting never blocks on the target.
        unsafe {
            let _ = PostMessageW(Some(hwnd(handle)), WM_SYSCOMMAND, WPARAM(command as usize), LPARAM(0));
        }
    }

    fn post_close(&mut self, handle: usize) {
        // SAFETY: posting never blocks on the target.
        unsafe {
            let _ = PostMessageW(Some(hwnd(handle)), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }

    fn terminate_process(&mut self, pid: u32) -> bool {
        process::terminate(pid)
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<()> {
        launch::launch(request)
    }

    fn prompt_parameter(&mut self, name: &str) -> Option<String> {
        prompt::parameter(name)
    }

    fn prompt_size(&mut self, current: Size) -> Option<Size> {
        prompt::size(current)
    }

    fn prompt_position(&mut self, current: Point) -> Option<Point> {
        prompt::position(current)
    }

    fn prompt_transparency(&mut self, current: u8) -> Option<u8> {
        prompt::transparency(current)
    }

    fn prompt_save_path(&mut self, suggested: &str) -> Option<PathBuf> {
        prompt::save_path(suggested)
    }

    fn show_info(&mut self, info: &WindowInfo) {
        prompt::notice("Window Information", &format_info(info));
    }

    fn set_clipboard(&mut self, text: Option<&str>) -> bool {
        clipboard::set_text(self.host, text)
    }

    fn set_clipboard_image(&mut self, shot: &Screenshot) -> bool {
        clipboard::set_image(self.host, shot)
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        prompt::error(title, message);
    }

    fn send_to_companion(&mut self, target: usize, message: &BridgeMessage) -> bool {
        bridge::send(self.host, hwnd(target), message)
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use sysmenu_core::Rect;

    use super::*;

    #[test]
    fn info_lists_known_fields_only() {
        // Arrange
        let info = WindowInfo {
            handle: 0x1A2B,
            title: "Untitled - Notepad".into(),
            class_name: "Notepad".into(),
            rect: Some(Rect::new(10, 20, 800, 600)),
            process_id: None,
            process_path: None,
        };

        // Act
        let text = format_info(&info);

        // Assert
        assert!(text.contains("Handle:\t0x1A2B"));
        assert!(text.contains("Bounds:\t10, 20  800 x 600"));
        assert!(!text.contains("Process:"));
    }
}
