use std::cell::OnceCell;

use sysmenu_core::menu_id::{self, Priority};
use sysmenu_core::{
    Change, Margins, MenuEntry, MenuLayout, ProcessInfo, Rect, RuntimeFlags, Size, TitleButton, WindowOps,
};

use tracing::debug;
use windows::Win32::Foundation::{COLORREF, HWND};
use windows::Win32::Graphics::Dwm::{DWM_BB_ENABLE, DWM_BLURBEHIND, DwmEnableBlurBehindWindow};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CheckMenuItem, CreatePopupMenu, EnableMenuItem, GWL_EXSTYLE, GWL_STYLE, GetMenuState,
    GetSystemMenu, GetWindowLongPtrW, GetWindowTextLengthW, GetWindowTextW, HMENU, HWND_BOTTOM,
    HWND_NOTOPMOST, HWND_TOPMOST, IsIconic, IsWindow, IsZoomed, LWA_ALPHA, MF_BYCOMMAND, MF_CHECKED,
    MF_ENABLED, MF_GRAYED, MF_POPUP, MF_SEPARATOR, MF_STRING, MF_UNCHECKED, RealGetWindowClassW,
    SET_WINDOW_POS_FLAGS, SW_HIDE, SW_SHOW, SW_SHOWNORMAL, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_NOZORDER, SetLayeredWindowAttributes, SetWindowLongPtrW, SetWindowPos, ShowWindow,
    WINDOW_LONG_PTR_INDEX, WS_EX_APPWINDOW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_MAXIMIZEBOX, WS_MINIMIZEBOX,
};
use windows::core::{BOOL, HSTRING, PCWSTR};

use crate::{frame, monitor, process, tray};

/// A tracked window on the Windows platform, wrapping a Win32 `HWND`.
///
/// The owning process is resolved on first use and cached; every other
/// attribute is queried from the OS on demand.
#[derive(Debug)]
pub struct WinWindow {
    hwnd: HWND,
    /// Host window that owns tray placeholders for this window.
    host: HWND,
    process: OnceCell<Option<ProcessInfo>>,
}

impl WinWindow {
    pub fn new(hwnd: HWND, host: HWND) -> Self {
        Self {
            hwnd,
            host,
            process: OnceCell::new(),
        }
    }

    /// Returns the raw window handle.
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn owner(&self) -> Option<&ProcessInfo> {
        self.process
            .get_or_init(|| process::process_of_window(self.hwnd))
            .as_ref()
    }

    fn pid(&self) -> Option<u32> {
        self.owner().map(|p| p.pid)
    }

    fn system_menu(&self) -> Option<HMENU> {
        // SAFETY: returns the window's own system menu copy, or null.
        let menu = unsafe { GetSystemMenu(self.hwnd, false) };
        (!menu.is_invalid()).then_some(menu)
    }

    fn style(&self, index: WINDOW_LONG_PTR_INDEX) -> u32 {
        // SAFETY: style query on a window handle.
        unsafe { GetWindowLongPtrW(self.hwnd, index) as u32 }
    }

    /// Sets or clears `bits` in a style word. Returns whether it changed.
    fn set_style_bits(&self, index: WINDOW_LONG_PTR_INDEX, bits: u32, on: bool) -> bool {
        let style = self.style(index);
        let next = if on { style | bits } else { style & !bits };
        if next != style {
            // SAFETY: writes a style word the window already had, with bits toggled.
            unsafe { SetWindowLongPtrW(self.hwnd, index, next as _) };
        }
        next != style
    }

    fn set_pos(&self, after: Option<HWND>, rect: Rect, flags: SET_WINDOW_POS_FLAGS) -> bool {
        // SAFETY: SetWindowPos with a valid HWND is safe.
        unsafe { SetWindowPos(self.hwnd, after, rect.x, rect.y, rect.width, rect.height, flags) }.is_ok()
    }

    fn refresh_frame(&self) -> bool {
        self.set_pos(
            None,
            Rect::default(),
            SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    }

    fn set_alpha(&self, alpha: Option<u8>) -> bool {
        match alpha {
            Some(alpha) => {
                self.set_style_bits(GWL_EXSTYLE, WS_EX_LAYERED.0, true);
                // SAFETY: the window is layered at this point.
                unsafe { SetLayeredWindowAttributes(self.hwnd, COLORREF(0), alpha, LWA_ALPHA) }.is_ok()
            }
            None => {
                // SAFETY: as above; failure on a non-layered window is harmless.
                unsafe {
                    let _ = SetLayeredWindowAttributes(self.hwnd, COLORREF(0), u8::MAX, LWA_ALPHA);
                }
                // Click-through needs the layered style to stay.
                if self.style(GWL_EXSTYLE) & WS_EX_TRANSPARENT.0 == 0 {
                    self.set_style_bits(GWL_EXSTYLE, WS_EX_LAYERED.0, false);
                }
                true
            }
        }
    }

    fn set_click_through(&self, on: bool) -> bool {
        if on {
            let was_layered = self.style(GWL_EXSTYLE) & WS_EX_LAYERED.0 != 0;
            self.set_style_bits(GWL_EXSTYLE, WS_EX_TRANSPARENT.0 | WS_EX_LAYERED.0, true);
            if !was_layered {
                // SAFETY: freshly layered windows are invisible until an alpha is set.
                unsafe {
                    let _ = SetLayeredWindowAttributes(self.hwnd, COLORREF(0), u8::MAX, LWA_ALPHA);
                }
            }
        } else {
            self.set_style_bits(GWL_EXSTYLE, WS_EX_TRANSPARENT.0, false);
        }
        true
    }

    fn set_tool_window(&self, on: bool) -> bool {
        // SAFETY: hide/show around the style change so the taskbar notices.
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
            self.set_style_bits(GWL_EXSTYLE, WS_EX_TOOLWINDOW.0, on);
            if on {
                self.set_style_bits(GWL_EXSTYLE, WS_EX_APPWINDOW.0, false);
            }
            let _ = ShowWindow(self.hwnd, SW_SHOW);
        }
        true
    }

    fn set_button_disabled(&self, button: TitleButton, disabled: bool) -> bool {
        match button {
            TitleButton::Minimize => {
                self.set_style_bits(GWL_STYLE, WS_MINIMIZEBOX.0, !disabled);
            }
            TitleButton::Maximize => {
                self.set_style_bits(GWL_STYLE, WS_MAXIMIZEBOX.0, !disabled);
            }
            TitleButton::Close => {
                let Some(menu) = self.system_menu() else {
                    return false;
                };
                let state = if disabled { MF_GRAYED } else { MF_ENABLED };
                // SAFETY: toggles the Close item of this window's system menu.
                unsafe {
                    let _ = EnableMenuItem(menu, menu_id::SC_CLOSE, MF_BYCOMMAND | state);
                }
            }
        }
        self.refresh_frame()
    }

    fn set_aero_glass(&self, on: bool) -> bool {
        let blur = DWM_BLURBEHIND {
            dwFlags: DWM_BB_ENABLE,
            fEnable: BOOL::from(on),
            ..Default::default()
        };
        // SAFETY: `blur` is fully initialised.
        unsafe { DwmEnableBlurBehindWindow(self.hwnd, &blur) }.is_ok()
    }

    fn show_normal(&self) -> bool {
        // SAFETY: state queries and ShowWindow on our handle.
        unsafe {
            if IsZoomed(self.hwnd).as_bool() || IsIconic(self.hwnd).as_bool() {
                let _ = ShowWindow(self.hwnd, SW_SHOWNORMAL);
            }
        }
        true
    }
}

impl WindowOps for WinWindow {
    fn class_name(&self) -> String {
        // SAFETY: RealGetWindowClassW reads the window class name.
        // 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..length as usize])
        }
    }

    fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length == 0 {
                return String::new();
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied as usize])
        }
    }

    fn process(&self) -> Option<ProcessInfo> {
        self.owner().cloned()
    }

    fn rect(&self) -> Option<Rect> {
        frame::window_rect(self.hwnd)
    }

    fn client_size(&self) -> Option<Size> {
        frame::client_rect(self.hwnd).map(|r| r.size())
    }

    fn margins(&self) -> Margins {
        frame::margins(self.hwnd)
    }

    fn caption_height(&self) -> i32 {
        match (frame::window_rect(self.hwnd), frame::client_rect(self.hwnd)) {
            (Some(outer), Some(client)) => (client.y - outer.y).max(0),
            _ => 0,
        }
    }

    fn work_area(&self) -> Option<Rect> {
        monitor::work_area_for_window(self.hwnd)
    }

    fn runtime(&self) -> RuntimeFlags {
        let style = self.style(GWL_STYLE);
        let ex_style = self.style(GWL_EXSTYLE);
        let close_disabled = self.system_menu().is_some_and(|menu| {
            // SAFETY: read-only menu query.
            let state = unsafe { GetMenuState(menu, menu_id::SC_CLOSE, MF_BYCOMMAND) };
            state != u32::MAX && state & MF_GRAYED.0 != 0
        });

        RuntimeFlags {
            topmost: ex_style & WS_EX_TOPMOST.0 != 0,
            tool_window: ex_style & WS_EX_TOOLWINDOW.0 != 0,
            minimize_disabled: style & WS_MINIMIZEBOX.0 == 0,
            maximize_disabled: style & WS_MAXIMIZEBOX.0 == 0,
            close_disabled,
        }
    }

    fn priority(&self) -> Option<Priority> {
        process::priority(self.pid()?)
    }

    fn exists(&self) -> bool {
        // SAFETY: IsWindow accepts any value.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    fn augment_menu(&mut self, layout: &MenuLayout) -> bool {
        let Some(menu) = self.system_menu() else {
            return false;
        };
        append_entries(menu, &layout.entries)
    }

    fn set_checked(&mut self, id: u32, checked: bool) {
        let Some(menu) = self.system_menu() else {
            return;
        };
        let mark = if checked { MF_CHECKED } else { MF_UNCHECKED };
        // SAFETY: MF_BYCOMMAND searches submenus for the identifier.
        unsafe { CheckMenuItem(menu, id, (MF_BYCOMMAND | mark).0) };
    }

    fn apply(&mut self, change: Change) -> bool {
        if !self.exists() {
            return false;
        }
        let hwnd = self.hwnd.0 as usize;
        debug!("apply {change:?} to 0x{hwnd:X}");

        match change {
            Change::Bounds(rect) => self.set_pos(None, rect, SWP_NOZORDER | SWP_NOACTIVATE),
            Change::Position(p) => self.set_pos(
                None,
                Rect::new(p.x, p.y, 0, 0),
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            ),
            Change::ShowNormal => self.show_normal(),
            Change::Alpha(alpha) => self.set_alpha(alpha),
            Change::Topmost(on) => {
                let after = if on { HWND_TOPMOST } else { HWND_NOTOPMOST };
                self.set_pos(Some(after), Rect::default(), SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE)
            }
            Change::ToolWindow(on) => self.set_tool_window(on),
            Change::ClickThrough(on) => self.set_click_through(on),
            Change::AeroGlass(on) => self.set_aero_glass(on),
            Change::DisableButton(button, on) => self.set_button_disabled(button, on),
            Change::Priority(priority) => self.pid().is_some_and(|pid| process::set_priority(pid, priority)),
            Change::SendToBottom => self.set_pos(
                Some(HWND_BOTTOM),
                Rect::default(),
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            ),
            Change::TrayIcon(true) => tray::park(self.host, self.hwnd, &self.title()),
            Change::TrayIcon(false) => tray::unpark(self.host, self.hwnd),
            Change::Suspend(on) => self.pid().is_some_and(|pid| process::set_suspended(pid, on)),
            Change::RestoreMenu => {
                // SAFETY: bRevert resets the system menu to the default copy.
                unsafe { GetSystemMenu(self.hwnd, true) };
                true
            }
        }
    }
}

/// Appends layout entries to `menu`, creating popups for submenus.
fn append_entries(menu: HMENU, entries: &[MenuEntry]) -> bool {
    for entry in entries {
        // SAFETY: `menu` is a live menu handle; strings outlive each call.
        let appended = unsafe {
            match entry {
                MenuEntry::Separator => AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null()),
                MenuEntry::Item { id, title, hotkey } => {
                    let text = match hotkey {
                        Some(keys) => format!("{title}\t{keys}"),
                        None => title.clone(),
                    };
                    AppendMenuW(menu, MF_STRING, *id as usize, &HSTRING::from(text))
                }
                MenuEntry::Submenu { title, entries } => {
                    let Ok(popup) = CreatePopupMenu() else {
                        return false;
                    };
                    if !append_entries(popup, entries) {
                        return false;
                    }
                    AppendMenuW(menu, MF_POPUP, popup.0 as usize, &HSTRING::from(title.as_str()))
                }
            }
        };
        if appended.is_err() {
            return false;
        }
    }
    true
}
