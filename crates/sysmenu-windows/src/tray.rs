//! Notification-area placeholders for windows minimized to the tray.
//!
//! Every placeholder belongs to the host window and uses the hidden
//! window's handle as its icon id, so a callback names the window to
//! bring back.

use std::mem;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    HICON, ICON_SMALL2, IDI_APPLICATION, IsIconic, LoadIconW, SMTO_ABORTIFHUNG, SW_HIDE, SW_RESTORE,
    SW_SHOW, SendMessageTimeoutW, SetForegroundWindow, ShowWindow, WM_APP, WM_GETICON,
};

/// Callback message posted to the host window by placeholder icons.
/// `wparam` is the icon id, `lparam` the mouse message.
pub const TRAY_CALLBACK: u32 = WM_APP + 2;

const ICON_TIMEOUT_MS: u32 = 100;

fn icon_of(window: HWND) -> HICON {
    let mut result = 0usize;
    // SAFETY: WM_GETICON has no side effects; a hung window times out.
    unsafe {
        let _ = SendMessageTimeoutW(
            window,
            WM_GETICON,
            WPARAM(ICON_SMALL2 as usize),
            LPARAM(0),
            SMTO_ABORTIFHUNG,
            ICON_TIMEOUT_MS,
            Some(&mut result),
        );
        if result != 0 {
            return HICON(result as *mut _);
        }
        LoadIconW(None, IDI_APPLICATION).unwrap_or_default()
    }
}

fn data(host: HWND, window: HWND) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: host,
        uID: window.0 as usize as u32,
        ..Default::default()
    }
}

/// Hides `window` behind a placeholder icon owned by `host`.
pub fn park(host: HWND, window: HWND, title: &str) -> bool {
    let mut nid = data(host, window);
    nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
    nid.uCallbackMessage = TRAY_CALLBACK;
    nid.hIcon = icon_of(window);
    for (slot, c) in nid.szTip.iter_mut().zip(title.encode_utf16().take(127)) {
        *slot = c;
    }

    // SAFETY: `nid` is fully initialised and sized.
    unsafe {
        if !Shell_NotifyIconW(NIM_ADD, &nid).as_bool() {
            return false;
        }
        let _ = ShowWindow(window, SW_HIDE);
    }
    true
}

/// Removes the placeholder and shows `window` again.
pub fn unpark(host: HWND, window: HWND) -> bool {
    let nid = data(host, window);
    // SAFETY: deleting an icon we added; showing a window by handle.
    unsafe {
        let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
        let _ = ShowWindow(window, SW_SHOW);
        if IsIconic(window).as_bool() {
            let _ = ShowWindow(window, SW_RESTORE);
        }
        let _ = SetForegroundWindow(window);
    }
    true
}
