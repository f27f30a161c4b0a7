use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GW_OWNER, GWL_EXSTYLE, GWL_STYLE, GetWindow, GetWindowLongPtrW, IsWindowVisible,
    WS_CAPTION, WS_EX_APPWINDOW, WS_EX_TOOLWINDOW, WS_SYSMENU,
};
use windows::core::BOOL;

/// Every visible top-level window that has a system menu.
///
/// Used once at startup to adopt windows that existed before the hooks.
pub fn top_level_windows() -> Vec<usize> {
    collect(has_system_menu)
}

/// Visible windows that would show up in the Alt+Tab list.
pub fn alt_tab_windows() -> Vec<usize> {
    collect(is_alt_tab_window)
}

fn collect(filter: fn(HWND) -> bool) -> Vec<usize> {
    let mut found: (fn(HWND) -> bool, Vec<usize>) = (filter, Vec::new());

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our tuple as LPARAM; it outlives the
    // synchronous enumeration.
    unsafe {
        let _ = EnumWindows(Some(enum_window_callback), LPARAM(&mut found as *mut _ as isize));
    }

    found.1
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Returns `TRUE` to continue enumeration.
unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the tuple passed by collect().
    let (filter, windows) = unsafe { &mut *(lparam.0 as *mut (fn(HWND) -> bool, Vec<usize>)) };

    if unsafe { IsWindowVisible(hwnd) }.as_bool() && filter(hwnd) {
        windows.push(hwnd.0 as usize);
    }

    BOOL(1)
}

fn styles(hwnd: HWND) -> (u32, u32) {
    // SAFETY: style queries only.
    unsafe {
        (
            GetWindowLongPtrW(hwnd, GWL_STYLE) as u32,
            GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32,
        )
    }
}

fn has_system_menu(hwnd: HWND) -> bool {
    let (style, _) = styles(hwnd);
    style & WS_SYSMENU.0 != 0
}

/// Captioned, non-tool windows without an owner, or any window that
/// explicitly asks for a taskbar button.
fn is_alt_tab_window(hwnd: HWND) -> bool {
    let (style, ex_style) = styles(hwnd);
    if ex_style & WS_EX_APPWINDOW.0 != 0 {
        return true;
    }
    let has_caption = style & WS_CAPTION.0 == WS_CAPTION.0;
    let is_tool = ex_style & WS_EX_TOOLWINDOW.0 != 0;
    // SAFETY: GetWindow only reads the window tree.
    let owned = unsafe { GetWindow(hwnd, GW_OWNER) }.is_ok_and(|o| !o.is_invalid());
    has_caption && !is_tool && !owned
}
