//! Hook procedures. They run inside foreign processes, so each one
//! filters cheaply, posts at most one message and always chains on.

use std::ffi::c_void;
use std::sync::atomic::Ordering;

use sysmenu_core::Point;
use sysmenu_core::hook::{HookKind, names};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, ReleaseCapture, VK_MENU};
use windows::Win32::UI::WindowsAndMessaging::{
    CBT_CREATEWNDW, CWPSTRUCT, CallNextHookEx, GA_ROOT, GWL_STYLE, GetAncestor, GetMenuState,
    GetSystemMenu, GetWindowLongW, HC_ACTION, HCBT_CREATEWND, HCBT_DESTROYWND, HCBT_MINMAX,
    HCBT_MOVESIZE, HSHELL_WINDOWCREATED, HSHELL_WINDOWDESTROYED, HTCAPTION, MF_BYCOMMAND, MF_CHECKED,
    MOUSEHOOKSTRUCT, MSG, MSLLHOOKSTRUCT, PM_REMOVE, PostMessageW, WM_LBUTTONDOWN, WM_LBUTTONUP,
    WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEMOVE, WM_NCLBUTTONDOWN, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSCOMMAND,
    WS_CHILD,
};

use crate::{notify, shared};

fn chain(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // SAFETY: forwarding the untouched arguments to the next hook.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

fn is_top_level_style(style: i32) -> bool {
    (style as u32) & WS_CHILD.0 == 0
}

fn is_top_level(hwnd: HWND) -> bool {
    // SAFETY: style query on a window the system is telling us about.
    is_top_level_style(unsafe { GetWindowLongW(hwnd, GWL_STYLE) })
}

pub unsafe extern "system" fn cbt(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let hwnd = wparam.0;
        match code as u32 {
            HCBT_CREATEWND => {
                // SAFETY: for HCBT_CREATEWND lparam points at a CBT_CREATEWNDW
                // whose create struct is valid for the duration of the call.
                let style = unsafe { (*(*(lparam.0 as *const CBT_CREATEWNDW)).lpcs).style };
                if is_top_level_style(style) {
                    notify(HookKind::Cbt, names::CBT_CREATEWND, hwnd, 0);
                }
            }
            HCBT_DESTROYWND if is_top_level(HWND(hwnd as *mut c_void)) => {
                notify(HookKind::Cbt, names::CBT_DESTROYWND, hwnd, 0);
            }
            HCBT_MINMAX => notify(HookKind::Cbt, names::CBT_MINMAX, hwnd, lparam.0),
            HCBT_MOVESIZE => notify(HookKind::Cbt, names::CBT_MOVESIZE, hwnd, 0),
            _ => {}
        }
    }
    chain(code, wparam, lparam)
}

pub unsafe extern "system" fn shell(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match code as u32 {
        HSHELL_WINDOWCREATED => notify(HookKind::Shell, names::SHELL_WINDOWCREATED, wparam.0, 0),
        HSHELL_WINDOWDESTROYED => notify(HookKind::Shell, names::SHELL_WINDOWDESTROYED, wparam.0, 0),
        _ => {}
    }
    chain(code, wparam, lparam)
}

pub unsafe extern "system" fn call_wnd_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code as u32 == HC_ACTION {
        // SAFETY: for HC_ACTION lparam points at the message being sent.
        let cwp = unsafe { &*(lparam.0 as *const CWPSTRUCT) };
        if cwp.message == WM_SYSCOMMAND {
            notify(HookKind::CallWndProc, names::CALLWNDPROC, cwp.hwnd.0 as usize, cwp.wParam.0 as isize);
        }
    }
    chain(code, wparam, lparam)
}

pub unsafe extern "system" fn get_msg(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code as u32 == HC_ACTION && wparam.0 == PM_REMOVE.0 as usize {
        // SAFETY: for HC_ACTION lparam points at the retrieved MSG.
        let msg = unsafe { &*(lparam.0 as *const MSG) };
        if msg.message == WM_SYSCOMMAND {
            notify(HookKind::GetMsg, names::GETMSG, msg.hwnd.0 as usize, msg.wParam.0 as isize);
        }
    }
    chain(code, wparam, lparam)
}

/// Alt + left button anywhere in a window with "Drag By Mouse" checked
/// starts a caption drag.
pub unsafe extern "system" fn mouse(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code as u32 == HC_ACTION && wparam.0 as u32 == WM_LBUTTONDOWN {
        // SAFETY: for HC_ACTION lparam points at a MOUSEHOOKSTRUCT.
        let info = unsafe { &*(lparam.0 as *const MOUSEHOOKSTRUCT) };
        if let Some(root) = drag_target(info.hwnd) {
            let point = Point::new(info.pt.x, info.pt.y);
            // SAFETY: plain window messaging on the root we just resolved.
            unsafe {
                let _ = ReleaseCapture();
                let _ = PostMessageW(
                    Some(root),
                    WM_NCLBUTTONDOWN,
                    WPARAM(HTCAPTION as usize),
                    LPARAM(point.to_packed()),
                );
            }
            notify(HookKind::Mouse, names::MOUSE, WM_LBUTTONDOWN as usize, root.0 as isize);
            return LRESULT(1);
        }
    }
    chain(code, wparam, lparam)
}

fn drag_target(hwnd: HWND) -> Option<HWND> {
    let item = shared::get()?.drag_by_mouse.load(Ordering::Relaxed);
    // SAFETY: read-only queries on the window under the cursor.
    unsafe {
        if item == 0 || GetKeyState(i32::from(VK_MENU.0)) >= 0 {
            return None;
        }
        let root = GetAncestor(hwnd, GA_ROOT);
        if root.is_invalid() {
            return None;
        }
        let menu = GetSystemMenu(root, false);
        let state = GetMenuState(menu, item, MF_BYCOMMAND);
        (state != u32::MAX && state & MF_CHECKED.0 != 0).then_some(root)
    }
}

pub unsafe extern "system" fn mouse_ll(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let message = wparam.0 as u32;
    // Wheel and X-button traffic is not forwarded.
    let forwarded = matches!(
        message,
        WM_MOUSEMOVE
            | WM_LBUTTONDOWN
            | WM_LBUTTONUP
            | WM_RBUTTONDOWN
            | WM_RBUTTONUP
            | WM_MBUTTONDOWN
            | WM_MBUTTONUP
    );
    if code as u32 == HC_ACTION && forwarded {
        // SAFETY: for HC_ACTION lparam points at an MSLLHOOKSTRUCT.
        let info = unsafe { &*(lparam.0 as *const MSLLHOOKSTRUCT) };
        let point = Point::new(info.pt.x, info.pt.y);
        notify(HookKind::MouseLl, names::MOUSELL, message as usize, point.to_packed());
    }
    chain(code, wparam, lparam)
}

pub unsafe extern "system" fn keyboard(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code as u32 == HC_ACTION {
        notify(HookKind::Keyboard, names::KEYBOARD, wparam.0, lparam.0);
    }
    chain(code, wparam, lparam)
}
