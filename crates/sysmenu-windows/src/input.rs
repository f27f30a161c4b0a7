//! In-process low-level keyboard hook for the configured menu hotkeys.
//!
//! Low-level hooks run on the installing thread, so the matcher lives
//! in a thread-local next to the host window.

use std::cell::RefCell;

use sysmenu_core::hook::HotKeyMatcher;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, PostMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

struct Installed {
    hook: HHOOK,
    host: HWND,
    message: u32,
    matcher: HotKeyMatcher,
}

thread_local! {
    static INSTALLED: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// Installs the hook; a match posts `message` to `host` with the command
/// as `wparam` and swallows the final key press.
pub fn install(host: HWND, message: u32, bindings: &[(u32, Vec<u32>)]) -> windows::core::Result<()> {
    uninstall();
    // SAFETY: low-level hooks need no module handle.
    let hook = unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), None, 0)? };
    INSTALLED.with(|cell| {
        *cell.borrow_mut() = Some(Installed {
            hook,
            host,
            message,
            matcher: HotKeyMatcher::new(bindings),
        });
    });
    Ok(())
}

pub fn uninstall() {
    if let Some(installed) = INSTALLED.with(|cell| cell.borrow_mut().take()) {
        // SAFETY: the handle came from SetWindowsHookExW on this thread.
        unsafe {
            let _ = UnhookWindowsHookEx(installed.hook);
        }
    }
}

fn is_down(vk: u32) -> bool {
    // SAFETY: reads the global key state.
    unsafe { GetAsyncKeyState(vk as i32) } < 0
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code as u32 == HC_ACTION {
        // SAFETY: for HC_ACTION lparam points at a KBDLLHOOKSTRUCT.
        let vk = unsafe { (*(lparam.0 as *const KBDLLHOOKSTRUCT)).vkCode };
        let swallow = INSTALLED.with(|cell| {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                return false;
            };
            let Some(installed) = slot.as_mut() else {
                return false;
            };
            match wparam.0 as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => match installed.matcher.key_down(vk, is_down) {
                    Some(command) => {
                        // SAFETY: posting to our own host window.
                        unsafe {
                            let _ = PostMessageW(
                                Some(installed.host),
                                installed.message,
                                WPARAM(command as usize),
                                LPARAM(0),
                            );
                        }
                        true
                    }
                    None => false,
                },
                WM_KEYUP | WM_SYSKEYUP => {
                    installed.matcher.key_up(vk);
                    false
                }
                _ => false,
            }
        });
        if swallow {
            return LRESULT(1);
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}
