//! Native side of the sysmenu hooks.
//!
//! The host loads this library and calls [`install_hook`] once per hook
//! kind. Windows then maps the library into every process whose
//! threads the hook observes. The hook procedures never touch host
//! state: they only post the registered messages from
//! [`sysmenu_core::hook::names`] to the host window, which is read from
//! a named shared section so every mapped copy finds it.

#![cfg(windows)]

mod procs;
mod shared;

use std::ffi::c_void;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

use sysmenu_core::hook::{HookKind, names};
use windows::Win32::Foundation::{HINSTANCE, HMODULE, HWND, LPARAM, WPARAM};
use windows::Win32::System::LibraryLoader::DisableThreadLibraryCalls;
use windows::Win32::System::SystemServices::DLL_PROCESS_ATTACH;
use windows::Win32::UI::WindowsAndMessaging::{
    HHOOK, HOOKPROC, PostMessageW, RegisterWindowMessageW, SetWindowsHookExW, UnhookWindowsHookEx,
    WH_CALLWNDPROC, WH_CBT, WH_GETMESSAGE, WH_KEYBOARD, WH_MOUSE, WH_MOUSE_LL, WH_SHELL,
    WINDOWS_HOOK_ID,
};
use windows::core::{BOOL, HSTRING};

/// Hook kinds implemented here. The hotkey hook runs inside the host.
pub const NATIVE_KINDS: usize = HookKind::Keyboard as usize + 1;

static MODULE: AtomicUsize = AtomicUsize::new(0);

/// Hook handles installed by this process, indexed by kind.
static HOOKS: [AtomicIsize; NATIVE_KINDS] = [const { AtomicIsize::new(0) }; NATIVE_KINDS];

#[unsafe(no_mangle)]
pub extern "system" fn DllMain(hinst: HINSTANCE, reason: u32, _: *mut c_void) -> BOOL {
    if reason == DLL_PROCESS_ATTACH {
        MODULE.store(hinst.0 as usize, Ordering::Relaxed);
        // SAFETY: called under the loader lock with our own module handle.
        unsafe {
            let _ = DisableThreadLibraryCalls(HMODULE::from(hinst));
        }
    }
    BOOL(1)
}

/// Installs the system-wide hook of `kind`, reporting to `host`.
///
/// A host already registered for the kind is told it was replaced.
/// Returns zero on failure.
#[unsafe(no_mangle)]
pub extern "system" fn install_hook(kind: u32, host: isize, drag_by_mouse: u32) -> BOOL {
    let Some((kind, hook_id, proc)) = HookKind::from_u32(kind).and_then(native) else {
        return BOOL(0);
    };
    let Some(shared) = shared::get() else {
        return BOOL(0);
    };
    let slot = kind as usize;

    uninstall_local(slot);

    let previous = shared.hosts[slot].swap(host, Ordering::SeqCst);
    if previous != 0
        && previous != host
        && let Some(name) = names::replaced(kind)
    {
        post(previous, name, 0, 0);
    }
    shared.drag_by_mouse.store(drag_by_mouse, Ordering::SeqCst);

    let module = HINSTANCE(MODULE.load(Ordering::Relaxed) as *mut c_void);
    // SAFETY: `proc` lives in this module, which stays loaded while the hook exists.
    match unsafe { SetWindowsHookExW(hook_id, proc, Some(module), 0) } {
        Ok(hook) => {
            HOOKS[slot].store(hook.0 as isize, Ordering::SeqCst);
            BOOL(1)
        }
        Err(_) => {
            let _ = shared.hosts[slot].compare_exchange(host, 0, Ordering::SeqCst, Ordering::SeqCst);
            BOOL(0)
        }
    }
}

/// Removes the hook of `kind` installed by this process.
#[unsafe(no_mangle)]
pub extern "system" fn uninstall_hook(kind: u32, host: isize) -> BOOL {
    let Some(kind) = HookKind::from_u32(kind).filter(|k| (*k as usize) < NATIVE_KINDS) else {
        return BOOL(0);
    };
    let slot = kind as usize;
    if let Some(shared) = shared::get() {
        let _ = shared.hosts[slot].compare_exchange(host, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
    BOOL(uninstall_local(slot) as i32)
}

fn uninstall_local(slot: usize) -> bool {
    let raw = HOOKS[slot].swap(0, Ordering::SeqCst);
    if raw == 0 {
        return false;
    }
    // SAFETY: the handle came from SetWindowsHookExW in this process.
    unsafe { UnhookWindowsHookEx(HHOOK(raw as *mut c_void)).is_ok() }
}

fn native(kind: HookKind) -> Option<(HookKind, WINDOWS_HOOK_ID, HOOKPROC)> {
    let (id, proc): (WINDOWS_HOOK_ID, HOOKPROC) = match kind {
        HookKind::Cbt => (WH_CBT, Some(procs::cbt)),
        HookKind::Shell => (WH_SHELL, Some(procs::shell)),
        HookKind::CallWndProc => (WH_CALLWNDPROC, Some(procs::call_wnd_proc)),
        HookKind::GetMsg => (WH_GETMESSAGE, Some(procs::get_msg)),
        HookKind::Mouse => (WH_MOUSE, Some(procs::mouse)),
        HookKind::MouseLl => (WH_MOUSE_LL, Some(procs::mouse_ll)),
        HookKind::Keyboard => (WH_KEYBOARD, Some(procs::keyboard)),
        HookKind::HotKey => return None,
    };
    Some((kind, id, proc))
}

/// Posts `name` to the host window registered for `kind`.
fn notify(kind: HookKind, name: &str, wparam: usize, lparam: isize) {
    let Some(shared) = shared::get() else {
        return;
    };
    let host = shared.hosts[kind as usize].load(Ordering::Relaxed);
    if host != 0 {
        post(host, name, wparam, lparam);
    }
}

fn post(host: isize, name: &str, wparam: usize, lparam: isize) {
    // SAFETY: registering a name and posting to a possibly stale handle
    // are both harmless; a dead host simply drops the message.
    unsafe {
        let id = RegisterWindowMessageW(&HSTRING::from(name));
        if id != 0 {
            let _ = PostMessageW(
                Some(HWND(host as *mut c_void)),
                id,
                WPARAM(wparam),
                LPARAM(lparam),
            );
        }
    }
}
