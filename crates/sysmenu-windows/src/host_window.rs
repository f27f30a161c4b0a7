//! The hidden host window.
//!
//! Hook notifications, bridge messages, tray callbacks and CLI requests
//! all arrive here. The [`Host`] lives in a thread-local next to the
//! window procedure; a message that arrives while the host is busy (a
//! prompt's nested loop, a synchronous bridge send) is queued and
//! handled, in order, as soon as the running call returns.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use sysmenu_core::hook::names;
use sysmenu_core::{GlobalAction, Host, RawMessage, Result, Settings};
use tracing::debug;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    ChangeWindowMessageFilterEx, CreateWindowExW, DefWindowProcW, DispatchMessageW, FindWindowW, GetMessageW,
    MSG, MSGFLT_ALLOW, PostMessageW, PostQuitMessage, RegisterClassW, RegisterWindowMessageW, SMTO_ABORTIFHUNG,
    SendMessageTimeoutW, TranslateMessage, WM_CLOSE, WM_COPYDATA, WM_DESTROY, WM_LBUTTONDBLCLK, WM_LBUTTONUP,
    WM_APP, WNDCLASSW, WS_EX_TOOLWINDOW,
};
use windows::core::{HSTRING, PCWSTR, w};

use crate::desktop::WinDesktop;
use crate::hook_backend::DllBackend;
use crate::tray::TRAY_CALLBACK;
use crate::{bridge, platform_error};

pub type WinHost = Host<WinDesktop, DllBackend>;

/// First identifier handed out by `RegisterWindowMessageW`.
const FIRST_REGISTERED: u32 = 0xC000;

const REQUEST_TIMEOUT_MS: u32 = 2000;

/// Posted by the config watcher after queueing a reload.
pub const CONFIG_RELOADED: u32 = WM_APP + 3;

enum Pending {
    Hook(RawMessage),
    Bridge(i64, Vec<u8>),
    Global(i64),
    Tray(usize),
    Settings(Settings),
}

thread_local! {
    static HOST: RefCell<Option<WinHost>> = const { RefCell::new(None) };
    static PENDING: RefCell<VecDeque<Pending>> = const { RefCell::new(VecDeque::new()) };
    static GLOBAL_ACTION_ID: Cell<u32> = const { Cell::new(0) };
    static RELOADS: RefCell<Option<Receiver<Settings>>> = const { RefCell::new(None) };
}

fn global_action_id() -> u32 {
    // SAFETY: registration has no preconditions.
    unsafe { RegisterWindowMessageW(&HSTRING::from(names::GLOBAL_ACTION)) }
}

const PRIMARY_TITLE: PCWSTR = w!("sysmenu");
const COMPANION_TITLE: PCWSTR = w!("sysmenu companion");

/// Creates the hidden host window on the calling thread.
///
/// Not a message-only window: hooked processes and the companion find
/// it by handle, and it must receive broadcasts. Only the primary host
/// carries the title the CLI looks for.
pub fn create(primary: bool) -> Result<HWND> {
    let class_name = w!("SysmenuHost");
    let wc = WNDCLASSW {
        lpfnWndProc: Some(host_proc),
        lpszClassName: class_name,
        ..Default::default()
    };

    // SAFETY: registers our class and creates one hidden window with it.
    unsafe {
        if RegisterClassW(&wc) == 0 {
            debug!("host window class already registered");
        }
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW,
            class_name,
            if primary { PRIMARY_TITLE } else { COMPANION_TITLE },
            Default::default(),
            0,
            0,
            0,
            0,
            None,
            None,
            None,
            None,
        )
        .map_err(platform_error)?;

        // The companion may run at a different integrity level.
        let _ = ChangeWindowMessageFilterEx(hwnd, WM_COPYDATA, MSGFLT_ALLOW, None);
        let global = global_action_id();
        if global != 0 {
            let _ = ChangeWindowMessageFilterEx(hwnd, global, MSGFLT_ALLOW, None);
        }
        GLOBAL_ACTION_ID.with(|id| id.set(global));
        Ok(hwnd)
    }
}

/// Hands the host to the window procedure.
pub fn attach(host: WinHost) {
    HOST.with(|cell| *cell.borrow_mut() = Some(host));
}

/// Receives settings reloaded by the config watcher.
pub fn receive_reloads(rx: Receiver<Settings>) {
    RELOADS.with(|cell| *cell.borrow_mut() = Some(rx));
}

/// Takes the host back once the pump has stopped.
pub fn detach() -> Option<WinHost> {
    PENDING.with(|queue| queue.borrow_mut().clear());
    RELOADS.with(|cell| cell.borrow_mut().take());
    HOST.with(|cell| cell.borrow_mut().take())
}

/// Runs the message pump until `WM_QUIT`.
pub fn run_message_pump() {
    let mut msg = MSG::default();
    // SAFETY: standard message loop on the host thread.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Finds the running primary host window.
pub fn find() -> Option<HWND> {
    // SAFETY: read-only lookup by class and title.
    unsafe { FindWindowW(w!("SysmenuHost"), PRIMARY_TITLE) }.ok()
}

/// Asks a running host to shut down. Returns whether one was found.
pub fn close_running() -> bool {
    let Some(host) = find() else {
        return false;
    };
    // SAFETY: posting never blocks on the target.
    unsafe { PostMessageW(Some(host), WM_CLOSE, WPARAM(0), LPARAM(0)) }.is_ok()
}

/// Asks a running host to apply a global action. Returns whether a
/// host accepted the request.
pub fn request_global(action: GlobalAction) -> bool {
    let Some(host) = find() else {
        return false;
    };
    let id = global_action_id();
    if id == 0 {
        return false;
    }
    // SAFETY: synchronous send to another process with a timeout.
    let sent = unsafe {
        SendMessageTimeoutW(
            host,
            id,
            WPARAM(action.tag() as usize),
            LPARAM(0),
            SMTO_ABORTIFHUNG,
            REQUEST_TIMEOUT_MS,
            None,
        )
    };
    sent.0 != 0
}

fn handle(host: &mut WinHost, item: Pending) {
    match item {
        Pending::Hook(msg) => {
            host.process_message(&msg);
        }
        Pending::Bridge(tag, payload) => host.receive_bridge(tag, &payload),
        Pending::Global(tag) => host.request_global(tag),
        Pending::Tray(hwnd) => host.restore_from_tray(hwnd),
        Pending::Settings(settings) => host.replace_settings(Arc::new(settings)),
    }
}

fn deliver(item: Pending) {
    HOST.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            PENDING.with(|queue| queue.borrow_mut().push_back(item));
            return;
        };
        let Some(host) = slot.as_mut() else {
            return;
        };
        handle(host, item);
        while let Some(next) = PENDING.with(|queue| queue.borrow_mut().pop_front()) {
            handle(host, next);
        }
    });
}

unsafe extern "system" fn host_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_COPYDATA => {
            // SAFETY: this is the WM_COPYDATA being handled.
            if let Some((tag, payload)) = unsafe { bridge::receive(lparam) } {
                deliver(Pending::Bridge(tag, payload));
            }
            LRESULT(1)
        }
        TRAY_CALLBACK => {
            let mouse = (lparam.0 & 0xFFFF) as u32;
            if mouse == WM_LBUTTONUP || mouse == WM_LBUTTONDBLCLK {
                deliver(Pending::Tray(wparam.0 as u32 as usize));
            }
            LRESULT(0)
        }
        CONFIG_RELOADED => {
            let latest = RELOADS.with(|cell| cell.borrow().as_ref().and_then(|rx| rx.try_iter().last()));
            if let Some(settings) = latest {
                deliver(Pending::Settings(settings));
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            // SAFETY: ends this thread's pump.
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ if msg >= FIRST_REGISTERED => {
            if msg == GLOBAL_ACTION_ID.with(Cell::get) {
                deliver(Pending::Global(wparam.0 as i64));
                return LRESULT(1);
            }
            deliver(Pending::Hook(RawMessage::new(msg, wparam.0, lparam.0)));
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
