//! Ctrl+C handling for a host started from a console.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_CLOSE};
use windows::core::BOOL;

use crate::hwnd;

/// Host window closed by the handler. Zero until registered.
static HOST: AtomicUsize = AtomicUsize::new(0);

/// Closes `host` on Ctrl+C or Ctrl+Break, which ends its pump and runs
/// the normal shutdown.
pub fn set_handler(host: windows::Win32::Foundation::HWND) {
    HOST.store(host.0 as usize, Ordering::SeqCst);
    // SAFETY: the handler only reads an atomic and posts a message.
    if let Err(e) = unsafe { SetConsoleCtrlHandler(Some(handler), true) } {
        warn!("no console control handler: {}", e.message());
    }
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    let host = HOST.load(Ordering::SeqCst);
    if host != 0 && (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT) {
        // SAFETY: posting is safe from the console handler thread.
        unsafe {
            let _ = PostMessageW(Some(hwnd(host)), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
        return BOOL(1);
    }
    BOOL(0)
}
