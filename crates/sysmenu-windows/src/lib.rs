#![cfg(windows)]

/// Host binary names and the companion process.
pub mod companion;

/// Host startup and shutdown.
pub mod daemon;

/// `Desktop` implementation over Win32.
pub mod desktop;

/// Win32 window enumeration.
pub mod enumerate;

/// Hook backend driving the native hook library.
pub mod hook_backend;

/// The hidden host window and its message pump.
pub mod host_window;

/// Process utilities (alive check, bitness, priority, suspension).
pub mod process;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

mod bridge;
mod clipboard;
mod config_watcher;
mod ctrl_c;
mod dpi;
mod frame;
mod input;
mod launch;
mod monitor;
mod prompt;
mod screenshot;
mod tray;

pub use desktop::WinDesktop;
pub use enumerate::top_level_windows;
pub use hook_backend::DllBackend;
pub use window::WinWindow;

use std::ffi::c_void;

use windows::Win32::Foundation::HWND;

/// Builds an `HWND` from the pointer-sized handle the core works with.
pub(crate) fn hwnd(raw: usize) -> HWND {
    HWND(raw as *mut c_void)
}

/// Converts a Win32 error into the core's platform error.
pub(crate) fn platform_error(e: windows::core::Error) -> sysmenu_core::Error {
    sysmenu_core::Error::Platform(e.message())
}
