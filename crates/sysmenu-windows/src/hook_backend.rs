use std::path::PathBuf;

use sysmenu_core::hook::names;
use sysmenu_core::{Error, HookBackend, HookKind, HookParams, Result};
use tracing::{debug, warn};
use windows::Win32::Foundation::{FreeLibrary, HMODULE, HWND, LPARAM, WPARAM};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows::Win32::UI::WindowsAndMessaging::{
    ChangeWindowMessageFilterEx, HWND_BROADCAST, MSGFLT_ALLOW, RegisterWindowMessageW, SendNotifyMessageW,
    WM_NULL,
};
use windows::core::{BOOL, HSTRING, s};

use crate::input;

type InstallFn = unsafe extern "system" fn(kind: u32, host: isize, drag_by_mouse: u32) -> BOOL;
type UninstallFn = unsafe extern "system" fn(kind: u32, host: isize) -> BOOL;

/// File name of the hook library matching this build's pointer width.
pub fn library_name() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "sysmenu_hook64.dll"
    } else {
        "sysmenu_hook.dll"
    }
}

fn library_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(library_name())))
        .unwrap_or_else(|| PathBuf::from(library_name()))
}

struct Library {
    module: HMODULE,
    install: InstallFn,
    uninstall: UninstallFn,
}

/// Drives the native hook library for the system-wide hooks and the
/// in-process keyboard hook for hotkeys.
pub struct DllBackend {
    host: HWND,
    library: Option<Library>,
}

impl DllBackend {
    /// Loads the hook library from the executable's directory.
    ///
    /// A missing library is not fatal: every library-backed hook then
    /// fails to install and stays inert.
    pub fn load(host: HWND) -> Self {
        let path = library_path();
        let library = load_library(&path);
        if library.is_none() {
            warn!("hook library {} unavailable", path.display());
        }
        Self { host, library }
    }
}

fn load_library(path: &std::path::Path) -> Option<Library> {
    // SAFETY: loading our own library; the exports are checked before use
    // and have the signatures declared above.
    unsafe {
        let module = LoadLibraryW(&HSTRING::from(path)).ok()?;
        let install = GetProcAddress(module, s!("install_hook"));
        let uninstall = GetProcAddress(module, s!("uninstall_hook"));
        match (install, uninstall) {
            (Some(install), Some(uninstall)) => Some(Library {
                module,
                install: std::mem::transmute::<_, InstallFn>(install),
                uninstall: std::mem::transmute::<_, UninstallFn>(uninstall),
            }),
            _ => {
                let _ = FreeLibrary(module);
                None
            }
        }
    }
}

impl HookBackend for DllBackend {
    fn register_message(&mut self, name: &str) -> Option<u32> {
        // SAFETY: registration and filter changes have no preconditions.
        unsafe {
            let id = RegisterWindowMessageW(&HSTRING::from(name));
            if id == 0 {
                return None;
            }
            // Lets hooked processes at a lower integrity level reach us.
            if ChangeWindowMessageFilterEx(self.host, id, MSGFLT_ALLOW, None).is_err() {
                debug!("message filter unchanged for {name}");
            }
            Some(id)
        }
    }

    fn install(&mut self, kind: HookKind, params: &HookParams) -> Result<()> {
        if kind == HookKind::HotKey {
            let message = self.register_message(names::HOTKEY).ok_or(Error::Hook(kind))?;
            return input::install(self.host, message, &params.hotkeys).map_err(|_| Error::Hook(kind));
        }

        let library = self.library.as_ref().ok_or(Error::Hook(kind))?;
        // SAFETY: calling the export with the declared signature.
        let ok = unsafe { (library.install)(kind as u32, params.host as isize, params.drag_by_mouse) };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(Error::Hook(kind))
        }
    }

    fn uninstall(&mut self, kind: HookKind) {
        if kind == HookKind::HotKey {
            input::uninstall();
            return;
        }
        if let Some(library) = &self.library {
            // SAFETY: calling the export with the declared signature.
            unsafe {
                (library.uninstall)(kind as u32, self.host.0 as isize);
            }
        }
    }

    fn wake_message_loops(&mut self) {
        // SAFETY: a non-blocking broadcast of a no-op message.
        unsafe {
            let _ = SendNotifyMessageW(HWND_BROADCAST, WM_NULL, WPARAM(0), LPARAM(0));
        }
    }
}

impl Drop for DllBackend {
    fn drop(&mut self) {
        if let Some(library) = self.library.take() {
            // SAFETY: every hook was removed by the host's shutdown.
            unsafe {
                let _ = FreeLibrary(library.module);
            }
        }
    }
}
