//! Reloads `config.toml` when it changes on disk.
//!
//! A background thread waits on a change notification for the config
//! directory, compares the file's mtime and sends every valid reload
//! to the host thread, then nudges the host window to pick it up.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use sysmenu_core::config::{self, Settings};
use tracing::{info, warn};
use windows::Win32::Foundation::{LPARAM, WAIT_OBJECT_0, WPARAM};
use windows::Win32::Storage::FileSystem::{
    FILE_NOTIFY_CHANGE_FILE_NAME, FILE_NOTIFY_CHANGE_LAST_WRITE, FindCloseChangeNotification,
    FindFirstChangeNotificationW, FindNextChangeNotification,
};
use windows::Win32::System::Threading::WaitForSingleObject;
use windows::Win32::UI::WindowsAndMessaging::PostMessageW;
use windows::core::HSTRING;

use crate::host_window::CONFIG_RELOADED;
use crate::hwnd;

/// Timeout between stop-flag checks when nothing changes (ms).
const WAIT_TIMEOUT_MS: u32 = 2000;

/// The running watcher thread.
pub struct Watcher {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl Watcher {
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.thread.join();
    }
}

/// Starts watching; reloads go to `tx` and `host` is told about each.
pub fn spawn(host: usize, tx: Sender<Settings>) -> Watcher {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::spawn(move || watch(host, &tx, &flag));
    Watcher { stop, thread }
}

fn watch(host: usize, tx: &Sender<Settings>, stop: &AtomicBool) {
    let (Some(dir), Some(path)) = (config::config_dir(), config::config_path()) else {
        info!("config directory not found, watcher exiting");
        return;
    };
    let mut last = mtime(&path);

    let flags = FILE_NOTIFY_CHANGE_LAST_WRITE | FILE_NOTIFY_CHANGE_FILE_NAME;
    // SAFETY: the directory string outlives the call.
    let Ok(handle) = (unsafe { FindFirstChangeNotificationW(&HSTRING::from(dir.as_os_str()), false, flags) })
    else {
        info!("no change notification for {}, watcher exiting", dir.display());
        return;
    };

    while !stop.load(Ordering::Relaxed) {
        // SAFETY: waits on the notification handle opened above.
        let result = unsafe { WaitForSingleObject(handle, WAIT_TIMEOUT_MS) };
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if result != WAIT_OBJECT_0 {
            continue;
        }

        let current = mtime(&path);
        if current != last {
            last = current;
            if !reload(host, tx) {
                break;
            }
        }

        // SAFETY: re-arms the same handle.
        let _ = unsafe { FindNextChangeNotification(handle) };
    }

    // SAFETY: closes the handle opened above.
    let _ = unsafe { FindCloseChangeNotification(handle) };
}

/// Sends a valid reload. Returns `false` once the host is gone.
fn reload(host: usize, tx: &Sender<Settings>) -> bool {
    match config::try_load() {
        Ok(settings) => {
            info!("config.toml changed, reloading");
            if tx.send(settings).is_err() {
                return false;
            }
            // SAFETY: posting never blocks on the host thread.
            unsafe {
                let _ = PostMessageW(Some(hwnd(host)), CONFIG_RELOADED, WPARAM(0), LPARAM(0));
            }
            true
        }
        Err(e) => {
            warn!("config.toml invalid, skipping: {e}");
            true
        }
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().ok().and_then(|m| m.modified().ok())
}
