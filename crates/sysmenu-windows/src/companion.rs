use std::path::PathBuf;
use std::process::{Child, Command};
use std::thread;
use std::time::{Duration, Instant};

use sysmenu_core::{Error, Result};
use tracing::{info, warn};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_CLOSE};

/// Host executable built for 64-bit targets; the 32-bit build is
/// `sysmenu.exe`.
pub const HOST_64: &str = "sysmenu64.exe";

const STOP_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Log name of this build's host process.
pub fn process_name() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "sysmenu64"
    } else {
        "sysmenu"
    }
}

fn companion_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::Companion("executable has no parent directory".into()))?;
    Ok(dir.join(HOST_64))
}

/// The 64-bit host started by a 32-bit host on a 64-bit system.
pub struct CompanionProcess {
    child: Child,
}

/// Starts the 64-bit host next to this executable, telling it which
/// window to announce itself to.
pub fn launch(parent: HWND) -> Result<CompanionProcess> {
    let path = companion_path()?;
    if !path.exists() {
        return Err(Error::Companion(format!("{} not found", path.display())));
    }
    let child = Command::new(&path)
        .arg("run")
        .arg("--parent-handle")
        .arg((parent.0 as usize).to_string())
        .spawn()
        .map_err(|e| Error::Companion(format!("{}: {e}", path.display())))?;
    info!("companion started with pid {}", child.id());
    Ok(CompanionProcess { child })
}

impl CompanionProcess {
    /// Closes the companion's host window and waits for it to exit,
    /// killing it after a grace period.
    pub fn stop(mut self, window: Option<HWND>) {
        if let Some(window) = window {
            // SAFETY: posting never blocks on the target.
            unsafe {
                let _ = PostMessageW(Some(window), WM_CLOSE, WPARAM(0), LPARAM(0));
            }
        }

        let deadline = Instant::now() + STOP_TIMEOUT;
        while Instant::now() < deadline {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(_) => break,
            }
        }

        warn!("companion did not exit in time, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
