use std::sync::Arc;
use std::sync::mpsc;

use sysmenu_core::{Host, Result, WindowStateStore, config, log, pid, state_store};
use tracing::{info, warn};

use crate::companion::{self, CompanionProcess};
use crate::desktop::WinDesktop;
use crate::hook_backend::DllBackend;
use crate::{config_watcher, ctrl_c, dpi, enumerate, host_window, hwnd, process, prompt};

/// Runs a host until its window is closed.
///
/// Without `parent` this is the primary host: it owns the PID file and,
/// when it is a 32-bit process on a 64-bit system, starts the 64-bit
/// companion. With `parent` it is that companion and announces its own
/// window to the parent.
pub fn run(parent: Option<usize>) -> Result<()> {
    dpi::enable_dpi_awareness();
    let settings = Arc::new(config::load());
    let _log_guard = log::init(&settings.logging, companion::process_name());

    let primary = parent.is_none();
    if primary {
        pid::write_pid_file()?;
    }

    let result = serve(settings, parent);

    if primary {
        let _ = pid::remove_pid_file();
    }
    result
}

fn open_store() -> WindowStateStore {
    match config::config_dir() {
        Some(dir) => WindowStateStore::load(dir.join(state_store::host_file_name())),
        None => WindowStateStore::in_memory(),
    }
}

fn serve(settings: Arc<config::Settings>, parent: Option<usize>) -> Result<()> {
    let window = host_window::create(parent.is_none())?;
    ctrl_c::set_handler(window);

    let handle = window.0 as usize;
    let host = Host::new(
        handle,
        settings,
        WinDesktop::new(window),
        DllBackend::load(window),
        open_store(),
    );
    let mut host = if parent.is_some() { host.into_companion() } else { host };
    host.start_hooks();
    host.adopt(&enumerate::top_level_windows());

    let companion = match parent {
        Some(parent) => {
            if !host.announce_to_parent(parent) {
                warn!("parent host 0x{parent:X} did not answer");
            }
            None
        }
        None if process::host_is_wow64() => match companion::launch(window) {
            Ok(child) => Some(child),
            Err(e) => {
                prompt::error("sysmenu", &e.to_string());
                host.shutdown();
                return Err(e);
            }
        },
        None => None,
    };

    let (reload_tx, reload_rx) = mpsc::channel();
    host_window::receive_reloads(reload_rx);
    let watcher = config_watcher::spawn(handle, reload_tx);

    host_window::attach(host);
    info!("host 0x{handle:X} running");
    host_window::run_message_pump();
    watcher.stop();

    if let Some(mut host) = host_window::detach() {
        let companion_window = host.companion();
        host.shutdown();
        if let Some(child) = companion {
            stop_companion(child, companion_window);
        }
    }
    Ok(())
}

fn stop_companion(child: CompanionProcess, window: Option<usize>) {
    child.stop(window.map(hwnd));
}
