use std::thread;
use std::time::{Duration, Instant};

use sysmenu_core::pid;
use sysmenu_windows::{host_window, process};

/// Covers the host reverting every window and stopping its companion.
const GRACE: Duration = Duration::from_secs(8);

pub fn execute() {
    let pid = pid::read_pid_file().ok().flatten();

    if host_window::close_running() {
        if let Some(pid) = pid {
            wait_for_exit(pid);
        }
        if pid.is_none_or(|pid| !process::is_process_alive(pid)) {
            let _ = pid::remove_pid_file();
            println!("sysmenu stopped.");
            return;
        }
        eprintln!("sysmenu did not stop in time.");
    }

    // No host window answered; the process may still be alive.
    match pid {
        Some(pid) if process::is_process_alive(pid) => {
            if process::terminate(pid) {
                let _ = pid::remove_pid_file();
                println!("sysmenu stopped (killed PID {pid}).");
            } else {
                eprintln!("Failed to kill process {pid}.");
                std::process::exit(1);
            }
        }
        _ => {
            let _ = pid::remove_pid_file();
            println!("sysmenu is not running.");
        }
    }
}

fn wait_for_exit(pid: u32) {
    let deadline = Instant::now() + GRACE;
    while Instant::now() < deadline && process::is_process_alive(pid) {
        thread::sleep(Duration::from_millis(100));
    }
}
