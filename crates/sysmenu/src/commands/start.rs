use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

/// Windows process creation flags for launching a fully detached host.
///
/// `CREATE_NEW_PROCESS_GROUP` (0x200) keeps Ctrl+C in the CLI terminal
/// away from the host. `CREATE_NO_WINDOW` (0x08000000) gives it no
/// console and no inherited console handles.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if sysmenu_windows::host_window::find().is_some() {
        println!("sysmenu is already running.");
        return;
    }

    // Clean up a PID file left by an unclean shutdown.
    if let Ok(Some(pid)) = sysmenu_core::pid::read_pid_file() {
        if sysmenu_windows::process::is_process_alive(pid) {
            println!("sysmenu process exists (PID: {pid}) but has no host window.");
            return;
        }
        let _ = sysmenu_core::pid::remove_pid_file();
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error: could not locate the sysmenu executable: {e}");
            std::process::exit(1);
        }
    };

    // Re-run ourselves with the hidden `run` subcommand.
    let spawned = Command::new(exe)
        .arg("run")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();

    match spawned {
        Ok(mut child) => {
            let pid = child.id();
            let _ = child.try_wait();
            println!("sysmenu started (PID: {pid}).");
        }
        Err(e) => {
            eprintln!("Error: failed to start sysmenu: {e}");
            std::process::exit(1);
        }
    }
}
