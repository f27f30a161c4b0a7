pub fn execute() {
    if sysmenu_windows::host_window::find().is_some() {
        println!("sysmenu is running.");
        return;
    }

    // No host window: check for a PID file left by a host that was
    // killed without a clean shutdown.
    if let Ok(Some(pid)) = sysmenu_core::pid::read_pid_file() {
        if sysmenu_windows::process::is_process_alive(pid) {
            println!("sysmenu process exists (PID: {pid}) but has no host window.");
        } else {
            let _ = sysmenu_core::pid::remove_pid_file();
            println!("sysmenu is not running (cleaned up stale PID file).");
        }
    } else {
        println!("sysmenu is not running.");
    }
}
