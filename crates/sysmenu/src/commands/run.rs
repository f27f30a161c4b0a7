pub fn execute(parent_handle: Option<usize>) {
    if let Err(e) = sysmenu_windows::daemon::run(parent_handle) {
        eprintln!("Host error: {e}");
        std::process::exit(1);
    }
}
