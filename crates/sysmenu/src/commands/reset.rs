use sysmenu_core::GlobalAction;

/// Applies a global action in the running host, which forwards it to
/// its companion.
pub fn execute(action: GlobalAction) {
    if sysmenu_windows::host_window::request_global(action) {
        println!("Done.");
    } else {
        eprintln!("sysmenu is not running.");
        std::process::exit(1);
    }
}
