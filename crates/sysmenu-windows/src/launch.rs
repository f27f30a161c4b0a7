use sysmenu_core::config::RunAs;
use sysmenu_core::{Error, LaunchRequest, Result};
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::{SW_HIDE, SW_SHOWNORMAL};
use windows::core::{HSTRING, PCWSTR, w};

/// ShellExecute reports success with values above this.
const SE_ERR_MAX: isize = 32;

/// Starts a program through the shell, elevated for `RunAs::Administrator`.
pub fn launch(request: &LaunchRequest) -> Result<()> {
    let verb = match request.run_as {
        RunAs::Administrator => w!("runas"),
        RunAs::Normal => w!("open"),
    };
    let show = if request.show_window { SW_SHOWNORMAL } else { SW_HIDE };
    let file = HSTRING::from(request.file_name.as_str());
    let arguments = HSTRING::from(request.arguments.as_str());
    let directory = request.working_directory.as_deref().map(HSTRING::from);
    let directory = directory.as_ref().map_or(PCWSTR::null(), |d| PCWSTR(d.as_ptr()));

    // SAFETY: every string outlives the call.
    let result = unsafe { ShellExecuteW(None, verb, &file, &arguments, directory, show) };
    if result.0 as isize > SE_ERR_MAX {
        return Ok(());
    }

    Err(Error::Launch {
        file: request.file_name.clone(),
        reason: std::io::Error::last_os_error().to_string(),
    })
}
