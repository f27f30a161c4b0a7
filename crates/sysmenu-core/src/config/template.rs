/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `sysmenu init` to create a starter file that users can edit.
pub fn generate_config() -> String {
    r##"# sysmenu configuration
# Location: ~/.config/sysmenu/config.toml

# Executables (file name only) whose windows never get the extra menu items.
process_exclusions = ["explorer.exe"]

# How resize presets are interpreted:
# "window_with_margins"    preset is the outer window size
# "window_without_margins" preset is the visible size; invisible borders are added
# "client_area"            preset is the client area; title bar and borders are added
sizer = "window_with_margins"

# Ctrl+Shift+Down minimizes the foreground window to the notification area.
minimize_to_tray_shortcut = false

# Which parts of a saved window state are restored when the window reappears.
[save_selected_items]
size = true
transparency = true
priority = true
alignment = true
always_on_top = true
hide_for_alt_tab = true
minimize_to_tray_always = true
buttons = true
rollup = true

[menu]
# Items to leave out of the system menu, e.g. ["aero_glass", "suspend_to_tray"].
hidden = []

# Global hotkeys for menu items (up to three keys each).
# [[menu.hotkey]]
# item = "topmost"
# keys = ["ctrl", "alt", "t"]

[[menu.window_size]]
title = "1024x768"
width = 1024
height = 768

[[menu.window_size]]
title = "1280x720"
width = 1280
height = 720

# Programs launched against the window's process. Placeholders between the
# delimiters are replaced: {ProcessId}, {ProcessName}, {WindowTitle}.
# Any other placeholder asks for a value before launching.
[[menu.start_program]]
title = "Command Prompt"
file_name = "cmd.exe"
arguments = ""
use_window_working_directory = true

[closer]
# close_foreground_window | close_window_under_cursor |
# kill_process_with_foreground_window | kill_process_with_window_under_cursor
kind = "close_foreground_window"
# Keys to hold. With mouse_button = "none" the keys alone trigger the closer.
keys = []
# none | left | right | middle
mouse_button = "none"

[logging]
# Write logs to ~/.config/sysmenu/logs/.
enabled = false
level = "info"
max_file_mb = 10
"##
    .to_string()
}
