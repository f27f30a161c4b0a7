//! Maps menu command identifiers to window mutations.
//!
//! The dispatcher never holds a window beyond one call: it resolves the
//! handle through the registry, runs the command, and persists the
//! result when the window has "Save Selected Items" checked.

mod start_program;

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::desktop::{Desktop, LaunchRequest};
use crate::menu_id::{self, Alignment, Group, MenuCommand, Priority};
use crate::rect::Size;
use crate::registry::WindowRegistry;
use crate::screenshot;
use crate::state_store::WindowStateStore;
use crate::window::{Change, TitleButton, Window, geometry};

pub use start_program::{Placeholders, expand_arguments, launch_request};

/// Pause between hiding a window and freezing its process.
pub const SUSPEND_DELAY: Duration = Duration::from_millis(100);

/// Everything a command may touch besides its own window.
struct Context<'a> {
    settings: &'a Settings,
    desktop: &'a mut dyn Desktop,
    host: usize,
}

/// Borrowed view over the host's state for a single dispatch.
pub struct Dispatcher<'a> {
    pub registry: &'a mut WindowRegistry,
    pub store: &'a mut WindowStateStore,
    pub settings: &'a Settings,
    pub desktop: &'a mut dyn Desktop,
    /// The host's own window, never targeted by "other windows" commands.
    pub host: usize,
}

impl Dispatcher<'_> {
    /// Runs the command in the low word of `wparam` against `hwnd`.
    ///
    /// Unknown handles and identifiers are silent no-ops. Nothing here
    /// returns an error: failures are logged or shown to the user.
    pub fn dispatch(&mut self, hwnd: usize, wparam: usize) {
        let id = (wparam & 0xFFFF) as u32;
        let Some(window) = self.registry.find_mut(hwnd) else {
            return;
        };

        let mut ctx = Context {
            settings: self.settings,
            desktop: &mut *self.desktop,
            host: self.host,
        };
        if !execute(window, id, &mut ctx) {
            return;
        }
        debug!("command 0x{id:04X} on 0x{hwnd:X}");

        if id == menu_id::SAVE_SELECTED_ITEMS {
            let enabled = window.toggle(id);
            if let Some(identity) = window.identity() {
                window.refresh_state();
                self.store.remove(&identity);
                if enabled {
                    self.store.replace(&window.state);
                }
                save(self.store);
            }
        } else if window.is_checked(menu_id::SAVE_SELECTED_ITEMS)
            && !menu_id::TRANSIENT.contains(&id)
            && window.identity().is_some()
        {
            window.refresh_state();
            self.store.replace(&window.state);
            save(self.store);
        }
    }
}

fn save(store: &WindowStateStore) {
    if let Err(e) = store.save() {
        warn!("failed to save window states: {e}");
    }
}

/// Runs one command. Returns `false` when the identifier is not ours
/// or refers past the end of a configured list.
fn execute(window: &mut Window, id: u32, ctx: &mut Context<'_>) -> bool {
    match menu_id::resolve(id) {
        MenuCommand::MoveTo(index) => return move_to(window, index),
        MenuCommand::SizePreset(index) => return size_preset(window, index, ctx),
        MenuCommand::StartProgram(index) => return start_program(window, index, ctx),
        MenuCommand::Fixed(_) => {}
    }

    match id {
        menu_id::SC_MAXIMIZE => window.uncheck_group(Group::Size),
        id if menu_id::TRANSIENT.contains(&id) => {}

        menu_id::SAVE_SELECTED_ITEMS => {}

        menu_id::INFORMATION => ctx.desktop.show_info(&window.info()),

        menu_id::ROLLUP => {
            if window.is_rolled_up() {
                window.unroll();
                window.check(id, false);
            } else if window.roll_up() {
                window.uncheck_group(Group::Size);
                window.check(id, true);
            }
        }

        menu_id::AERO_GLASS => {
            let on = window.toggle(id);
            window.apply(Change::AeroGlass(on));
        }
        menu_id::TOPMOST => {
            let on = window.toggle(id);
            window.apply(Change::Topmost(on));
        }
        menu_id::HIDE_FOR_ALT_TAB => {
            let on = window.toggle(id);
            window.apply(Change::ToolWindow(on));
        }
        menu_id::CLICK_THROUGH => {
            let on = window.toggle(id);
            window.apply(Change::ClickThrough(on));
        }
        menu_id::DISABLE_MINIMIZE_BUTTON => toggle_button(window, id, TitleButton::Minimize),
        menu_id::DISABLE_MAXIMIZE_BUTTON => toggle_button(window, id, TitleButton::Maximize),
        menu_id::DISABLE_CLOSE_BUTTON => toggle_button(window, id, TitleButton::Close),
        menu_id::DRAG_BY_MOUSE => {
            window.toggle(id);
        }

        menu_id::SEND_TO_BOTTOM => {
            window.apply(Change::SendToBottom);
        }

        menu_id::OPEN_FILE_IN_EXPLORER => {
            if let Some(path) = window.process_path() {
                let request = LaunchRequest {
                    file_name: "explorer.exe".into(),
                    arguments: format!("/select, \"{path}\""),
                    show_window: true,
                    run_as: Default::default(),
                    working_directory: None,
                };
                if let Err(e) = ctx.desktop.launch(&request) {
                    debug!("explorer failed: {e}");
                }
            }
        }

        menu_id::SAVE_SCREENSHOT => save_screenshot(window, ctx),
        menu_id::COPY_SCREENSHOT => match ctx.desktop.capture(window.handle()) {
            Some(shot) => {
                ctx.desktop.set_clipboard_image(&shot);
            }
            None => debug!("nothing captured from 0x{:X}", window.handle()),
        },
        menu_id::COPY_WINDOW_TEXT => {
            let text = ctx.desktop.window_text(window.handle());
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                ctx.desktop.set_clipboard(Some(&text));
            }
        }
        menu_id::COPY_WINDOW_TITLE => {
            ctx.desktop.set_clipboard(Some(&window.title()));
        }
        menu_id::COPY_FULL_PROCESS_PATH => {
            if let Some(path) = window.process_path().map(str::to_string) {
                ctx.desktop.set_clipboard(Some(&path));
            }
        }
        menu_id::CLEAR_CLIPBOARD => {
            ctx.desktop.set_clipboard(None);
        }

        menu_id::MINIMIZE_TO_TRAY => {
            window.minimize_to_tray();
        }
        menu_id::MINIMIZE_ALWAYS_TO_TRAY => {
            window.toggle(id);
        }
        menu_id::SUSPEND_TO_TRAY => {
            if window.minimize_to_tray() {
                ctx.desktop.sleep(SUSPEND_DELAY);
                window.suspend();
            }
        }

        menu_id::MINIMIZE_OTHER_WINDOWS | menu_id::CLOSE_OTHER_WINDOWS => {
            let target = window.handle();
            let others: Vec<usize> = ctx
                .desktop
                .alt_tab_windows()
                .into_iter()
                .filter(|h| *h != target && *h != ctx.host)
                .collect();
            for hwnd in others {
                if id == menu_id::MINIMIZE_OTHER_WINDOWS {
                    ctx.desktop.post_sys_command(hwnd, menu_id::SC_MINIMIZE);
                } else {
                    ctx.desktop.post_close(hwnd);
                }
            }
        }

        menu_id::SIZE_DEFAULT => {
            window.select(Group::Size, id);
            window.apply(Change::ShowNormal);
            if let Some(rect) = window.default_rect() {
                window.set_bounds(rect);
            }
            window.discard_rollup();
        }
        menu_id::SIZE_CUSTOM => {
            let Some(frame) = window.frame() else {
                return true;
            };
            let current = frame.window.size();
            if let Some(requested) = ctx.desktop.prompt_size(current) {
                let size = geometry::sized(ctx.settings.sizer, requested, &frame);
                window.set_size(size, None, None);
                window.select(Group::Size, id);
                window.discard_rollup();
            }
        }

        menu_id::TRANS_DEFAULT => {
            window.select(Group::Transparency, id);
            window.set_transparency(None);
        }
        menu_id::TRANS_CUSTOM => {
            let current = window.transparency().unwrap_or(0);
            if let Some(percent) = ctx.desktop.prompt_transparency(current) {
                window.select(Group::Transparency, id);
                window.set_transparency(Some(percent));
            }
        }
        id if menu_id::transparency_percent(id).is_some() => {
            window.select(Group::Transparency, id);
            window.set_transparency(menu_id::transparency_percent(id));
        }

        menu_id::ALIGN_DEFAULT => {
            window.select(Group::Alignment, id);
            window.clear_alignment();
            if let Some(rect) = window.default_rect() {
                window.apply(Change::ShowNormal);
                window.apply(Change::Position(rect.position()));
            }
        }
        menu_id::ALIGN_CUSTOM => {
            let Some(rect) = window.rect() else {
                return true;
            };
            if let Some(position) = ctx.desktop.prompt_position(rect.position()) {
                window.select(Group::Alignment, id);
                window.clear_alignment();
                window.apply(Change::ShowNormal);
                window.apply(Change::Position(position));
            }
        }
        id if Alignment::from_id(id).is_some() => {
            if let Some(alignment) = Alignment::from_id(id) {
                window.select(Group::Alignment, id);
                window.apply(Change::ShowNormal);
                window.set_alignment(alignment);
            }
        }

        id if Priority::from_id(id).is_some() => {
            if let Some(priority) = Priority::from_id(id) {
                window.select(Group::Priority, id);
                window.set_priority(priority);
            }
        }

        _ => return false,
    }
    true
}

fn toggle_button(window: &mut Window, id: u32, button: TitleButton) {
    let on = window.toggle(id);
    window.apply(Change::DisableButton(button, on));
}

fn move_to(window: &mut Window, index: usize) -> bool {
    let Some(target) = window.menu.monitor(index).map(|m| m.work_area) else {
        return false;
    };
    let (Some(rect), Some(from)) = (window.rect(), window.work_area()) else {
        return true;
    };
    let position = geometry::moved_to_monitor(rect, from, target);
    window.apply(Change::ShowNormal);
    window.apply(Change::Position(position));
    true
}

fn size_preset(window: &mut Window, index: usize, ctx: &mut Context<'_>) -> bool {
    let Some(preset) = ctx.settings.menu.window_size.get(index) else {
        return false;
    };
    let requested = Size::new(preset.width, preset.height);

    window.select(Group::Size, menu_id::size_preset(index));
    window.apply(Change::ShowNormal);
    let size = match window.frame() {
        Some(frame) => geometry::sized(ctx.settings.sizer, requested, &frame),
        None => requested,
    };
    window.apply_preset(preset, size);
    window.discard_rollup();
    true
}

/// Captures before asking for a path so the dialog is not in the picture.
fn save_screenshot(window: &Window, ctx: &mut Context<'_>) {
    let Some(shot) = ctx.desktop.capture(window.handle()) else {
        debug!("nothing captured from 0x{:X}", window.handle());
        return;
    };
    let Some(path) = ctx.desktop.prompt_save_path(&screenshot::file_name_for(&window.title())) else {
        return;
    };
    if let Err(e) = shot.save(&path) {
        warn!("{e}");
        ctx.desktop.notify_error("Save Screenshot", &e.to_string());
    }
}

fn start_program(window: &mut Window, index: usize, ctx: &mut Context<'_>) -> bool {
    let Some(item) = ctx.settings.menu.start_program.get(index) else {
        return false;
    };

    let title = window.title();
    let process_name = window.process().and_then(|p| p.file_name());
    let values = Placeholders {
        process_id: window.process().map(|p| p.pid),
        process_name: process_name.as_deref(),
        window_title: &title,
    };

    let desktop = &mut *ctx.desktop;
    let request = launch_request(item, &values, window.process_path(), &mut |name| {
        desktop.prompt_parameter(name)
    });
    let Some(request) = request else {
        debug!("launch of {} cancelled", item.file_name);
        return true;
    };

    if let Err(e) = ctx.desktop.launch(&request) {
        warn!("{e}");
        ctx.desktop.notify_error(&item.title, &e.to_string());
    }
    true
}

#[cfg(test)]
mod tests;
