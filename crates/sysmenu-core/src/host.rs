//! The host: owner of hooks, registry, store and companion link.
//!
//! Every hook message reaching the host window goes through
//! [`Host::process_message`]. Hooks append to the event log, then the
//! host drains it in order. This is the only place the registry and
//! the store are mutated.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bridge::{BridgeCommand, BridgeMessage, Companion, GlobalAction, Origin};
use crate::config::{CloserButton, Settings};
use crate::desktop::Desktop;
use crate::dispatch::Dispatcher;
use crate::event::{EventLog, HookEvent, MouseButton, MouseTransition};
use crate::hook::{
    CallWndProcHook, CbtHook, GetMsgHook, Hook, HookBackend, HookKind, HookParams, HotKeyHook,
    KeyboardHook, MouseHook, MouseLlHook, RawMessage, ShellHook,
};
use crate::keys::{VK_CONTROL, VK_DOWN, VK_SHIFT};
use crate::menu_id::{self, Group};
use crate::rect::Point;
use crate::registry::WindowRegistry;
use crate::state_store::WindowStateStore;
use crate::window::Change;

const SW_SHOWMINIMIZED: u32 = 2;
const SW_MAXIMIZE: u32 = 3;
const SW_MINIMIZE: u32 = 6;

pub struct Host<D: Desktop, B: HookBackend> {
    handle: usize,
    settings: Arc<Settings>,
    desktop: D,
    backend: B,
    registry: WindowRegistry,
    store: WindowStateStore,
    companion: Companion,
    /// Whether this host owns the machine-wide low-level hooks.
    primary: bool,
    /// Polled in this order for every message.
    hooks: Vec<Box<dyn Hook>>,
    log: EventLog,
}

impl<D: Desktop, B: HookBackend> Host<D, B> {
    pub fn new(handle: usize, settings: Arc<Settings>, desktop: D, backend: B, store: WindowStateStore) -> Self {
        let hooks: Vec<Box<dyn Hook>> = vec![
            Box::new(ShellHook::new()),
            Box::new(CbtHook::new()),
            Box::new(CallWndProcHook::new()),
            Box::new(GetMsgHook::new()),
            Box::new(MouseHook::new()),
            Box::new(MouseLlHook::new()),
            Box::new(KeyboardHook::new()),
            Box::new(HotKeyHook::new()),
        ];
        Self {
            handle,
            settings,
            desktop,
            backend,
            registry: WindowRegistry::new(),
            store,
            companion: Companion::default(),
            primary: true,
            hooks,
            log: EventLog::default(),
        }
    }

    /// Marks this host as the other-bitness companion.
    ///
    /// Low-level hooks see every process regardless of bitness, so only
    /// the primary host runs the closer and the hotkeys.
    pub fn into_companion(mut self) -> Self {
        self.primary = false;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn handle(&self) -> usize {
        self.handle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn store(&self) -> &WindowStateStore {
        &self.store
    }

    pub fn companion(&self) -> Option<usize> {
        self.companion.handle()
    }

    fn wanted(&self, kind: HookKind) -> bool {
        let settings = &self.settings;
        match kind {
            HookKind::Cbt | HookKind::Shell | HookKind::CallWndProc | HookKind::GetMsg => true,
            HookKind::Mouse => settings.is_visible(menu_id::DRAG_BY_MOUSE),
            HookKind::MouseLl => self.primary && settings.closer_mouse_keys().is_some(),
            HookKind::Keyboard => settings.minimize_to_tray_shortcut,
            HookKind::HotKey => self.primary && !settings.hotkeys().is_empty(),
        }
    }

    /// Starts every hook the settings call for. Returns how many run.
    ///
    /// A hook that fails to start stays inert; the host keeps going.
    pub fn start_hooks(&mut self) -> usize {
        let params = HookParams {
            host: self.handle,
            drag_by_mouse: menu_id::DRAG_BY_MOUSE,
            hotkeys: self.settings.hotkeys(),
        };
        let wanted: Vec<bool> = self.hooks.iter().map(|h| self.wanted(h.kind())).collect();
        let mut started = 0;
        for (hook, wanted) in self.hooks.iter_mut().zip(wanted) {
            if wanted && hook.start(&mut self.backend, &params) {
                started += 1;
            }
        }
        info!("{started} hooks running");
        started
    }

    /// Tracks the windows found at startup.
    pub fn adopt(&mut self, handles: &[usize]) -> usize {
        let added = self
            .registry
            .adopt(handles, &self.desktop, &self.settings, &self.store);
        debug!("adopted {added} of {} windows", handles.len());
        added
    }

    /// Feeds a host window message through every hook, then handles
    /// the resulting events. Returns whether any hook claimed it.
    pub fn process_message(&mut self, msg: &RawMessage) -> bool {
        let mut matched = false;
        for hook in &mut self.hooks {
            matched |= hook.process_message(msg, &mut self.log);
        }
        while let Some(event) = self.log.pop() {
            self.handle_event(event);
        }
        matched
    }

    pub fn handle_event(&mut self, event: HookEvent) {
        match event {
            HookEvent::WindowCreated { hwnd, .. } => {
                self.registry
                    .add(hwnd, &self.desktop, &self.settings, &self.store);
            }
            HookEvent::WindowDestroyed { hwnd, .. } => {
                self.registry.remove(hwnd);
            }
            HookEvent::MinMax { hwnd, show } => self.min_max(hwnd, show),
            HookEvent::MoveSize { hwnd } => {
                if let Some(window) = self.registry.find_mut(hwnd) {
                    window.save_default_rect();
                }
            }
            HookEvent::SysCommand { hwnd, wparam, .. } => self.dispatch(hwnd, wparam),
            HookEvent::MouseButton {
                transition: MouseTransition::Down(button),
                point,
            } => self.closer_click(button, point),
            HookEvent::Keyboard { vk, down: true } => self.tray_shortcut(vk),
            HookEvent::HotKey { command } => self.hotkey(command),
            HookEvent::HookReplaced { kind } => {
                warn!("another instance replaced the {kind} hook");
            }
            HookEvent::Mouse { .. }
            | HookEvent::MouseLl { .. }
            | HookEvent::MouseButton { .. }
            | HookEvent::Keyboard { .. } => {}
        }
    }

    /// Runs a menu command against a tracked window.
    pub fn dispatch(&mut self, hwnd: usize, wparam: usize) {
        Dispatcher {
            registry: &mut self.registry,
            store: &mut self.store,
            settings: &self.settings,
            desktop: &mut self.desktop,
            host: self.handle,
        }
        .dispatch(hwnd, wparam);
    }

    fn min_max(&mut self, hwnd: usize, show: u32) {
        let Some(window) = self.registry.find_mut(hwnd) else {
            return;
        };
        match show {
            SW_MAXIMIZE => window.uncheck_group(Group::Size),
            SW_MINIMIZE | SW_SHOWMINIMIZED if window.is_checked(menu_id::MINIMIZE_ALWAYS_TO_TRAY) => {
                window.minimize_to_tray();
            }
            _ => {}
        }
    }

    fn tray_shortcut(&mut self, vk: u32) {
        if !self.settings.minimize_to_tray_shortcut || vk != VK_DOWN {
            return;
        }
        if !(self.desktop.is_key_down(VK_CONTROL) && self.desktop.is_key_down(VK_SHIFT)) {
            return;
        }
        if let Some(hwnd) = self.desktop.foreground_window()
            && let Some(window) = self.registry.find_mut(hwnd)
        {
            window.minimize_to_tray();
        }
    }

    fn closer_click(&mut self, button: MouseButton, point: Point) {
        let Some((configured, keys)) = self.settings.closer_mouse_keys() else {
            return;
        };
        let matches = matches!(
            (configured, button),
            (CloserButton::Left, MouseButton::Left)
                | (CloserButton::Right, MouseButton::Right)
                | (CloserButton::Middle, MouseButton::Middle)
        );
        if matches && keys.iter().all(|vk| self.desktop.is_key_down(*vk)) {
            self.close_target(Some(point));
        }
    }

    fn hotkey(&mut self, command: u32) {
        if command == menu_id::CLOSER {
            let cursor = self.desktop.cursor_position();
            self.close_target(cursor);
            return;
        }

        let Some(hwnd) = self.desktop.foreground_window() else {
            return;
        };
        if !self.desktop.has_system_menu(hwnd) {
            return;
        }
        let excluded = self
            .desktop
            .process_of(hwnd)
            .and_then(|p| p.file_name())
            .is_some_and(|name| self.settings.is_excluded(&name));
        if !excluded {
            self.desktop.post_sys_command(hwnd, command);
        }
    }

    /// Closes the window (or kills the process) picked by the closer.
    fn close_target(&mut self, cursor: Option<Point>) {
        let kind = self.settings.closer.kind;
        let target = if kind.targets_cursor() {
            cursor.and_then(|p| self.desktop.root_window_at(p))
        } else {
            self.desktop.foreground_window()
        };
        let Some(hwnd) = target.filter(|h| *h != self.handle) else {
            return;
        };

        if kind.kills_process() {
            if let Some(process) = self.desktop.process_of(hwnd) {
                debug!("closer terminates process {}", process.pid);
                self.desktop.terminate_process(process.pid);
            }
        } else {
            self.desktop.post_close(hwnd);
        }
    }

    /// Handles a `WM_COPYDATA` bridge message.
    pub fn receive_bridge(&mut self, tag: i64, payload: &[u8]) {
        match BridgeMessage::from_wire(tag, payload).decode() {
            BridgeCommand::ChildHandle(handle) => {
                if handle.is_none() {
                    debug!("companion sent an unusable handle");
                }
                self.companion.set(handle);
            }
            BridgeCommand::Global(action) => self.apply_global(action, Origin::Companion),
            BridgeCommand::Unknown(tag) => debug!("ignoring bridge tag {tag}"),
        }
    }

    /// Applies a global action to every tracked window.
    ///
    /// Only actions raised in this process are forwarded to the
    /// companion, so the pair never echoes.
    pub fn apply_global(&mut self, action: GlobalAction, origin: Origin) {
        for window in self.registry.iter_mut() {
            match action {
                GlobalAction::RestoreTransparency => {
                    window.select(Group::Transparency, menu_id::TRANS_DEFAULT);
                    window.set_transparency(None);
                }
                GlobalAction::DisableClickThrough => {
                    if window.is_checked(menu_id::CLICK_THROUGH) {
                        window.check(menu_id::CLICK_THROUGH, false);
                        window.apply(Change::ClickThrough(false));
                    }
                }
            }
        }

        if origin == Origin::Local
            && let Some(companion) = self.companion.handle()
            && !self.desktop.send_to_companion(companion, &BridgeMessage::global(action))
        {
            debug!("companion 0x{companion:X} did not accept {action:?}");
        }
    }

    /// Handles a global action request by its wire tag.
    pub fn request_global(&mut self, tag: i64) {
        match GlobalAction::from_tag(tag) {
            Some(action) => self.apply_global(action, Origin::Local),
            None => debug!("unknown global action {tag}"),
        }
    }

    /// Announces this host to the parent that launched it.
    pub fn announce_to_parent(&mut self, parent: usize) -> bool {
        self.companion.set(Some(parent));
        self.desktop
            .send_to_companion(parent, &BridgeMessage::child_handle(self.handle))
    }

    /// Brings back a window parked behind a tray placeholder.
    pub fn restore_from_tray(&mut self, hwnd: usize) {
        let Some(window) = self.registry.find_mut(hwnd) else {
            return;
        };
        window.restore_from_tray();
        if !window.exists() {
            self.registry.forget(hwnd);
        }
    }

    /// Swaps in a new settings snapshot. Affects windows tracked from now on.
    pub fn replace_settings(&mut self, settings: Arc<Settings>) {
        self.settings = settings;
    }

    /// Stops hooks, reverts every window and lets the hook library unload.
    pub fn shutdown(&mut self) {
        for hook in &mut self.hooks {
            hook.stop(&mut self.backend);
            self.backend.wake_message_loops();
        }
        self.registry.dispose_all();
        self.backend.wake_message_loops();
        info!("host stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CloserKind, HotkeyBinding};
    use crate::event::Source;
    use crate::hook::names;
    use crate::testing::{FakeBackend, FakeDesktop, FakeWindow};

    const HOST: usize = 0x900;

    fn host_with(settings: Settings, desktop: FakeDesktop) -> Host<FakeDesktop, FakeBackend> {
        let mut host = Host::new(
            HOST,
            Arc::new(settings),
            desktop,
            FakeBackend::default(),
            WindowStateStore::in_memory(),
        );
        host.start_hooks();
        host
    }

    fn notepad_desktop() -> FakeDesktop {
        let mut desktop = FakeDesktop::default();
        desktop.insert(FakeWindow::notepad(0x100).0);
        desktop
    }

    fn post(host: &mut Host<FakeDesktop, FakeBackend>, name: &str, wparam: usize, lparam: isize) -> bool {
        let msg = host.backend().message(name, wparam, lparam);
        host.process_message(&msg)
    }

    #[test]
    fn optional_hooks_follow_settings() {
        // Arrange
        let mut settings = Settings::default();
        settings.minimize_to_tray_shortcut = true;

        // Act
        let host = host_with(settings, FakeDesktop::default());

        // Assert
        assert_eq!(
            host.backend().installed,
            vec![
                HookKind::Shell,
                HookKind::Cbt,
                HookKind::CallWndProc,
                HookKind::GetMsg,
                HookKind::Mouse,
                HookKind::Keyboard,
            ]
        );
    }

    #[test]
    fn companion_leaves_low_level_hooks_to_the_primary() {
        // Arrange
        let mut settings = Settings::default();
        settings.closer.kind = CloserKind::CloseWindowUnderCursor;
        settings.closer.mouse_button = CloserButton::Middle;
        settings.menu.hotkey = vec![HotkeyBinding {
            item: "topmost".into(),
            keys: vec!["ctrl".into(), "alt".into(), "t".into()],
        }];
        let settings = Arc::new(settings);
        let mut primary = Host::new(
            HOST,
            Arc::clone(&settings),
            FakeDesktop::default(),
            FakeBackend::default(),
            WindowStateStore::in_memory(),
        );
        let mut companion = Host::new(
            HOST + 1,
            settings,
            FakeDesktop::default(),
            FakeBackend::default(),
            WindowStateStore::in_memory(),
        )
        .into_companion();

        // Act
        primary.start_hooks();
        companion.start_hooks();

        // Assert
        let installed = &primary.backend().installed;
        assert!(installed.contains(&HookKind::MouseLl));
        assert!(installed.contains(&HookKind::HotKey));
        let installed = &companion.backend().installed;
        assert!(!companion.is_primary());
        assert!(!installed.contains(&HookKind::MouseLl));
        assert!(!installed.contains(&HookKind::HotKey));
        assert!(installed.contains(&HookKind::Cbt));
    }

    #[test]
    fn either_signal_adds_and_removes_once() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());

        // Act
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);
        post(&mut host, names::CBT_CREATEWND, 0x100, 0);
        let after_create = host.registry().len();
        post(&mut host, names::CBT_DESTROYWND, 0x100, 0);
        post(&mut host, names::SHELL_WINDOWDESTROYED, 0x100, 0);

        // Assert
        assert_eq!(after_create, 1);
        assert!(host.registry().is_empty());
    }

    #[test]
    fn any_interleaving_leaves_at_most_one_record() {
        // Arrange
        let sequences: [&[(bool, Source)]; 4] = [
            &[(true, Source::Cbt), (true, Source::Shell), (true, Source::Cbt)],
            &[(true, Source::Shell), (false, Source::Cbt), (true, Source::Cbt)],
            &[(false, Source::Shell), (true, Source::Shell), (false, Source::Cbt)],
            &[(true, Source::Cbt), (false, Source::Cbt), (false, Source::Shell), (true, Source::Shell)],
        ];

        for sequence in sequences {
            let mut host = host_with(Settings::default(), notepad_desktop());

            // Act
            for (create, source) in sequence {
                let hwnd = 0x100;
                host.handle_event(if *create {
                    HookEvent::WindowCreated { hwnd, source: *source }
                } else {
                    HookEvent::WindowDestroyed { hwnd, source: *source }
                });
            }

            // Assert
            let expected = usize::from(sequence.last().is_some_and(|(create, _)| *create));
            assert_eq!(host.registry().len(), expected, "{sequence:?}");
        }
    }

    #[test]
    fn sys_command_from_get_message_is_dispatched() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);

        // Act
        post(&mut host, names::GETMSG, 0x100, menu_id::TOPMOST as isize);

        // Assert
        let window = host.registry().find(0x100).expect("tracked");
        assert!(window.is_checked(menu_id::TOPMOST));
    }

    #[test]
    fn unmatched_message_is_not_claimed() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());

        // Act
        let matched = host.process_message(&RawMessage::new(0x0400, 0x100, 0));

        // Assert
        assert!(!matched);
        assert!(host.registry().is_empty());
    }

    #[test]
    fn maximize_unchecks_size_and_minimize_goes_to_tray() {
        // Arrange
        let desktop = notepad_desktop();
        let observed = desktop.observed(0x100).expect("observed");
        let mut host = host_with(Settings::default(), desktop);
        post(&mut host, names::CBT_CREATEWND, 0x100, 0);
        host.dispatch(0x100, menu_id::SIZE_DEFAULT as usize);
        host.dispatch(0x100, menu_id::MINIMIZE_ALWAYS_TO_TRAY as usize);

        // Act
        post(&mut host, names::CBT_MINMAX, 0x100, SW_MAXIMIZE as isize);
        post(&mut host, names::CBT_MINMAX, 0x100, SW_MINIMIZE as isize);

        // Assert
        let window = host.registry().find(0x100).expect("tracked");
        assert!(window.menu.checked_in(Group::Size).is_empty());
        assert!(observed.borrow().in_tray);
    }

    #[test]
    fn tray_window_outlives_destroy_until_restored() {
        // Arrange
        let desktop = notepad_desktop();
        let observed = desktop.observed(0x100).expect("observed");
        let mut host = host_with(Settings::default(), desktop);
        post(&mut host, names::CBT_CREATEWND, 0x100, 0);
        host.dispatch(0x100, menu_id::MINIMIZE_TO_TRAY as usize);

        // Act
        post(&mut host, names::CBT_DESTROYWND, 0x100, 0);
        let kept = host.registry().contains(0x100);
        observed.borrow_mut().exists = false;
        host.restore_from_tray(0x100);

        // Assert
        assert!(kept);
        assert!(!host.registry().contains(0x100));
    }

    #[test]
    fn hotkey_posts_command_to_foreground_window() {
        // Arrange
        let mut settings = Settings::default();
        settings.menu.hotkey = vec![HotkeyBinding {
            item: "topmost".into(),
            keys: vec!["ctrl".into(), "alt".into(), "t".into()],
        }];
        let mut desktop = notepad_desktop();
        desktop.foreground = Some(0x100);
        let mut host = host_with(settings, desktop);

        // Act
        post(&mut host, names::HOTKEY, menu_id::TOPMOST as usize, 0);

        // Assert
        assert!(host.backend().installed.contains(&HookKind::HotKey));
        assert_eq!(host.desktop().posted, vec![(0x100, menu_id::TOPMOST)]);
    }

    #[test]
    fn hotkey_skips_excluded_processes() {
        // Arrange
        let mut settings = Settings::default();
        settings.process_exclusions = vec!["notepad.exe".into()];
        let mut desktop = notepad_desktop();
        desktop.foreground = Some(0x100);
        let mut host = host_with(settings, desktop);

        // Act
        host.handle_event(HookEvent::HotKey { command: menu_id::TOPMOST });

        // Assert
        assert!(host.desktop().posted.is_empty());
    }

    #[test]
    fn replaced_settings_apply_to_windows_added_later() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());
        let mut settings = Settings::default();
        settings.process_exclusions = vec!["notepad.exe".into()];

        // Act
        host.replace_settings(Arc::new(settings));
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);

        // Assert
        assert!(host.registry().is_empty());
        assert_eq!(host.settings().process_exclusions, vec!["notepad.exe".to_string()]);
    }

    #[test]
    fn mouse_closer_closes_window_under_cursor() {
        // Arrange
        let mut settings = Settings::default();
        settings.closer.kind = CloserKind::CloseWindowUnderCursor;
        settings.closer.mouse_button = CloserButton::Middle;
        settings.closer.keys = vec!["ctrl".into()];
        let mut desktop = notepad_desktop();
        desktop.window_at = Some(0x100);
        desktop.keys_down.insert(VK_CONTROL);
        let mut host = host_with(settings, desktop);
        let packed = Point::new(10, 10).to_packed();

        // Act
        post(&mut host, names::MOUSELL, 0x0204, packed);
        post(&mut host, names::MOUSELL, 0x0207, packed);

        // Assert
        assert_eq!(host.desktop().closed, vec![0x100]);
    }

    #[test]
    fn pointer_moves_never_trigger_the_closer() {
        // Arrange
        let mut settings = Settings::default();
        settings.closer.kind = CloserKind::CloseWindowUnderCursor;
        settings.closer.mouse_button = CloserButton::Middle;
        let mut desktop = notepad_desktop();
        desktop.window_at = Some(0x100);
        let mut host = host_with(settings, desktop);

        // Act
        for x in 0..3 {
            post(&mut host, names::MOUSELL, 0x0200, Point::new(x, 10).to_packed());
        }

        // Assert
        assert!(host.desktop().closed.is_empty());
    }

    #[test]
    fn keyboard_closer_kills_foreground_process() {
        // Arrange
        let mut settings = Settings::default();
        settings.closer.kind = CloserKind::KillProcessWithForegroundWindow;
        settings.closer.keys = vec!["ctrl".into(), "alt".into(), "f4".into()];
        let mut desktop = notepad_desktop();
        desktop.foreground = Some(0x100);
        let mut host = host_with(settings, desktop);

        // Act
        host.handle_event(HookEvent::HotKey { command: menu_id::CLOSER });

        // Assert
        assert_eq!(host.desktop().terminated, vec![FakeWindow::NOTEPAD_PID]);
    }

    #[test]
    fn ctrl_shift_down_sends_foreground_to_tray() {
        // Arrange
        let mut settings = Settings::default();
        settings.minimize_to_tray_shortcut = true;
        let mut desktop = notepad_desktop();
        let observed = desktop.observed(0x100).expect("observed");
        desktop.foreground = Some(0x100);
        desktop.keys_down.extend([VK_CONTROL, VK_SHIFT]);
        let mut host = host_with(settings, desktop);
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);

        // Act
        post(&mut host, names::KEYBOARD, VK_DOWN as usize, 0);

        // Assert
        assert!(observed.borrow().in_tray);
    }

    #[test]
    fn companion_parse_failure_skips_forwarding() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());
        host.receive_bridge(crate::bridge::SEND_CHILD_HANDLE, b"garbage\0");

        // Act
        host.apply_global(GlobalAction::RestoreTransparency, Origin::Local);

        // Assert
        assert_eq!(host.companion(), None);
        assert!(host.desktop().sent.is_empty());
    }

    #[test]
    fn local_global_actions_are_forwarded_once() {
        // Arrange
        let mut host = host_with(Settings::default(), notepad_desktop());
        host.receive_bridge(crate::bridge::SEND_CHILD_HANDLE, b"4660\0");
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);
        host.dispatch(0x100, menu_id::CLICK_THROUGH as usize);

        // Act
        host.request_global(i64::from(menu_id::CLICK_THROUGH));
        let tag = i64::from(menu_id::TRANS_DEFAULT);
        host.receive_bridge(tag, b"\0");

        // Assert
        assert_eq!(
            host.desktop().sent,
            vec![(0x1234, BridgeMessage::global(GlobalAction::DisableClickThrough))]
        );
        let window = host.registry().find(0x100).expect("tracked");
        assert!(!window.is_checked(menu_id::CLICK_THROUGH));
        assert_eq!(
            window.menu.checked_in(Group::Transparency),
            vec![menu_id::TRANS_DEFAULT]
        );
    }

    #[test]
    fn child_announces_itself_to_the_parent() {
        // Arrange
        let mut host = host_with(Settings::default(), FakeDesktop::default());

        // Act
        host.announce_to_parent(0x777);

        // Assert
        assert_eq!(host.companion(), Some(0x777));
        assert_eq!(host.desktop().sent, vec![(0x777, BridgeMessage::child_handle(HOST))]);
    }

    #[test]
    fn shutdown_disposes_and_wakes_loops() {
        // Arrange
        let desktop = notepad_desktop();
        let observed = desktop.observed(0x100).expect("observed");
        let mut host = host_with(Settings::default(), desktop);
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);

        // Act
        host.shutdown();
        host.shutdown();

        // Assert
        assert!(host.registry().is_empty());
        assert!(observed.borrow().menu_restored);
        assert_eq!(host.backend().uninstalled.len(), 5);
    }

    #[test]
    fn failed_hook_does_not_stop_the_host() {
        // Arrange
        let mut backend = FakeBackend::default();
        backend.fail.insert(HookKind::Cbt);
        let mut host = Host::new(
            HOST,
            Arc::new(Settings::default()),
            notepad_desktop(),
            backend,
            WindowStateStore::in_memory(),
        );

        // Act
        let started = host.start_hooks();
        post(&mut host, names::SHELL_WINDOWCREATED, 0x100, 0);

        // Assert
        assert_eq!(started, 4);
        assert!(host.registry().contains(0x100));
    }
}
