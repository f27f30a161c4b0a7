//! Hooks as decoders of marshalled native notifications.
//!
//! The native side of every hook runs outside the host thread and
//! posts registered window messages to the host window. Each [`Hook`]
//! owns the identifiers of the messages it registered and turns
//! matching messages into [`HookEvent`]s on the host's [`EventLog`].
//!
//! [`HookEvent`]: crate::event::HookEvent

mod cbt;
mod hotkey;
mod keyboard;
mod mouse;
pub mod names;
mod shell;
mod wndproc;

use std::fmt;

use crate::event::EventLog;

pub use cbt::CbtHook;
pub use hotkey::{HotKeyHook, HotKeyMatcher};
pub use keyboard::KeyboardHook;
pub use mouse::{MouseHook, MouseLlHook};
pub use shell::ShellHook;
pub use wndproc::{CallWndProcHook, GetMsgHook};

/// The kinds of hook the host can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HookKind {
    Cbt = 0,
    Shell = 1,
    CallWndProc = 2,
    GetMsg = 3,
    Mouse = 4,
    MouseLl = 5,
    Keyboard = 6,
    HotKey = 7,
}

impl HookKind {
    pub const ALL: [HookKind; 8] = [
        Self::Cbt,
        Self::Shell,
        Self::CallWndProc,
        Self::GetMsg,
        Self::Mouse,
        Self::MouseLl,
        Self::Keyboard,
        Self::HotKey,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cbt => "cbt",
            Self::Shell => "shell",
            Self::CallWndProc => "call-window-proc",
            Self::GetMsg => "get-message",
            Self::Mouse => "mouse",
            Self::MouseLl => "low-level mouse",
            Self::Keyboard => "keyboard",
            Self::HotKey => "hotkey",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A window message delivered to the host window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self { id, wparam, lparam }
    }
}

/// Parameters handed to the native side when a hook is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookParams {
    /// Host window that receives the marshalled notifications.
    pub host: usize,
    /// Menu item whose check mark enables drag-by-mouse on a window.
    pub drag_by_mouse: u32,
    /// `(command, virtual keys)` pairs for the hotkey hook.
    pub hotkeys: Vec<(u32, Vec<u32>)>,
}

/// Native hook installation and message registration.
pub trait HookBackend {
    /// Registers a system-wide message name and lets it through the
    /// message filter. `None` when registration fails.
    fn register_message(&mut self, name: &str) -> Option<u32>;
    fn install(&mut self, kind: HookKind, params: &HookParams) -> crate::Result<()>;
    fn uninstall(&mut self, kind: HookKind);
    /// Wakes foreign message loops so a hook library can unload.
    fn wake_message_loops(&mut self);
}

/// State shared by every hook: its kind, message names and the
/// identifiers registered for them.
#[derive(Debug)]
pub struct HookCore {
    kind: HookKind,
    names: &'static [&'static str],
    ids: Vec<u32>,
    installed: bool,
}

impl HookCore {
    pub fn new(kind: HookKind) -> Self {
        Self {
            kind,
            names: names::for_kind(kind),
            ids: Vec::new(),
            installed: false,
        }
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Registers the hook's messages and installs it.
    ///
    /// On any failure the hook stays inert: no identifiers are kept,
    /// so it never matches a message.
    pub fn start(&mut self, backend: &mut dyn HookBackend, params: &HookParams) -> bool {
        if self.installed {
            return true;
        }

        let mut ids = Vec::with_capacity(self.names.len());
        for name in self.names {
            match backend.register_message(name) {
                Some(id) => ids.push(id),
                None => {
                    tracing::warn!(hook = %self.kind, name, "message registration failed, hook disabled");
                    return false;
                }
            }
        }

        if let Err(e) = backend.install(self.kind, params) {
            tracing::warn!(hook = %self.kind, "{e}, hook disabled");
            return false;
        }

        tracing::debug!(hook = %self.kind, "hook installed");
        self.ids = ids;
        self.installed = true;
        true
    }

    /// Uninstalls the hook. Safe to call repeatedly and after a failed start.
    pub fn stop(&mut self, backend: &mut dyn HookBackend) {
        if self.installed {
            backend.uninstall(self.kind);
            self.installed = false;
        }
        self.ids.clear();
    }

    /// Index of the registered name that produced `id`.
    pub fn slot(&self, id: u32) -> Option<usize> {
        self.ids.iter().position(|i| *i == id)
    }
}

/// Lifecycle shared by every hook.
pub trait Hook {
    fn core(&self) -> &HookCore;
    fn core_mut(&mut self) -> &mut HookCore;

    /// Decodes a message that matched registered name number `slot`.
    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog);

    fn kind(&self) -> HookKind {
        self.core().kind()
    }

    fn start(&mut self, backend: &mut dyn HookBackend, params: &HookParams) -> bool {
        self.core_mut().start(backend, params)
    }

    fn stop(&mut self, backend: &mut dyn HookBackend) {
        self.core_mut().stop(backend);
    }

    /// Appends events for `msg` when it belongs to this hook.
    fn process_message(&mut self, msg: &RawMessage, log: &mut EventLog) -> bool {
        let Some(slot) = self.core().slot(msg.id) else {
            return false;
        };
        self.decode(slot, msg, log);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::HookEvent;
    use crate::testing::FakeBackend;

    #[test]
    fn failed_install_leaves_hook_inert() {
        // Arrange
        let mut backend = FakeBackend::default();
        backend.fail.insert(HookKind::Cbt);
        let mut hook = CbtHook::new();
        let mut log = EventLog::default();

        // Act
        let started = hook.start(&mut backend, &HookParams::default());
        let id = backend.id_of(names::CBT_CREATEWND).expect("registered");
        let matched = hook.process_message(&RawMessage::new(id, 0x10, 0), &mut log);

        // Assert
        assert!(!started);
        assert!(!matched);
        assert!(log.is_empty());
    }

    #[test]
    fn stop_is_idempotent_and_safe_after_failed_start() {
        // Arrange
        let mut backend = FakeBackend::default();
        backend.fail.insert(HookKind::Shell);
        let mut hook = ShellHook::new();
        hook.start(&mut backend, &HookParams::default());

        // Act
        hook.stop(&mut backend);
        hook.stop(&mut backend);

        // Assert
        assert!(backend.uninstalled.is_empty());
    }

    #[test]
    fn stop_uninstalls_once() {
        // Arrange
        let mut backend = FakeBackend::default();
        let mut hook = ShellHook::new();
        hook.start(&mut backend, &HookParams::default());

        // Act
        hook.stop(&mut backend);
        hook.stop(&mut backend);

        // Assert
        assert_eq!(backend.uninstalled, vec![HookKind::Shell]);
    }

    #[test]
    fn foreign_messages_do_not_match() {
        // Arrange
        let mut backend = FakeBackend::default();
        let mut hook = CbtHook::new();
        hook.start(&mut backend, &HookParams::default());
        let mut log = EventLog::default();

        // Act
        let matched = hook.process_message(&RawMessage::new(0x0010, 0, 0), &mut log);

        // Assert
        assert!(!matched);
        assert!(log.is_empty());
    }

    #[test]
    fn replaced_notification_names_the_kind() {
        // Arrange
        let mut backend = FakeBackend::default();
        let mut hook = ShellHook::new();
        hook.start(&mut backend, &HookParams::default());
        let id = backend.id_of(names::SHELL_REPLACED).expect("registered");
        let mut log = EventLog::default();

        // Act
        hook.process_message(&RawMessage::new(id, 0, 0), &mut log);

        // Assert
        assert_eq!(log.pop(), Some(HookEvent::HookReplaced { kind: HookKind::Shell }));
    }

    #[test]
    fn kind_round_trips_through_u32() {
        // Assert
        for kind in HookKind::ALL {
            assert_eq!(HookKind::from_u32(kind as u32), Some(kind));
        }
        assert_eq!(HookKind::from_u32(8), None);
    }
}
