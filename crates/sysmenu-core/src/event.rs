use std::collections::VecDeque;

use crate::hook::HookKind;
use crate::rect::Point;

/// Which hook reported a window lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cbt,
    Shell,
    CallWndProc,
    GetMsg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Transition decoded from a low-level mouse notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTransition {
    Move,
    Down(MouseButton),
    Up(MouseButton),
}

/// A typed event raised by a hook.
///
/// Hooks only append these to the [`EventLog`]; the host is the sole
/// consumer and the only place that mutates the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    WindowCreated { hwnd: usize, source: Source },
    WindowDestroyed { hwnd: usize, source: Source },
    /// `show` is the `SW_*` command the window is about to apply.
    MinMax { hwnd: usize, show: u32 },
    MoveSize { hwnd: usize },
    /// A `WM_SYSCOMMAND` seen in a foreign window's message stream.
    SysCommand { hwnd: usize, wparam: usize, source: Source },
    /// Raw in-thread mouse notification.
    Mouse { message: u32, hwnd: usize },
    /// Raw low-level mouse notification.
    MouseLl { message: u32, packed_point: isize },
    /// Decoded low-level mouse notification.
    MouseButton { transition: MouseTransition, point: Point },
    Keyboard { vk: u32, down: bool },
    HotKey { command: u32 },
    /// The native helper replaced an earlier installation of this hook.
    HookReplaced { kind: HookKind },
}

/// Append-only, strictly ordered log of hook events for one host.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<HookEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: HookEvent) {
        self.events.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<HookEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HookEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_come_out_in_arrival_order() {
        // Arrange
        let mut log = EventLog::default();
        log.push(HookEvent::MoveSize { hwnd: 1 });
        log.push(HookEvent::HotKey { command: 2 });

        // Act
        let first = log.pop();
        let second = log.pop();

        // Assert
        assert_eq!(first, Some(HookEvent::MoveSize { hwnd: 1 }));
        assert_eq!(second, Some(HookEvent::HotKey { command: 2 }));
        assert!(log.is_empty());
    }
}
