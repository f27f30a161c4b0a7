use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent, MouseButton, MouseTransition};
use crate::rect::Point;

const WM_MOUSEMOVE: u32 = 0x0200;
const WM_LBUTTONDOWN: u32 = 0x0201;
const WM_LBUTTONUP: u32 = 0x0202;
const WM_RBUTTONDOWN: u32 = 0x0204;
const WM_RBUTTONUP: u32 = 0x0205;
const WM_MBUTTONDOWN: u32 = 0x0207;
const WM_MBUTTONUP: u32 = 0x0208;

/// Maps a mouse window message to a button transition.
pub fn transition(message: u32) -> Option<MouseTransition> {
    Some(match message {
        WM_MOUSEMOVE => MouseTransition::Move,
        WM_LBUTTONDOWN => MouseTransition::Down(MouseButton::Left),
        WM_LBUTTONUP => MouseTransition::Up(MouseButton::Left),
        WM_RBUTTONDOWN => MouseTransition::Down(MouseButton::Right),
        WM_RBUTTONUP => MouseTransition::Up(MouseButton::Right),
        WM_MBUTTONDOWN => MouseTransition::Down(MouseButton::Middle),
        WM_MBUTTONUP => MouseTransition::Up(MouseButton::Middle),
        _ => return None,
    })
}

/// In-thread mouse hook: `wparam` = message, `lparam` = window.
///
/// The native side uses it to drag windows by their client area; the
/// host only records the notifications.
#[derive(Debug)]
pub struct MouseHook {
    core: HookCore,
}

impl MouseHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::Mouse),
        }
    }
}

impl Default for MouseHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for MouseHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        log.push(match slot {
            0 => HookEvent::Mouse {
                message: msg.wparam as u32,
                hwnd: msg.lparam as usize,
            },
            _ => HookEvent::HookReplaced { kind: HookKind::Mouse },
        });
    }
}

/// Low-level mouse hook: `wparam` = message, `lparam` = packed screen point.
#[derive(Debug)]
pub struct MouseLlHook {
    core: HookCore,
}

impl MouseLlHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::MouseLl),
        }
    }
}

impl Default for MouseLlHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for MouseLlHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        if slot != 0 {
            log.push(HookEvent::HookReplaced { kind: HookKind::MouseLl });
            return;
        }
        let message = msg.wparam as u32;
        log.push(HookEvent::MouseLl {
            message,
            packed_point: msg.lparam,
        });
        if let Some(transition) = transition(message) {
            log.push(HookEvent::MouseButton {
                transition,
                point: Point::from_packed(msg.lparam),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{HookParams, names};
    use crate::testing::FakeBackend;

    #[test]
    fn low_level_button_decodes_point_and_transition() {
        // Arrange
        let mut backend = FakeBackend::default();
        let mut hook = MouseLlHook::new();
        hook.start(&mut backend, &HookParams::default());
        let id = backend.id_of(names::MOUSELL).expect("registered");
        let packed = Point::new(300, 200).to_packed();
        let mut log = EventLog::default();

        // Act
        hook.process_message(&RawMessage::new(id, WM_MBUTTONDOWN as usize, packed), &mut log);

        // Assert
        assert_eq!(log.len(), 2);
        log.pop();
        assert_eq!(
            log.pop(),
            Some(HookEvent::MouseButton {
                transition: MouseTransition::Down(MouseButton::Middle),
                point: Point::new(300, 200),
            })
        );
    }

    #[test]
    fn low_level_move_decodes_as_move() {
        // Arrange
        let mut backend = FakeBackend::default();
        let mut hook = MouseLlHook::new();
        hook.start(&mut backend, &HookParams::default());
        let id = backend.id_of(names::MOUSELL).expect("registered");
        let mut log = EventLog::default();

        // Act
        hook.process_message(&RawMessage::new(id, WM_MOUSEMOVE as usize, Point::new(-5, 40).to_packed()), &mut log);

        // Assert
        log.pop();
        assert_eq!(
            log.pop(),
            Some(HookEvent::MouseButton {
                transition: MouseTransition::Move,
                point: Point::new(-5, 40),
            })
        );
    }

    #[test]
    fn unknown_mouse_messages_have_no_transition() {
        // Assert
        assert_eq!(transition(0x020A), None);
        assert_eq!(transition(WM_RBUTTONUP), Some(MouseTransition::Up(MouseButton::Right)));
    }
}
