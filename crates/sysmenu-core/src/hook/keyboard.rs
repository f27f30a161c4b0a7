use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent};

/// Key transitions: `wparam` = virtual key, `lparam` = keystroke flags.
/// Bit 31 of the flags is set on key release.
#[derive(Debug)]
pub struct KeyboardHook {
    core: HookCore,
}

impl KeyboardHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::Keyboard),
        }
    }
}

impl Default for KeyboardHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for KeyboardHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        log.push(match slot {
            0 => HookEvent::Keyboard {
                vk: msg.wparam as u32,
                down: (msg.lparam as u32) & 0x8000_0000 == 0,
            },
            _ => HookEvent::HookReplaced { kind: HookKind::Keyboard },
        });
    }
}
