use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent, Source};

/// Top-level window creation and destruction from the shell hook.
#[derive(Debug)]
pub struct ShellHook {
    core: HookCore,
}

impl ShellHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::Shell),
        }
    }
}

impl Default for ShellHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for ShellHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        let hwnd = msg.wparam;
        log.push(match slot {
            0 => HookEvent::WindowCreated { hwnd, source: Source::Shell },
            1 => HookEvent::WindowDestroyed { hwnd, source: Source::Shell },
            _ => HookEvent::HookReplaced { kind: HookKind::Shell },
        });
    }
}
