use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent, Source};

/// Window lifecycle and min/max/move notifications from the CBT hook.
///
/// The native side posts `wparam` = window handle. For `HCBT_MINMAX`
/// the low word of `lparam` is the `SW_*` show command.
#[derive(Debug)]
pub struct CbtHook {
    core: HookCore,
}

impl CbtHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::Cbt),
        }
    }
}

impl Default for CbtHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for CbtHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        let hwnd = msg.wparam;
        let event = match slot {
            0 => HookEvent::WindowCreated { hwnd, source: Source::Cbt },
            1 => HookEvent::WindowDestroyed { hwnd, source: Source::Cbt },
            2 => HookEvent::MinMax {
                hwnd,
                show: (msg.lparam as u32) & 0xFFFF,
            },
            3 => HookEvent::MoveSize { hwnd },
            _ => HookEvent::HookReplaced { kind: HookKind::Cbt },
        };
        log.push(event);
    }
}
