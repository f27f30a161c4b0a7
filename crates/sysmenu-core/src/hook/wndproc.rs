//! Hooks that watch foreign message streams for `WM_SYSCOMMAND`.
//!
//! Both post `wparam` = target window and `lparam` = the system
//! command's own `wparam`. Two hooks are needed because a command can
//! arrive either sent (call-window-proc) or posted (get-message).

use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent, Source};

fn decode_sys_command(kind: HookKind, source: Source, slot: usize, msg: &RawMessage) -> HookEvent {
    match slot {
        0 => HookEvent::SysCommand {
            hwnd: msg.wparam,
            wparam: msg.lparam as usize,
            source,
        },
        _ => HookEvent::HookReplaced { kind },
    }
}

#[derive(Debug)]
pub struct CallWndProcHook {
    core: HookCore,
}

impl CallWndProcHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::CallWndProc),
        }
    }
}

impl Default for CallWndProcHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for CallWndProcHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        log.push(decode_sys_command(HookKind::CallWndProc, Source::CallWndProc, slot, msg));
    }
}

#[derive(Debug)]
pub struct GetMsgHook {
    core: HookCore,
}

impl GetMsgHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::GetMsg),
        }
    }
}

impl Default for GetMsgHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for GetMsgHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, slot: usize, msg: &RawMessage, log: &mut EventLog) {
        log.push(decode_sys_command(HookKind::GetMsg, Source::GetMsg, slot, msg));
    }
}
