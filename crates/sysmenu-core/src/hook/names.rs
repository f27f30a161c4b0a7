//! Registered window message names shared by the host and the native
//! hook library. Both sides register the same strings, so both get the
//! same identifiers.

use super::HookKind;

pub const CBT_CREATEWND: &str = "SYSMENU_HOOK_HCBT_CREATEWND";
pub const CBT_DESTROYWND: &str = "SYSMENU_HOOK_HCBT_DESTROYWND";
pub const CBT_MINMAX: &str = "SYSMENU_HOOK_HCBT_MINMAX";
pub const CBT_MOVESIZE: &str = "SYSMENU_HOOK_HCBT_MOVESIZE";
pub const CBT_REPLACED: &str = "SYSMENU_HOOK_HCBT_REPLACED";

pub const SHELL_WINDOWCREATED: &str = "SYSMENU_HOOK_HSHELL_WINDOWCREATED";
pub const SHELL_WINDOWDESTROYED: &str = "SYSMENU_HOOK_HSHELL_WINDOWDESTROYED";
pub const SHELL_REPLACED: &str = "SYSMENU_HOOK_HSHELL_REPLACED";

pub const CALLWNDPROC: &str = "SYSMENU_HOOK_CALLWNDPROC";
pub const CALLWNDPROC_REPLACED: &str = "SYSMENU_HOOK_CALLWNDPROC_REPLACED";

pub const GETMSG: &str = "SYSMENU_HOOK_GETMSG";
pub const GETMSG_REPLACED: &str = "SYSMENU_HOOK_GETMSG_REPLACED";

pub const MOUSE: &str = "SYSMENU_HOOK_MOUSE";
pub const MOUSE_REPLACED: &str = "SYSMENU_HOOK_MOUSE_REPLACED";

pub const MOUSELL: &str = "SYSMENU_HOOK_MOUSELL";
pub const MOUSELL_REPLACED: &str = "SYSMENU_HOOK_MOUSELL_REPLACED";

pub const KEYBOARD: &str = "SYSMENU_HOOK_KEYBOARD";
pub const KEYBOARD_REPLACED: &str = "SYSMENU_HOOK_KEYBOARD_REPLACED";

pub const HOTKEY: &str = "SYSMENU_HOOK_HOTKEY";

/// Sent by the CLI to ask a running host for a global action.
/// `wparam` carries the action tag.
pub const GLOBAL_ACTION: &str = "SYSMENU_GLOBAL_ACTION";

/// Message names of a hook kind, in slot order.
pub fn for_kind(kind: HookKind) -> &'static [&'static str] {
    match kind {
        HookKind::Cbt => &[
            CBT_CREATEWND,
            CBT_DESTROYWND,
            CBT_MINMAX,
            CBT_MOVESIZE,
            CBT_REPLACED,
        ],
        HookKind::Shell => &[SHELL_WINDOWCREATED, SHELL_WINDOWDESTROYED, SHELL_REPLACED],
        HookKind::CallWndProc => &[CALLWNDPROC, CALLWNDPROC_REPLACED],
        HookKind::GetMsg => &[GETMSG, GETMSG_REPLACED],
        HookKind::Mouse => &[MOUSE, MOUSE_REPLACED],
        HookKind::MouseLl => &[MOUSELL, MOUSELL_REPLACED],
        HookKind::Keyboard => &[KEYBOARD, KEYBOARD_REPLACED],
        HookKind::HotKey => &[HOTKEY],
    }
}

/// The "replaced" message of a kind, if its native side reports one.
pub fn replaced(kind: HookKind) -> Option<&'static str> {
    for_kind(kind)
        .iter()
        .copied()
        .find(|name| name.ends_with("_REPLACED"))
}
