//! Protocol between the 32-bit and 64-bit host processes.
//!
//! Messages travel as `WM_COPYDATA`: a 64-bit tag plus an ANSI payload.
//! The child announces its host window handle once; afterwards either
//! side forwards the global actions its own user triggered.

use crate::menu_id;

/// Tag announcing the companion's host window handle (decimal payload).
/// Sits above every menu identifier so it can never collide with one.
pub const SEND_CHILD_HANDLE: i64 = 0x0001_0000;

/// An action applied to every tracked window of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    /// Reset every window to full opacity.
    RestoreTransparency,
    /// Turn click-through off wherever it is on.
    DisableClickThrough,
}

impl GlobalAction {
    /// The wire tag, shared with the corresponding menu command.
    pub fn tag(self) -> i64 {
        i64::from(match self {
            Self::RestoreTransparency => menu_id::TRANS_DEFAULT,
            Self::DisableClickThrough => menu_id::CLICK_THROUGH,
        })
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        [Self::RestoreTransparency, Self::DisableClickThrough]
            .into_iter()
            .find(|a| a.tag() == tag)
    }
}

/// Where a global action came from. Only local actions are forwarded,
/// so the two processes never echo each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Companion,
}

/// A raw bridge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeMessage {
    pub tag: i64,
    pub payload: String,
}

impl BridgeMessage {
    pub fn child_handle(hwnd: usize) -> Self {
        Self {
            tag: SEND_CHILD_HANDLE,
            payload: hwnd.to_string(),
        }
    }

    pub fn global(action: GlobalAction) -> Self {
        Self {
            tag: action.tag(),
            payload: String::new(),
        }
    }

    /// Payload bytes as sent on the wire, NUL terminated.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .payload
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        bytes.push(0);
        bytes
    }

    /// Rebuilds a message from a received tag and payload bytes.
    pub fn from_wire(tag: i64, bytes: &[u8]) -> Self {
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Self {
            tag,
            payload: String::from_utf8_lossy(&bytes[..end]).into_owned(),
        }
    }

    pub fn decode(&self) -> BridgeCommand {
        if self.tag == SEND_CHILD_HANDLE {
            return BridgeCommand::ChildHandle(parse_handle(&self.payload));
        }
        match GlobalAction::from_tag(self.tag) {
            Some(action) => BridgeCommand::Global(action),
            None => BridgeCommand::Unknown(self.tag),
        }
    }
}

/// A decoded bridge message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    /// `None` when the payload did not parse or was zero.
    ChildHandle(Option<usize>),
    Global(GlobalAction),
    Unknown(i64),
}

fn parse_handle(payload: &str) -> Option<usize> {
    payload.trim().parse::<u64>().ok().filter(|h| *h != 0).map(|h| h as usize)
}

/// The single companion host this process talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Companion {
    handle: Option<usize>,
}

impl Companion {
    pub fn handle(&self) -> Option<usize> {
        self.handle
    }

    pub fn set(&mut self, handle: Option<usize>) {
        self.handle = handle;
    }
}
