pub mod bridge;
pub mod config;
pub mod desktop;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hook;
pub mod host;
pub mod keys;
pub mod log;
pub mod menu;
pub mod menu_id;
pub mod pid;
pub mod rect;
pub mod registry;
pub mod screenshot;
pub mod state_store;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::{BridgeMessage, GlobalAction, Origin};
pub use config::Settings;
pub use desktop::{Desktop, LaunchRequest};
pub use error::{Error, Result};
pub use event::{EventLog, HookEvent};
pub use hook::{HookBackend, HookKind, HookParams, RawMessage};
pub use host::Host;
pub use menu::{MenuEntry, MenuLayout, Monitor};
pub use rect::{Margins, Point, Rect, Size};
pub use registry::WindowRegistry;
pub use screenshot::Screenshot;
pub use state_store::WindowStateStore;
pub use window::{Change, ProcessInfo, RuntimeFlags, TitleButton, Window, WindowInfo, WindowOps};
