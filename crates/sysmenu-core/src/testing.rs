//! In-memory stand-ins for the platform used by unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crate::bridge::BridgeMessage;
use crate::desktop::{Desktop, LaunchRequest};
use crate::hook::{HookBackend, HookKind, HookParams, RawMessage};
use crate::menu::{MenuLayout, Monitor};
use crate::menu_id::Priority;
use crate::rect::{Margins, Point, Rect, Size};
use crate::screenshot::Screenshot;
use crate::window::{Change, ProcessInfo, RuntimeFlags, TitleButton, WindowInfo, WindowOps};
use crate::{Error, Result};

/// Observable state of a [`FakeWindow`], shared with the test.
#[derive(Debug, Default)]
pub struct FakeWindowState {
    pub class_name: String,
    pub title: String,
    pub process: Option<ProcessInfo>,
    pub process_queries: u32,
    pub rect: Rect,
    pub margins: Margins,
    pub caption_height: i32,
    pub work_area: Rect,
    pub runtime: RuntimeFlags,
    pub priority: Option<Priority>,
    pub exists: bool,
    pub deny_menu: bool,
    pub augmented: Option<MenuLayout>,
    pub checked: BTreeSet<u32>,
    pub alpha: Option<u8>,
    pub click_through: bool,
    pub aero_glass: bool,
    pub disabled_buttons: Vec<TitleButton>,
    pub in_tray: bool,
    pub suspended: bool,
    pub menu_restored: bool,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    observed: Rc<RefCell<FakeWindowState>>,
    handle: usize,
}

impl FakeWindow {
    pub const NOTEPAD_PID: u32 = 4242;
    pub const NOTEPAD_PATH: &'static str = "C:\\Windows\\notepad.exe";

    pub fn new(handle: usize, class_name: &str, path: &str, pid: u32) -> (Self, Rc<RefCell<FakeWindowState>>) {
        let observed = Rc::new(RefCell::new(FakeWindowState {
            class_name: class_name.into(),
            title: format!("Untitled - {class_name}"),
            process: Some(ProcessInfo {
                pid,
                path: Some(path.into()),
            }),
            rect: Rect::new(200, 150, 1000, 700),
            margins: Margins {
                left: 7,
                top: 0,
                right: 7,
                bottom: 7,
            },
            caption_height: 31,
            work_area: Rect::new(0, 0, 1920, 1040),
            exists: true,
            ..Default::default()
        }));
        (
            Self {
                observed: Rc::clone(&observed),
                handle,
            },
            observed,
        )
    }

    pub fn notepad(handle: usize) -> (Self, Rc<RefCell<FakeWindowState>>) {
        Self::new(handle, "Notepad", Self::NOTEPAD_PATH, Self::NOTEPAD_PID)
    }

    pub fn handle(&self) -> usize {
        self.handle
    }

    pub fn observed(&self) -> Rc<RefCell<FakeWindowState>> {
        Rc::clone(&self.observed)
    }
}

impl WindowOps for FakeWindow {
    fn class_name(&self) -> String {
        self.observed.borrow().class_name.clone()
    }

    fn title(&self) -> String {
        self.observed.borrow().title.clone()
    }

    fn process(&self) -> Option<ProcessInfo> {
        let mut observed = self.observed.borrow_mut();
        observed.process_queries += 1;
        observed.process.clone()
    }

    fn rect(&self) -> Option<Rect> {
        let p = self.observed.borrow();
        p.exists.then_some(p.rect)
    }

    fn client_size(&self) -> Option<Size> {
        let p = self.observed.borrow();
        let m = p.margins;
        p.exists.then(|| {
            Size::new(
                p.rect.width - m.left - m.right,
                p.rect.height - m.top - m.bottom - p.caption_height,
            )
        })
    }

    fn margins(&self) -> Margins {
        self.observed.borrow().margins
    }

    fn caption_height(&self) -> i32 {
        self.observed.borrow().caption_height
    }

    fn work_area(&self) -> Option<Rect> {
        Some(self.observed.borrow().work_area)
    }

    fn runtime(&self) -> RuntimeFlags {
        self.observed.borrow().runtime
    }

    fn priority(&self) -> Option<Priority> {
        self.observed.borrow().priority
    }

    fn exists(&self) -> bool {
        self.observed.borrow().exists
    }

    fn augment_menu(&mut self, layout: &MenuLayout) -> bool {
        let mut p = self.observed.borrow_mut();
        if p.deny_menu || !p.exists {
            return false;
        }
        p.augmented = Some(layout.clone());
        true
    }

    fn set_checked(&mut self, id: u32, checked: bool) {
        let mut p = self.observed.borrow_mut();
        if checked {
            p.checked.insert(id);
        } else {
            p.checked.remove(&id);
        }
    }

    fn apply(&mut self, change: Change) -> bool {
        let mut p = self.observed.borrow_mut();
        if !p.exists {
            return false;
        }
        match &change {
            Change::Bounds(rect) => p.rect = *rect,
            Change::Position(point) => {
                p.rect.x = point.x;
                p.rect.y = point.y;
            }
            Change::ShowNormal | Change::SendToBottom => {}
            Change::Alpha(alpha) => p.alpha = *alpha,
            Change::Topmost(on) => p.runtime.topmost = *on,
            Change::ToolWindow(on) => p.runtime.tool_window = *on,
            Change::ClickThrough(on) => p.click_through = *on,
            Change::AeroGlass(on) => p.aero_glass = *on,
            Change::DisableButton(button, on) => {
                p.disabled_buttons.retain(|b| b != button);
                if *on {
                    p.disabled_buttons.push(*button);
                }
            }
            Change::Priority(priority) => p.priority = Some(*priority),
            Change::TrayIcon(on) => p.in_tray = *on,
            Change::Suspend(on) => p.suspended = *on,
            Change::RestoreMenu => {
                p.menu_restored = true;
                p.augmented = None;
                p.checked.clear();
            }
        }
        p.changes.push(change);
        true
    }
}

/// A desktop made of [`FakeWindow`]s that records every side effect.
#[derive(Debug, Default)]
pub struct FakeDesktop {
    windows: BTreeMap<usize, FakeWindow>,
    pub foreign_pids: BTreeSet<u32>,
    pub monitors: Vec<Monitor>,
    pub foreground: Option<usize>,
    pub cursor: Option<Point>,
    pub window_at: Option<usize>,
    pub keys_down: BTreeSet<u32>,
    pub alt_tab: Vec<usize>,
    pub captures: BTreeMap<usize, Screenshot>,
    pub texts: BTreeMap<usize, String>,
    pub posted: Vec<(usize, u32)>,
    pub closed: Vec<usize>,
    pub terminated: Vec<u32>,
    pub launches: Vec<LaunchRequest>,
    pub fail_launch: bool,
    pub parameter_replies: VecDeque<Option<String>>,
    pub size_reply: Option<Size>,
    pub position_reply: Option<Point>,
    pub transparency_reply: Option<u8>,
    pub save_path_reply: Option<PathBuf>,
    pub save_prompts: Vec<String>,
    pub info_shown: Vec<WindowInfo>,
    pub clipboard: Vec<Option<String>>,
    pub clipboard_images: Vec<Screenshot>,
    pub errors: Vec<(String, String)>,
    pub sent: Vec<(usize, BridgeMessage)>,
    pub sleeps: Vec<Duration>,
}

impl FakeDesktop {
    pub fn insert(&mut self, window: FakeWindow) {
        self.windows.insert(window.handle(), window);
    }

    pub fn observed(&self, hwnd: usize) -> Option<Rc<RefCell<FakeWindowState>>> {
        self.windows.get(&hwnd).map(FakeWindow::observed)
    }
}

impl Desktop for FakeDesktop {
    fn open(&self, hwnd: usize) -> Option<Box<dyn WindowOps>> {
        let window = self.windows.get(&hwnd)?;
        window
            .exists()
            .then(|| Box::new(window.clone()) as Box<dyn WindowOps>)
    }

    fn is_host_bitness(&self, pid: u32) -> bool {
        !self.foreign_pids.contains(&pid)
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.clone()
    }

    fn foreground_window(&self) -> Option<usize> {
        self.foreground
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }

    fn root_window_at(&self, _point: Point) -> Option<usize> {
        self.window_at
    }

    fn has_system_menu(&self, hwnd: usize) -> bool {
        self.windows.contains_key(&hwnd)
    }

    fn process_of(&self, hwnd: usize) -> Option<ProcessInfo> {
        self.windows.get(&hwnd)?.process()
    }

    fn is_key_down(&self, vk: u32) -> bool {
        self.keys_down.contains(&vk)
    }

    fn alt_tab_windows(&self) -> Vec<usize> {
        self.alt_tab.clone()
    }

    fn capture(&self, hwnd: usize) -> Option<Screenshot> {
        self.captures.get(&hwnd).cloned()
    }

    fn window_text(&self, hwnd: usize) -> Option<String> {
        self.texts.get(&hwnd).cloned()
    }

    fn post_sys_command(&mut self, hwnd: usize, command: u32) {
        self.posted.push((hwnd, command));
    }

    fn post_close(&mut self, hwnd: usize) {
        self.closed.push(hwnd);
    }

    fn terminate_process(&mut self, pid: u32) -> bool {
        self.terminated.push(pid);
        true
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<()> {
        if self.fail_launch {
            return Err(Error::Launch {
                file: request.file_name.clone(),
                reason: "not found".into(),
            });
        }
        self.launches.push(request.clone());
        Ok(())
    }

    fn prompt_parameter(&mut self, _name: &str) -> Option<String> {
        self.parameter_replies.pop_front().flatten()
    }

    fn prompt_size(&mut self, _current: Size) -> Option<Size> {
        self.size_reply
    }

    fn prompt_position(&mut self, _current: Point) -> Option<Point> {
        self.position_reply
    }

    fn prompt_transparency(&mut self, _current: u8) -> Option<u8> {
        self.transparency_reply
    }

    fn prompt_save_path(&mut self, suggested: &str) -> Option<PathBuf> {
        self.save_prompts.push(suggested.to_string());
        self.save_path_reply.clone()
    }

    fn show_info(&mut self, info: &WindowInfo) {
        self.info_shown.push(info.clone());
    }

    fn set_clipboard(&mut self, text: Option<&str>) -> bool {
        self.clipboard.push(text.map(str::to_string));
        true
    }

    fn set_clipboard_image(&mut self, shot: &Screenshot) -> bool {
        self.clipboard_images.push(shot.clone());
        true
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        self.errors.push((title.into(), message.into()));
    }

    fn send_to_companion(&mut self, target: usize, message: &BridgeMessage) -> bool {
        self.sent.push((target, message.clone()));
        true
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

/// A hook backend that hands out sequential message identifiers.
#[derive(Debug, Default)]
pub struct FakeBackend {
    registered: Vec<String>,
    pub fail: HashSet<HookKind>,
    pub installed: Vec<HookKind>,
    pub uninstalled: Vec<HookKind>,
    pub params: Vec<HookParams>,
    pub wakes: u32,
}

impl FakeBackend {
    const FIRST_ID: u32 = 0xC000;

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.registered
            .iter()
            .position(|n| n == name)
            .map(|i| Self::FIRST_ID + i as u32)
    }

    /// A message as the native side would post it for `name`.
    pub fn message(&self, name: &str, wparam: usize, lparam: isize) -> RawMessage {
        let id = self.id_of(name).unwrap_or(0);
        RawMessage::new(id, wparam, lparam)
    }
}

impl HookBackend for FakeBackend {
    fn register_message(&mut self, name: &str) -> Option<u32> {
        if let Some(id) = self.id_of(name) {
            return Some(id);
        }
        self.registered.push(name.to_string());
        self.id_of(name)
    }

    fn install(&mut self, kind: HookKind, params: &HookParams) -> Result<()> {
        if self.fail.contains(&kind) {
            return Err(Error::Hook(kind));
        }
        self.installed.push(kind);
        self.params.push(params.clone());
        Ok(())
    }

    fn uninstall(&mut self, kind: HookKind) {
        self.uninstalled.push(kind);
    }

    fn wake_message_loops(&mut self) {
        self.wakes += 1;
    }
}
