//! The authoritative map from window handle to tracked [`Window`].

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::Settings;
use crate::desktop::Desktop;
use crate::menu::MenuLayout;
use crate::menu_id;
use crate::state_store::WindowStateStore;
use crate::window::Window;

/// Titles of shell windows that must never be augmented.
const RESERVED_TITLES: &[&str] = &["Program Manager"];

/// Tracked windows keyed by handle. At most one record per handle.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: BTreeMap<usize, Window>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `hwnd` if it qualifies.
    ///
    /// Idempotent: a handle that is already tracked is left alone, so
    /// both creation signals may arrive for the same window. Returns
    /// whether a new record was inserted.
    pub fn add(
        &mut self,
        hwnd: usize,
        desktop: &dyn Desktop,
        settings: &Settings,
        store: &WindowStateStore,
    ) -> bool {
        if hwnd == 0 || self.windows.contains_key(&hwnd) {
            return false;
        }

        let Some(ops) = desktop.open(hwnd) else {
            debug!("window 0x{hwnd:X} vanished before it could be tracked");
            return false;
        };
        let mut window = Window::new(hwnd, ops);

        let title = window.title();
        if RESERVED_TITLES.contains(&title.as_str()) {
            return false;
        }

        let Some(process) = window.process().cloned() else {
            debug!("window 0x{hwnd:X} has no resolvable process");
            return false;
        };

        if !desktop.is_host_bitness(process.pid) {
            return false;
        }

        if let Some(file_name) = process.file_name()
            && settings.is_excluded(&file_name)
        {
            debug!("window 0x{hwnd:X} excluded ({file_name})");
            return false;
        }

        let monitors = desktop.monitors();
        let layout = MenuLayout::build(settings, &monitors);
        window.menu.set_monitors(&monitors);
        if !window.augment_menu(&layout) {
            debug!("menu augmentation failed for 0x{hwnd:X}");
            return false;
        }

        window.sync_runtime_checks();
        window.save_default_rect();

        if let Some(identity) = window.identity()
            && let Some(state) = store.find(&identity)
        {
            let state = state.clone();
            window.apply_state(&state, &settings.save_selected_items, &settings.menu.window_size);
            window.check(menu_id::SAVE_SELECTED_ITEMS, true);
        }

        info!("+add 0x{hwnd:X} [{}] \"{title}\"", window.class_name());
        self.windows.insert(hwnd, window);
        true
    }

    /// Stops tracking `hwnd`.
    ///
    /// A window parked behind a tray placeholder keeps its record so it
    /// can be restored later. Idempotent. Returns whether a record was
    /// removed.
    pub fn remove(&mut self, hwnd: usize) -> bool {
        let Some(window) = self.windows.get(&hwnd) else {
            return false;
        };
        if window.in_tray() {
            return false;
        }
        let Some(mut window) = self.windows.remove(&hwnd) else {
            return false;
        };
        window.dispose();
        info!("-del 0x{hwnd:X} [{}] \"{}\"", window.class_name(), window.title());
        true
    }

    /// Drops the record without the tray check, e.g. after the window
    /// behind a tray placeholder was destroyed.
    pub fn forget(&mut self, hwnd: usize) -> Option<Window> {
        let mut window = self.windows.remove(&hwnd)?;
        window.dispose();
        Some(window)
    }

    pub fn find(&self, hwnd: usize) -> Option<&Window> {
        self.windows.get(&hwnd)
    }

    pub fn find_mut(&mut self, hwnd: usize) -> Option<&mut Window> {
        self.windows.get_mut(&hwnd)
    }

    pub fn contains(&self, hwnd: usize) -> bool {
        self.windows.contains_key(&hwnd)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn handles(&self) -> Vec<usize> {
        self.windows.keys().copied().collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    /// Tracks every window found by the startup enumeration.
    pub fn adopt(
        &mut self,
        handles: &[usize],
        desktop: &dyn Desktop,
        settings: &Settings,
        store: &WindowStateStore,
    ) -> usize {
        handles
            .iter()
            .filter(|hwnd| self.add(**hwnd, desktop, settings, store))
            .count()
    }

    /// Reverts every tracked window and empties the registry.
    pub fn dispose_all(&mut self) {
        for (_, mut window) in std::mem::take(&mut self.windows) {
            window.dispose();
        }
    }
}
