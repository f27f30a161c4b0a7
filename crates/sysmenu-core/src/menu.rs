//! Check state of an augmented system menu and the layout inserted
//! into every tracked window.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Settings;
use crate::menu_id::{self, Alignment, Group, Priority};
use crate::rect::Rect;

/// A display monitor as offered by the "Move To" submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub handle: usize,
    pub name: String,
    pub work_area: Rect,
    pub primary: bool,
}

/// The check state of one window's augmented menu.
///
/// Only identifiers live here; the menu never refers back to its window.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    checked: BTreeSet<u32>,
    move_to: BTreeMap<usize, Monitor>,
}

impl Menu {
    pub fn is_checked(&self, id: u32) -> bool {
        self.checked.contains(&id)
    }

    /// Sets the check mark. Returns `true` if the state changed.
    pub fn set_checked(&mut self, id: u32, checked: bool) -> bool {
        if checked {
            self.checked.insert(id)
        } else {
            self.checked.remove(&id)
        }
    }

    /// Checked identifiers that belong to `group`.
    pub fn checked_in(&self, group: Group) -> Vec<u32> {
        self.checked
            .iter()
            .copied()
            .filter(|id| group.contains(*id))
            .collect()
    }

    pub fn set_monitors(&mut self, monitors: &[Monitor]) {
        self.move_to = monitors.iter().cloned().enumerate().collect();
    }

    /// Monitor behind "Move To" entry `index`.
    pub fn monitor(&self, index: usize) -> Option<&Monitor> {
        self.move_to.get(&index)
    }
}

/// One entry of the menu layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        id: u32,
        title: String,
        hotkey: Option<String>,
    },
    Separator,
    Submenu {
        title: String,
        entries: Vec<MenuEntry>,
    },
}

/// The items appended to a window's system menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuLayout {
    pub entries: Vec<MenuEntry>,
}

impl MenuLayout {
    /// Builds the layout from the settings snapshot and current monitors.
    ///
    /// Hidden items are left out; submenus that end up empty are dropped.
    pub fn build(settings: &Settings, monitors: &[Monitor]) -> Self {
        let mut b = Builder { settings, entries: Vec::new() };

        b.separator();
        for id in [
            menu_id::INFORMATION,
            menu_id::ROLLUP,
            menu_id::AERO_GLASS,
            menu_id::TOPMOST,
            menu_id::SEND_TO_BOTTOM,
            menu_id::SAVE_SCREENSHOT,
            menu_id::OPEN_FILE_IN_EXPLORER,
            menu_id::DRAG_BY_MOUSE,
        ] {
            b.fixed(id);
        }

        let mut size = b.sub([menu_id::SIZE_DEFAULT, menu_id::SIZE_CUSTOM]);
        if !settings.menu.window_size.is_empty() {
            size.push(MenuEntry::Separator);
        }
        for (i, preset) in settings.menu.window_size.iter().enumerate() {
            let id = menu_id::size_preset(i);
            size.push(b.item(id, &preset.title));
        }
        b.submenu("Size", size);

        if monitors.len() > 1 {
            let entries = monitors
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let title = if m.primary {
                        format!("{} (primary)", m.name)
                    } else {
                        m.name.clone()
                    };
                    b.item(menu_id::move_to(i), &title)
                })
                .collect();
            b.submenu("Move To", entries);
        }

        let mut align = b.sub([menu_id::ALIGN_DEFAULT, menu_id::ALIGN_CUSTOM]);
        align.push(MenuEntry::Separator);
        align.extend(Alignment::ALL.iter().map(|a| b.item(a.id(), a.title())));
        b.submenu("Alignment", align);

        let mut trans = b.sub([menu_id::TRANS_DEFAULT, menu_id::TRANS_CUSTOM]);
        trans.push(MenuEntry::Separator);
        trans.extend((0..=10u8).rev().map(|k| {
            let percent = k * 10;
            b.item(menu_id::TRANS_00 + u32::from(k), &format!("{percent}%"))
        }));
        b.submenu("Transparency", trans);

        let priority = Priority::ALL.iter().map(|p| b.item(p.id(), p.title())).collect();
        b.submenu("Priority", priority);

        let programs = settings
            .menu
            .start_program
            .iter()
            .enumerate()
            .map(|(i, p)| b.item(menu_id::start_program(i), &p.title))
            .collect();
        b.submenu("Start Program", programs);

        let clipboard = b.sub([
            menu_id::COPY_SCREENSHOT,
            menu_id::COPY_WINDOW_TEXT,
            menu_id::COPY_WINDOW_TITLE,
            menu_id::COPY_FULL_PROCESS_PATH,
            menu_id::CLEAR_CLIPBOARD,
        ]);
        b.submenu("Clipboard", clipboard);

        let others = b.sub([menu_id::MINIMIZE_OTHER_WINDOWS, menu_id::CLOSE_OTHER_WINDOWS]);
        b.submenu("Other Windows", others);

        let tray = b.sub([
            menu_id::MINIMIZE_TO_TRAY,
            menu_id::MINIMIZE_ALWAYS_TO_TRAY,
            menu_id::SUSPEND_TO_TRAY,
        ]);
        b.submenu("System Tray", tray);

        let window = b.sub([
            menu_id::HIDE_FOR_ALT_TAB,
            menu_id::CLICK_THROUGH,
            menu_id::DISABLE_MINIMIZE_BUTTON,
            menu_id::DISABLE_MAXIMIZE_BUTTON,
            menu_id::DISABLE_CLOSE_BUTTON,
        ]);
        b.submenu("Window", window);

        b.separator();
        b.fixed(menu_id::SAVE_SELECTED_ITEMS);

        Self { entries: b.entries }
    }

    /// Every command identifier in the layout, depth first.
    pub fn ids(&self) -> Vec<u32> {
        fn walk(entries: &[MenuEntry], out: &mut Vec<u32>) {
            for entry in entries {
                match entry {
                    MenuEntry::Item { id, .. } => out.push(*id),
                    MenuEntry::Submenu { entries, .. } => walk(entries, out),
                    MenuEntry::Separator => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.entries, &mut out);
        out
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids().contains(&id)
    }
}

struct Builder<'a> {
    settings: &'a Settings,
    entries: Vec<MenuEntry>,
}

impl Builder<'_> {
    fn item(&self, id: u32, title: &str) -> MenuEntry {
        MenuEntry::Item {
            id,
            title: title.to_string(),
            hotkey: self.settings.hotkey_text(id),
        }
    }

    fn fixed(&mut self, id: u32) {
        if let Some(entry) = self.fixed_entry(id) {
            self.entries.push(entry);
        }
    }

    fn fixed_entry(&self, id: u32) -> Option<MenuEntry> {
        if !self.settings.is_visible(id) {
            return None;
        }
        Some(self.item(id, menu_id::title(id)?))
    }

    fn sub<const N: usize>(&self, ids: [u32; N]) -> Vec<MenuEntry> {
        ids.into_iter().filter_map(|id| self.fixed_entry(id)).collect()
    }

    fn separator(&mut self) {
        self.entries.push(MenuEntry::Separator);
    }

    fn submenu(&mut self, title: &str, entries: Vec<MenuEntry>) {
        let has_items = entries.iter().any(|e| !matches!(e, MenuEntry::Separator));
        if has_items {
            self.entries.push(MenuEntry::Submenu {
                title: title.to_string(),
                entries,
            });
        }
    }
}
