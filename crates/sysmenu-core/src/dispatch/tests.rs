use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::{StartProgramItem, WindowSizeItem};
use crate::menu::Monitor;
use crate::rect::{Point, Rect};
use crate::screenshot::Screenshot;
use crate::testing::{FakeDesktop, FakeWindow, FakeWindowState};
use crate::window::WindowIdentity;

const HWND: usize = 0x100;
const HOST: usize = 0x900;

struct Harness {
    registry: WindowRegistry,
    store: WindowStateStore,
    settings: Settings,
    desktop: FakeDesktop,
    observed: Rc<RefCell<FakeWindowState>>,
}

impl Harness {
    fn new(settings: Settings) -> Self {
        let mut desktop = FakeDesktop::default();
        let (fake, observed) = FakeWindow::notepad(HWND);
        desktop.insert(fake);
        let store = WindowStateStore::in_memory();
        let mut registry = WindowRegistry::new();
        assert!(registry.add(HWND, &desktop, &settings, &store));
        Self {
            registry,
            store,
            settings,
            desktop,
            observed,
        }
    }

    fn run(&mut self, id: u32) {
        self.run_on(HWND, id);
    }

    fn run_on(&mut self, hwnd: usize, id: u32) {
        Dispatcher {
            registry: &mut self.registry,
            store: &mut self.store,
            settings: &self.settings,
            desktop: &mut self.desktop,
            host: HOST,
        }
        .dispatch(hwnd, id as usize);
    }

    fn window(&self) -> &Window {
        self.registry.find(HWND).expect("tracked")
    }
}

fn presets() -> Settings {
    let mut settings = Settings::default();
    settings.menu.window_size = vec![
        WindowSizeItem {
            title: "800x600".into(),
            width: 800,
            height: 600,
            left: Some(100),
            top: Some(100),
            keys: Vec::new(),
        },
        WindowSizeItem {
            title: "1024x768".into(),
            width: 1024,
            height: 768,
            left: None,
            top: None,
            keys: Vec::new(),
        },
    ];
    settings
}

fn notepad_identity() -> WindowIdentity {
    WindowIdentity::of("Notepad", Some(FakeWindow::NOTEPAD_PATH)).expect("identity")
}

#[test]
fn group_commands_keep_one_item_checked() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run(menu_id::TRANS_00 + 3);
    h.run(menu_id::TRANS_00 + 7);

    // Assert
    assert_eq!(
        h.window().menu.checked_in(Group::Transparency),
        vec![menu_id::TRANS_00 + 7]
    );
    assert_eq!(h.observed.borrow().alpha, Some(76));
}

#[test]
fn priority_and_alignment_are_exclusive_groups() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run(Priority::High.id());
    h.run(Priority::Idle.id());
    h.run(Alignment::TopLeft.id());
    h.run(Alignment::BottomRight.id());

    // Assert
    let window = h.window();
    assert_eq!(window.menu.checked_in(Group::Priority), vec![Priority::Idle.id()]);
    assert_eq!(window.menu.checked_in(Group::Alignment), vec![Alignment::BottomRight.id()]);
    assert_eq!(h.observed.borrow().priority, Some(Priority::Idle));
    let rect = h.observed.borrow().rect;
    assert_eq!((rect.right(), rect.bottom()), (1920, 1040));
}

#[test]
fn notepad_preset_is_persisted_and_replaced() {
    // Arrange
    let mut h = Harness::new(presets());
    h.run(menu_id::SAVE_SELECTED_ITEMS);

    // Act
    h.run(menu_id::size_preset(0));

    // Assert
    let state = &h.window().state;
    assert_eq!((state.width, state.height, state.left, state.top), (800, 600, 100, 100));
    assert_eq!(h.store.len(), 1);
    let stored = h.store.find(&notepad_identity()).expect("stored");
    assert_eq!((stored.width, stored.height, stored.left, stored.top), (800, 600, 100, 100));
    assert_eq!(stored.class_name, "Notepad");
    assert_eq!(stored.process_path, FakeWindow::NOTEPAD_PATH);

    // Act
    h.run(menu_id::size_preset(1));

    // Assert
    assert_eq!(h.store.len(), 1);
    let stored = h.store.find(&notepad_identity()).expect("stored");
    assert_eq!((stored.width, stored.height), (1024, 768));
    assert_eq!(stored.size_preset.as_deref(), Some("1024x768"));
}

#[test]
fn persisted_state_round_trips_into_a_new_registry() {
    // Arrange
    let mut h = Harness::new(presets());
    h.run(menu_id::SAVE_SELECTED_ITEMS);
    h.run(menu_id::size_preset(0));
    h.run(menu_id::TRANS_00 + 3);
    h.run(Priority::High.id());
    h.run(menu_id::TOPMOST);
    h.run(menu_id::DISABLE_CLOSE_BUTTON);

    let mut desktop = FakeDesktop::default();
    let (fake, observed) = FakeWindow::notepad(0x200);
    desktop.insert(fake);
    let mut registry = WindowRegistry::new();

    // Act
    registry.add(0x200, &desktop, &h.settings, &h.store);

    // Assert
    let before = h.window();
    let after = registry.find(0x200).expect("tracked");
    for group in [Group::Size, Group::Transparency, Group::Priority, Group::Alignment] {
        assert_eq!(after.menu.checked_in(group), before.menu.checked_in(group), "{group:?}");
    }
    for id in [menu_id::TOPMOST, menu_id::DISABLE_CLOSE_BUTTON, menu_id::SAVE_SELECTED_ITEMS] {
        assert_eq!(after.is_checked(id), before.is_checked(id));
    }
    assert_eq!(observed.borrow().rect, h.observed.borrow().rect);
    assert_eq!(observed.borrow().alpha, h.observed.borrow().alpha);
}

#[test]
fn turning_persistence_off_forgets_the_window() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.run(menu_id::SAVE_SELECTED_ITEMS);
    assert_eq!(h.store.len(), 1);

    // Act
    h.run(menu_id::SAVE_SELECTED_ITEMS);

    // Assert
    assert!(h.store.is_empty());
    assert!(!h.window().is_checked(menu_id::SAVE_SELECTED_ITEMS));
}

#[test]
fn transient_commands_are_not_persisted() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.run(menu_id::SAVE_SELECTED_ITEMS);
    h.observed.borrow_mut().rect = Rect::new(5, 5, 300, 300);

    // Act
    h.run(menu_id::SC_MOVE);
    h.run(menu_id::SC_MINIMIZE);

    // Assert
    let stored = h.store.find(&notepad_identity()).expect("stored");
    assert_eq!(stored.width, 1000);
}

#[test]
fn out_of_range_dynamic_commands_change_nothing() {
    // Arrange
    let mut h = Harness::new(presets());
    h.run(menu_id::SAVE_SELECTED_ITEMS);
    let before = h.window().menu.clone();
    let changes = h.observed.borrow().changes.len();

    // Act
    h.run(menu_id::size_preset(2));
    h.run(menu_id::start_program(0));
    h.run(menu_id::move_to(3));

    // Assert
    assert_eq!(
        h.window().menu.checked_in(Group::Size),
        before.checked_in(Group::Size)
    );
    assert_eq!(h.observed.borrow().changes.len(), changes);
    assert!(h.desktop.launches.is_empty());
}

#[test]
fn unknown_handle_is_ignored() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run_on(0xDEAD, menu_id::TOPMOST);

    // Assert
    assert!(!h.window().is_checked(menu_id::TOPMOST));
    assert!(h.observed.borrow().changes.is_empty());
}

#[test]
fn high_word_of_wparam_is_ignored() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    Dispatcher {
        registry: &mut h.registry,
        store: &mut h.store,
        settings: &h.settings,
        desktop: &mut h.desktop,
        host: HOST,
    }
    .dispatch(HWND, 0x0005_0000 | menu_id::TOPMOST as usize);

    // Assert
    assert!(h.window().is_checked(menu_id::TOPMOST));
    assert!(h.observed.borrow().runtime.topmost);
}

#[test]
fn maximize_clears_the_size_group() {
    // Arrange
    let mut h = Harness::new(presets());
    h.run(menu_id::size_preset(1));

    // Act
    h.run(menu_id::SC_MAXIMIZE);

    // Assert
    assert!(h.window().menu.checked_in(Group::Size).is_empty());
}

#[test]
fn roll_up_toggles_and_clears_the_size_group() {
    // Arrange
    let mut h = Harness::new(presets());
    h.run(menu_id::size_preset(0));

    // Act
    h.run(menu_id::ROLLUP);

    // Assert
    assert!(h.window().is_checked(menu_id::ROLLUP));
    assert!(h.window().menu.checked_in(Group::Size).is_empty());
    assert_eq!(h.observed.borrow().rect.height, 31);

    // Act
    h.run(menu_id::ROLLUP);

    // Assert
    assert!(!h.window().is_checked(menu_id::ROLLUP));
    assert_eq!(h.observed.borrow().rect.height, 600);
}

#[test]
fn default_size_restores_the_remembered_rect() {
    // Arrange
    let mut h = Harness::new(presets());
    let original = h.observed.borrow().rect;
    h.run(menu_id::size_preset(0));

    // Act
    h.run(menu_id::SIZE_DEFAULT);

    // Assert
    assert_eq!(h.observed.borrow().rect, original);
    assert_eq!(h.window().menu.checked_in(Group::Size), vec![menu_id::SIZE_DEFAULT]);
}

#[test]
fn custom_size_uses_the_sizer() {
    // Arrange
    let mut settings = Settings::default();
    settings.sizer = crate::config::Sizer::WindowWithoutMargins;
    let mut h = Harness::new(settings);
    h.desktop.size_reply = Some(Size::new(500, 400));

    // Act
    h.run(menu_id::SIZE_CUSTOM);

    // Assert
    let rect = h.observed.borrow().rect;
    assert_eq!((rect.width, rect.height), (514, 407));
    assert_eq!(h.window().menu.checked_in(Group::Size), vec![menu_id::SIZE_CUSTOM]);
}

#[test]
fn cancelled_custom_transparency_changes_nothing() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.run(menu_id::TRANS_00 + 2);

    // Act
    h.run(menu_id::TRANS_CUSTOM);

    // Assert
    assert_eq!(h.window().menu.checked_in(Group::Transparency), vec![menu_id::TRANS_00 + 2]);
}

#[test]
fn move_to_monitor_keeps_the_offset() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    let window = h.registry.find_mut(HWND).expect("tracked");
    window.menu.set_monitors(&[
        Monitor {
            handle: 1,
            name: "\\\\.\\DISPLAY1".into(),
            work_area: Rect::new(0, 0, 1920, 1040),
            primary: true,
        },
        Monitor {
            handle: 2,
            name: "\\\\.\\DISPLAY2".into(),
            work_area: Rect::new(1920, 0, 2560, 1400),
            primary: false,
        },
    ]);

    // Act
    h.run(menu_id::move_to(1));

    // Assert
    assert_eq!(h.observed.borrow().rect.position(), Point::new(2120, 150));
}

#[test]
fn start_program_substitutes_placeholders() {
    // Arrange
    let mut settings = Settings::default();
    settings.menu.start_program = vec![StartProgramItem {
        title: "Inspect".into(),
        file_name: "inspect.exe".into(),
        arguments: "--pid {ProcessId} --name {processname} --note {Note}".into(),
        ..Default::default()
    }];
    let mut h = Harness::new(settings);
    h.desktop.parameter_replies.push_back(Some("hi".into()));

    // Act
    h.run(menu_id::start_program(0));

    // Assert
    assert_eq!(h.desktop.launches.len(), 1);
    assert_eq!(
        h.desktop.launches[0].arguments,
        format!("--pid {} --name notepad.exe --note hi", FakeWindow::NOTEPAD_PID)
    );
}

#[test]
fn start_program_cancel_and_failure() {
    // Arrange
    let mut settings = Settings::default();
    settings.menu.start_program = vec![StartProgramItem {
        title: "Ask".into(),
        file_name: "missing.exe".into(),
        arguments: "{Anything}".into(),
        ..Default::default()
    }];
    let mut h = Harness::new(settings);
    h.desktop.parameter_replies.push_back(None);
    h.desktop.parameter_replies.push_back(Some("x".into()));
    h.desktop.fail_launch = true;

    // Act
    h.run(menu_id::start_program(0));
    let errors_after_cancel = h.desktop.errors.len();
    h.run(menu_id::start_program(0));

    // Assert
    assert_eq!(errors_after_cancel, 0);
    assert_eq!(h.desktop.errors.len(), 1);
    assert_eq!(h.desktop.errors[0].0, "Ask");
}

#[test]
fn other_windows_skip_host_and_target() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.desktop.alt_tab = vec![0x300, HWND, HOST, 0x400];

    // Act
    h.run(menu_id::MINIMIZE_OTHER_WINDOWS);
    h.run(menu_id::CLOSE_OTHER_WINDOWS);

    // Assert
    assert_eq!(
        h.desktop.posted,
        vec![(0x300, menu_id::SC_MINIMIZE), (0x400, menu_id::SC_MINIMIZE)]
    );
    assert_eq!(h.desktop.closed, vec![0x300, 0x400]);
}

#[test]
fn suspend_to_tray_waits_before_freezing() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run(menu_id::SUSPEND_TO_TRAY);

    // Assert
    assert_eq!(h.desktop.sleeps, vec![SUSPEND_DELAY]);
    let observed = h.observed.borrow();
    assert!(observed.in_tray);
    assert!(observed.suspended);
}

#[test]
fn copy_screenshot_puts_the_capture_on_the_clipboard() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    let shot = Screenshot::from_rgb(1, 1, vec![9, 8, 7]).expect("valid");
    h.desktop.captures.insert(HWND, shot.clone());

    // Act
    h.run(menu_id::COPY_SCREENSHOT);

    // Assert
    assert_eq!(h.desktop.clipboard_images, vec![shot]);
}

#[test]
fn failed_capture_leaves_clipboard_and_prompt_alone() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.desktop.save_path_reply = Some(std::env::temp_dir().join("never-written.png"));

    // Act
    h.run(menu_id::COPY_SCREENSHOT);
    h.run(menu_id::SAVE_SCREENSHOT);

    // Assert
    assert!(h.desktop.clipboard_images.is_empty());
    assert!(h.desktop.save_prompts.is_empty());
}

#[test]
fn save_screenshot_writes_the_chosen_file() {
    // Arrange
    let path = std::env::temp_dir().join(format!("sysmenu-dispatch-{}.png", std::process::id()));
    let mut h = Harness::new(Settings::default());
    h.desktop
        .captures
        .insert(HWND, Screenshot::from_rgb(2, 2, vec![0; 12]).expect("valid"));
    h.desktop.save_path_reply = Some(path.clone());

    // Act
    h.run(menu_id::SAVE_SCREENSHOT);

    // Assert
    assert_eq!(h.desktop.save_prompts, vec!["Untitled - Notepad.png".to_string()]);
    assert!(path.is_file());
    assert!(h.desktop.errors.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unwritable_screenshot_path_is_reported() {
    // Arrange
    let missing = std::env::temp_dir()
        .join(format!("sysmenu-missing-{}", std::process::id()))
        .join("shot.png");
    let mut h = Harness::new(Settings::default());
    h.desktop
        .captures
        .insert(HWND, Screenshot::from_rgb(1, 1, vec![0; 3]).expect("valid"));
    h.desktop.save_path_reply = Some(missing);

    // Act
    h.run(menu_id::SAVE_SCREENSHOT);

    // Assert
    assert_eq!(h.desktop.errors.len(), 1);
    assert_eq!(h.desktop.errors[0].0, "Save Screenshot");
}

#[test]
fn copy_window_text_skips_empty_text() {
    // Arrange
    let mut h = Harness::new(Settings::default());
    h.desktop.texts.insert(HWND, String::new());

    // Act
    h.run(menu_id::COPY_WINDOW_TEXT);
    h.desktop.texts.insert(HWND, "OK\r\nCancel".into());
    h.run(menu_id::COPY_WINDOW_TEXT);

    // Assert
    assert_eq!(h.desktop.clipboard, vec![Some("OK\r\nCancel".to_string())]);
}

#[test]
fn clipboard_commands() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run(menu_id::COPY_WINDOW_TITLE);
    h.run(menu_id::COPY_FULL_PROCESS_PATH);
    h.run(menu_id::CLEAR_CLIPBOARD);

    // Assert
    assert_eq!(
        h.desktop.clipboard,
        vec![
            Some("Untitled - Notepad".to_string()),
            Some(FakeWindow::NOTEPAD_PATH.to_string()),
            None,
        ]
    );
}

#[test]
fn explorer_selects_the_executable() {
    // Arrange
    let mut h = Harness::new(Settings::default());

    // Act
    h.run(menu_id::OPEN_FILE_IN_EXPLORER);

    // Assert
    assert_eq!(h.desktop.launches[0].file_name, "explorer.exe");
    assert_eq!(
        h.desktop.launches[0].arguments,
        format!("/select, \"{}\"", FakeWindow::NOTEPAD_PATH)
    );
}
