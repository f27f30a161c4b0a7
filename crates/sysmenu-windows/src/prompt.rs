//! Modal prompts and notices.
//!
//! The input box is a plain popup with a label, an edit control and
//! OK/Cancel buttons, driven by its own nested message loop. Messages
//! for the host window keep being dispatched while it is open.

use std::cell::RefCell;
use std::ffi::c_void;
use std::path::PathBuf;

use sysmenu_core::{Point, Size};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{DEFAULT_GUI_FONT, GetStockObject};
use windows::Win32::UI::Controls::Dialogs::{
    GetSaveFileNameW, OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, GetSystemMetrics,
    GetWindowTextLengthW, GetWindowTextW, HMENU, IDCANCEL, IDOK, IsDialogMessageW, MB_ICONERROR,
    MB_ICONINFORMATION, MB_OK, MB_SETFOREGROUND, MB_TOPMOST, MESSAGEBOX_STYLE, MSG, MessageBoxW,
    PostQuitMessage, RegisterClassW, SM_CXSCREEN, SM_CYSCREEN, SendMessageW, SetFocus,
    SetForegroundWindow, TranslateMessage, WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_QUIT, WM_SETFONT,
    WNDCLASSW, WS_BORDER, WS_CAPTION, WS_CHILD, WS_EX_DLGMODALFRAME, WS_EX_TOPMOST, WS_POPUP,
    WS_SYSMENU, WS_TABSTOP, WS_VISIBLE,
};
use windows::core::{HSTRING, PCWSTR, PWSTR, w};

const BS_DEFPUSHBUTTON: u32 = 0x0001;
const ES_AUTOHSCROLL: u32 = 0x0080;
const EDIT_ID: i32 = 100;

/// Pairs of description and pattern, double-nul terminated.
const SAVE_FILTER: &str = "PNG Image (*.png)\0*.png\0JPEG Image (*.jpg)\0*.jpg;*.jpeg\0\
    Bitmap (*.bmp)\0*.bmp\0GIF Image (*.gif)\0*.gif\0TIFF Image (*.tif)\0*.tif;*.tiff\0\0";
const SAVE_PATH_LEN: usize = 1024;

const WIDTH: i32 = 320;
const HEIGHT: i32 = 150;

thread_local! {
    /// Edit control of the open prompt and the answer once given.
    static OPEN: RefCell<Option<(HWND, Option<Option<String>>)>> = const { RefCell::new(None) };
}

/// Asks for one line of text. `None` means the user cancelled.
pub fn input(title: &str, label: &str, initial: &str) -> Option<String> {
    if OPEN.with(|cell| cell.borrow().is_some()) {
        return None;
    }
    let dialog = create(title, label, initial)?;
    let answer = run_modal(dialog);
    OPEN.with(|cell| cell.borrow_mut().take());
    answer
}

fn create(title: &str, label: &str, initial: &str) -> Option<HWND> {
    let class_name = w!("SysmenuPrompt");
    let wc = WNDCLASSW {
        lpfnWndProc: Some(prompt_proc),
        lpszClassName: class_name,
        ..Default::default()
    };

    // SAFETY: registration may fail with "already registered", which is
    // fine; every handle below is checked before use.
    unsafe {
        RegisterClassW(&wc);

        let x = (GetSystemMetrics(SM_CXSCREEN) - WIDTH) / 2;
        let y = (GetSystemMetrics(SM_CYSCREEN) - HEIGHT) / 2;
        let dialog = CreateWindowExW(
            WS_EX_DLGMODALFRAME | WS_EX_TOPMOST,
            class_name,
            &HSTRING::from(title),
            WS_POPUP | WS_CAPTION | WS_SYSMENU | WS_VISIBLE,
            x,
            y,
            WIDTH,
            HEIGHT,
            None,
            None,
            None,
            None,
        )
        .ok()?;

        let child = WS_CHILD | WS_VISIBLE;
        let controls = [
            (w!("STATIC"), HSTRING::from(label), child, 12, 12, 290, 20, 0),
            (
                w!("EDIT"),
                HSTRING::from(initial),
                child | WS_BORDER | WS_TABSTOP | WINDOW_STYLE(ES_AUTOHSCROLL),
                12,
                36,
                290,
                22,
                EDIT_ID,
            ),
            (
                w!("BUTTON"),
                HSTRING::from("OK"),
                child | WS_TABSTOP | WINDOW_STYLE(BS_DEFPUSHBUTTON),
                140,
                72,
                78,
                26,
                IDOK.0,
            ),
            (
                w!("BUTTON"),
                HSTRING::from("Cancel"),
                child | WS_TABSTOP,
                224,
                72,
                78,
                26,
                IDCANCEL.0,
            ),
        ];

        let font = GetStockObject(DEFAULT_GUI_FONT);
        let mut edit = None;
        for (class, text, style, x, y, w, h, id) in controls {
            let Ok(control) = CreateWindowExW(
                Default::default(),
                class,
                &text,
                style,
                x,
                y,
                w,
                h,
                Some(dialog),
                Some(HMENU(id as isize as *mut c_void)),
                None,
                None,
            ) else {
                let _ = DestroyWindow(dialog);
                return None;
            };
            SendMessageW(control, WM_SETFONT, Some(WPARAM(font.0 as usize)), Some(LPARAM(1)));
            if id == EDIT_ID {
                edit = Some(control);
            }
        }

        let edit = edit?;
        OPEN.with(|cell| *cell.borrow_mut() = Some((edit, None)));
        let _ = SetForegroundWindow(dialog);
        let _ = SetFocus(Some(edit));
        Some(dialog)
    }
}

fn answer() -> Option<Option<String>> {
    OPEN.with(|cell| cell.borrow().as_ref().and_then(|(_, answer)| answer.clone()))
}

fn run_modal(dialog: HWND) -> Option<String> {
    let mut msg = MSG::default();
    loop {
        if let Some(answer) = answer() {
            return answer;
        }
        // SAFETY: standard nested message loop.
        unsafe {
            if !GetMessageW(&mut msg, None, 0, 0).as_bool() {
                // Hand the quit request back to the outer pump.
                if msg.message == WM_QUIT {
                    PostQuitMessage(msg.wParam.0 as i32);
                }
                let _ = DestroyWindow(dialog);
                return None;
            }
            if !IsDialogMessageW(dialog, &msg).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

fn finish(dialog: HWND, accepted: bool) {
    OPEN.with(|cell| {
        let mut open = cell.borrow_mut();
        if let Some((edit, answer)) = open.as_mut() {
            *answer = Some(accepted.then(|| window_text(*edit)));
        }
    });
    // SAFETY: destroying our own popup.
    unsafe {
        let _ = DestroyWindow(dialog);
    }
}

fn window_text(hwnd: HWND) -> String {
    // SAFETY: reads the control text into a buffer sized from its length.
    unsafe {
        let length = GetWindowTextLengthW(hwnd);
        let mut buffer = vec![0u16; (length + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..copied as usize])
    }
}

unsafe extern "system" fn prompt_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_COMMAND => {
            let id = (wparam.0 & 0xFFFF) as i32;
            if id == IDOK.0 || id == IDCANCEL.0 {
                finish(hwnd, id == IDOK.0);
                return LRESULT(0);
            }
        }
        WM_CLOSE => {
            finish(hwnd, false);
            return LRESULT(0);
        }
        _ => {}
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

pub fn parameter(name: &str) -> Option<String> {
    input("Start Program", &format!("{name}:"), "")
}

pub fn size(current: Size) -> Option<Size> {
    let initial = format!("{} x {}", current.width, current.height);
    input("Custom Size", "Width x Height:", &initial).and_then(|s| parse_size(&s))
}

pub fn position(current: Point) -> Option<Point> {
    let initial = format!("{}, {}", current.x, current.y);
    input("Custom Position", "Left, Top:", &initial).and_then(|s| parse_position(&s))
}

pub fn transparency(current: u8) -> Option<u8> {
    input("Custom Transparency", "Transparency (0-100%):", &current.to_string())
        .and_then(|s| parse_percent(&s))
}

fn parse_pair(text: &str, separators: &[char]) -> Option<(i32, i32)> {
    let mut parts = text.split(separators).map(str::trim).filter(|p| !p.is_empty());
    let first = parts.next()?.parse().ok()?;
    let second = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((first, second))
}

fn parse_size(text: &str) -> Option<Size> {
    parse_pair(text, &['x', 'X', ',', ' '])
        .filter(|(w, h)| *w > 0 && *h > 0)
        .map(|(w, h)| Size::new(w, h))
}

fn parse_position(text: &str) -> Option<Point> {
    parse_pair(text, &[',', ';', ' ']).map(|(x, y)| Point::new(x, y))
}

fn parse_percent(text: &str) -> Option<u8> {
    text.trim().trim_end_matches('%').trim().parse().ok().filter(|p| *p <= 100)
}

/// Asks for a file to write a screenshot to. `None` means cancelled.
pub fn save_path(suggested: &str) -> Option<PathBuf> {
    let filter: Vec<u16> = SAVE_FILTER.encode_utf16().collect();
    let mut file = vec![0u16; SAVE_PATH_LEN];
    for (slot, unit) in file.iter_mut().zip(suggested.encode_utf16().take(SAVE_PATH_LEN - 1)) {
        *slot = unit;
    }
    let mut dialog = OPENFILENAMEW {
        lStructSize: size_of::<OPENFILENAMEW>() as u32,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(file.as_mut_ptr()),
        nMaxFile: file.len() as u32,
        lpstrDefExt: w!("png"),
        lpstrTitle: w!("Save Screenshot"),
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST | OFN_NOCHANGEDIR,
        ..Default::default()
    };
    // SAFETY: both buffers referenced by `dialog` outlive the modal call.
    if !unsafe { GetSaveFileNameW(&mut dialog) }.as_bool() {
        return None;
    }
    let len = file.iter().position(|c| *c == 0).unwrap_or(file.len());
    (len > 0).then(|| PathBuf::from(String::from_utf16_lossy(&file[..len])))
}

fn message_box(title: &str, text: &str, icon: MESSAGEBOX_STYLE) {
    // SAFETY: both strings outlive the modal call.
    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(text),
            &HSTRING::from(title),
            MB_OK | icon | MB_TOPMOST | MB_SETFOREGROUND,
        );
    }
}

pub fn notice(title: &str, text: &str) {
    message_box(title, text, MB_ICONINFORMATION);
}

pub fn error(title: &str, text: &str) {
    message_box(title, text, MB_ICONERROR);
}
