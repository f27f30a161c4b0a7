use std::mem;

use sysmenu_core::{Margins, Point, Rect};
use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::WindowsAndMessaging::{GetClientRect, GetWindowRect};

pub fn to_rect(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
}

/// Outer bounds, including the invisible resize borders.
pub fn window_rect(hwnd: HWND) -> Option<Rect> {
    let mut rc = RECT::default();
    // SAFETY: GetWindowRect only writes into our RECT.
    unsafe { GetWindowRect(hwnd, &mut rc).ok()? };
    Some(to_rect(rc))
}

/// Returns the visible bounds of a window using DWM extended frame bounds.
///
/// Falls back to `GetWindowRect` if DWM is unavailable.
pub fn visible_rect(hwnd: HWND) -> Option<RECT> {
    let mut frame = RECT::default();
    let result = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut _,
            mem::size_of::<RECT>() as u32,
        )
    };

    if result.is_err() {
        unsafe { GetWindowRect(hwnd, &mut frame).ok()? };
    }

    Some(frame)
}

/// The invisible border widths around a window.
///
/// Compares `GetWindowRect` with `DWMWA_EXTENDED_FRAME_BOUNDS`; typical
/// values on Windows 10/11 are 7px left/right/bottom and 0px top.
pub fn margins(hwnd: HWND) -> Margins {
    let mut outer = RECT::default();
    if unsafe { GetWindowRect(hwnd, &mut outer) }.is_err() {
        return Margins::default();
    }
    let Some(visible) = visible_rect(hwnd) else {
        return Margins::default();
    };

    Margins {
        left: visible.left - outer.left,
        top: visible.top - outer.top,
        right: outer.right - visible.right,
        bottom: outer.bottom - visible.bottom,
    }
}

/// Client area origin on screen and its size.
pub fn client_rect(hwnd: HWND) -> Option<Rect> {
    let mut rc = RECT::default();
    let mut origin = POINT::default();
    // SAFETY: both calls write into locals only.
    unsafe {
        GetClientRect(hwnd, &mut rc).ok()?;
        if !ClientToScreen(hwnd, &mut origin).as_bool() {
            return None;
        }
    }
    Some(Rect::from_parts(
        Point::new(origin.x, origin.y),
        to_rect(rc).size(),
    ))
}
