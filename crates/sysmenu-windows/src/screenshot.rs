//! Window capture and child-control text.
//!
//! `PrintWindow` draws the window into a memory bitmap, so overlapping
//! windows never end up in the picture.

use std::ffi::c_void;

use sysmenu_core::Screenshot;
use tracing::debug;
use windows::Win32::Foundation::{HWND, LPARAM, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, CreateCompatibleBitmap, CreateCompatibleDC, DIB_RGB_COLORS, DeleteDC,
    DeleteObject, GetDC, GetDIBits, ReleaseDC, SelectObject,
};
use windows::Win32::Storage::Xps::{PRINT_WINDOW_FLAGS, PrintWindow};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumChildWindows, GetWindowRect, SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_GETTEXT, WM_GETTEXTLENGTH,
};
use windows::core::BOOL;

/// Also renders DirectComposition content.
const PW_RENDERFULLCONTENT: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(2);

/// Per-control limit for text queries (ms).
const TEXT_TIMEOUT_MS: u32 = 200;

/// Renders `hwnd` at its current window size.
pub fn capture(hwnd: HWND) -> Option<Screenshot> {
    let mut rect = RECT::default();
    // SAFETY: writes into a local.
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
    let width = rect.right - rect.left;
    let height = rect.bottom - rect.top;
    if width <= 0 || height <= 0 {
        return None;
    }

    // SAFETY: every GDI object created here is selected out and released
    // before returning.
    unsafe {
        let window_dc = GetDC(Some(hwnd));
        if window_dc.is_invalid() {
            return None;
        }
        let memory_dc = CreateCompatibleDC(Some(window_dc));
        let bitmap = CreateCompatibleBitmap(window_dc, width, height);
        if memory_dc.is_invalid() || bitmap.is_invalid() {
            if !bitmap.is_invalid() {
                let _ = DeleteObject(bitmap.into());
            }
            if !memory_dc.is_invalid() {
                let _ = DeleteDC(memory_dc);
            }
            ReleaseDC(Some(hwnd), window_dc);
            return None;
        }
        let previous = SelectObject(memory_dc, bitmap.into());

        if !PrintWindow(hwnd, memory_dc, PW_RENDERFULLCONTENT).as_bool() {
            debug!("full-content print of 0x{:X} failed, retrying", hwnd.0 as usize);
            let _ = PrintWindow(hwnd, memory_dc, PRINT_WINDOW_FLAGS(0));
        }

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // Negative height asks for top-down rows.
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 24,
                biCompression: BI_RGB.0 as u32,
                ..Default::default()
            },
            ..Default::default()
        };
        let stride = ((width as usize * 3).div_ceil(4)) * 4;
        let mut rows = vec![0u8; stride * height as usize];
        let lines = GetDIBits(
            memory_dc,
            bitmap,
            0,
            height as u32,
            Some(rows.as_mut_ptr() as *mut c_void),
            &mut info,
            DIB_RGB_COLORS,
        );

        SelectObject(memory_dc, previous);
        let _ = DeleteObject(bitmap.into());
        let _ = DeleteDC(memory_dc);
        ReleaseDC(Some(hwnd), window_dc);

        if lines == 0 {
            return None;
        }
        Screenshot::from_bgr_rows(width as u32, height as u32, &rows)
    }
}

/// Text of every child control that has some, in z-order, one per line.
///
/// Each control gets a short timeout so a hung window can't stall the host.
pub fn child_text(hwnd: HWND) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    // SAFETY: the callback receives a pointer to `lines`, which outlives
    // the synchronous enumeration.
    unsafe {
        let _ = EnumChildWindows(Some(hwnd), Some(collect_text), LPARAM(&mut lines as *mut _ as isize));
    }
    (!lines.is_empty()).then(|| lines.join("\r\n"))
}

unsafe extern "system" fn collect_text(child: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the vector passed by child_text().
    let lines = unsafe { &mut *(lparam.0 as *mut Vec<String>) };
    if let Some(text) = control_text(child).filter(|t| !t.trim().is_empty()) {
        lines.push(text);
    }
    BOOL(1)
}

fn control_text(hwnd: HWND) -> Option<String> {
    let mut length = 0usize;
    // SAFETY: WM_GETTEXTLENGTH and WM_GETTEXT write only to the result
    // slot and the buffer sized from the reported length.
    unsafe {
        let sent = SendMessageTimeoutW(
            hwnd,
            WM_GETTEXTLENGTH,
            WPARAM(0),
            LPARAM(0),
            SMTO_ABORTIFHUNG,
            TEXT_TIMEOUT_MS,
            Some(&mut length as *mut usize),
        );
        if sent.0 == 0 || length == 0 {
            return None;
        }
        let mut buffer = vec![0u16; length + 1];
        let mut copied = 0usize;
        let sent = SendMessageTimeoutW(
            hwnd,
            WM_GETTEXT,
            WPARAM(buffer.len()),
            LPARAM(buffer.as_mut_ptr() as isize),
            SMTO_ABORTIFHUNG,
            TEXT_TIMEOUT_MS,
            Some(&mut copied as *mut usize),
        );
        if sent.0 == 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..copied.min(length)]))
    }
}
