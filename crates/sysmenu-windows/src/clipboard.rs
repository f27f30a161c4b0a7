use sysmenu_core::Screenshot;
use windows::Win32::Foundation::{HANDLE, HWND};
use windows::Win32::System::DataExchange::{CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData};
use windows::Win32::System::Memory::{GMEM_MOVEABLE, GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock};
use windows::Win32::System::Ole::{CF_DIB, CF_UNICODETEXT};

/// Replaces the clipboard with `text`, or empties it for `None`.
pub fn set_text(owner: HWND, text: Option<&str>) -> bool {
    let bytes = text.map(|text| {
        text.encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect::<Vec<u8>>()
    });
    replace(owner, bytes.map(|b| (u32::from(CF_UNICODETEXT.0), b)))
}

/// Replaces the clipboard with a device-independent bitmap.
pub fn set_image(owner: HWND, shot: &Screenshot) -> bool {
    replace(owner, Some((u32::from(CF_DIB.0), shot.to_dib())))
}

fn replace(owner: HWND, data: Option<(u32, Vec<u8>)>) -> bool {
    // SAFETY: the clipboard is opened and closed within this call, and
    // ownership of the allocation passes to the system on success.
    unsafe {
        if OpenClipboard(Some(owner)).is_err() {
            return false;
        }
        let mut ok = EmptyClipboard().is_ok();
        if ok && let Some((format, bytes)) = data {
            ok = put(format, &bytes);
        }
        let _ = CloseClipboard();
        ok
    }
}

unsafe fn put(format: u32, bytes: &[u8]) -> bool {
    unsafe {
        let Ok(memory) = GlobalAlloc(GMEM_MOVEABLE, bytes.len()) else {
            return false;
        };
        let target = GlobalLock(memory) as *mut u8;
        if target.is_null() {
            let _ = GlobalFree(Some(memory));
            return false;
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), target, bytes.len());
        let _ = GlobalUnlock(memory);

        if SetClipboardData(format, Some(HANDLE(memory.0))).is_err() {
            let _ = GlobalFree(Some(memory));
            return false;
        }
    }
    true
}
