use std::sync::OnceLock;
use std::sync::atomic::{AtomicIsize, AtomicU32};

use windows::Win32::Foundation::INVALID_HANDLE_VALUE;
use windows::Win32::System::Memory::{CreateFileMappingW, FILE_MAP_ALL_ACCESS, MapViewOfFile, PAGE_READWRITE};
use windows::core::w;

use crate::NATIVE_KINDS;

/// State visible to every process the library is mapped into.
#[repr(C)]
pub struct Shared {
    /// Host window per hook kind, zero when none.
    pub hosts: [AtomicIsize; NATIVE_KINDS],
    /// Menu item whose check mark enables drag-by-mouse.
    pub drag_by_mouse: AtomicU32,
}

/// Address of the mapped view, zero when mapping failed.
static VIEW: OnceLock<usize> = OnceLock::new();

/// Returns the shared section, creating it on first use in this process.
///
/// Processes at a lower integrity level may be unable to open it; their
/// hooks then stay silent.
pub fn get() -> Option<&'static Shared> {
    let view = *VIEW.get_or_init(map);
    // SAFETY: a non-zero view is a live mapping of at least
    // `size_of::<Shared>()` zero-initialised bytes that is never unmapped,
    // and every field is an atomic.
    (view != 0).then(|| unsafe { &*(view as *const Shared) })
}

fn map() -> usize {
    let name = if cfg!(target_pointer_width = "64") {
        w!("Local\\SysmenuHook64")
    } else {
        w!("Local\\SysmenuHook32")
    };
    let size = std::mem::size_of::<Shared>() as u32;

    // SAFETY: a pagefile-backed mapping; the handle is intentionally kept
    // open for the life of the process so the section outlives the host.
    unsafe {
        let Ok(mapping) = CreateFileMappingW(INVALID_HANDLE_VALUE, None, PAGE_READWRITE, 0, size, name) else {
            return 0;
        };
        let view = MapViewOfFile(mapping, FILE_MAP_ALL_ACCESS, 0, 0, size as usize);
        view.Value as usize
    }
}
