use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};

/// Declares this process as per-monitor DPI aware (V2) so window
/// rectangles and monitor work areas come back in physical pixels.
///
/// Call once at startup, before the host window exists.
pub fn enable_dpi_awareness() {
    // SAFETY: failure (already set via manifest) is harmless.
    if unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }.is_err() {
        tracing::debug!("DPI awareness already set");
    }
}
