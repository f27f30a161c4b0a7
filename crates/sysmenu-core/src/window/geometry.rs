//! Pure window geometry: alignment, preset sizing and monitor moves.

use crate::config::Sizer;
use crate::menu_id::Alignment;
use crate::rect::{Margins, Point, Rect, Size};

/// Position of `window` aligned inside `work_area`.
pub fn aligned_position(window: Rect, work_area: Rect, alignment: Alignment) -> Point {
    let left = work_area.x;
    let center = work_area.x + (work_area.width - window.width) / 2;
    let right = work_area.right() - window.width;
    let top = work_area.y;
    let middle = work_area.y + (work_area.height - window.height) / 2;
    let bottom = work_area.bottom() - window.height;

    let (x, y) = match alignment {
        Alignment::TopLeft => (left, top),
        Alignment::TopCenter => (center, top),
        Alignment::TopRight => (right, top),
        Alignment::MiddleLeft => (left, middle),
        Alignment::MiddleCenter => (center, middle),
        Alignment::MiddleRight => (right, middle),
        Alignment::BottomLeft => (left, bottom),
        Alignment::BottomCenter => (center, bottom),
        Alignment::BottomRight => (right, bottom),
        Alignment::CenterHorizontally => (center, window.y),
        Alignment::CenterVertically => (window.x, middle),
    };
    Point::new(x, y)
}

/// Frame measurements needed to translate a requested size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameMetrics {
    pub window: Rect,
    pub client: Size,
    pub margins: Margins,
}

/// Window size that realizes `requested` under the given sizer mode.
pub fn sized(sizer: Sizer, requested: Size, frame: &FrameMetrics) -> Size {
    match sizer {
        Sizer::WindowWithMargins => requested,
        Sizer::WindowWithoutMargins => Size::new(
            requested.width + frame.margins.left + frame.margins.right,
            requested.height + frame.margins.top + frame.margins.bottom,
        ),
        Sizer::ClientArea => Size::new(
            requested.width + (frame.window.width - frame.client.width),
            requested.height + (frame.window.height - frame.client.height),
        ),
    }
}

/// Position on the `to` work area that keeps the window's offset from
/// the `from` work area, pulled back inside when it would overflow.
pub fn moved_to_monitor(window: Rect, from: Rect, to: Rect) -> Point {
    let x = to.x + (window.x - from.x);
    let y = to.y + (window.y - from.y);
    let max_x = (to.right() - window.width).max(to.x);
    let max_y = (to.bottom() - window.height).max(to.y);
    Point::new(x.clamp(to.x, max_x), y.clamp(to.y, max_y))
}

/// The rolled-up rectangle: only the caption remains visible.
pub fn rolled_up(window: Rect, caption_height: i32) -> Rect {
    Rect::new(window.x, window.y, window.width, caption_height.max(1))
}
