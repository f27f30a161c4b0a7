use serde::{Deserialize, Serialize};

/// A rectangle representing a window's position and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// A screen coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decodes a point packed into the low and high words of an `LPARAM`.
    ///
    /// Each coordinate is a signed 16-bit value so positions on monitors
    /// left of or above the primary survive the round trip.
    pub fn from_packed(lparam: isize) -> Self {
        let x = (lparam & 0xFFFF) as u16 as i16;
        let y = ((lparam >> 16) & 0xFFFF) as u16 as i16;
        Self::new(i32::from(x), i32::from(y))
    }

    /// Packs the point into an `LPARAM` (inverse of [`Point::from_packed`]).
    pub fn to_packed(self) -> isize {
        let x = (self.x as i16 as u16) as isize;
        let y = (self.y as i16 as u16) as isize;
        x | (y << 16)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Invisible frame margins around a window (drop shadow borders).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_point_keeps_negative_coordinates() {
        // Arrange
        let point = Point::new(-1280, 345);

        // Act
        let decoded = Point::from_packed(point.to_packed());

        // Assert
        assert_eq!(decoded, point);
    }

    #[test]
    fn contains_excludes_right_and_bottom_edges() {
        // Arrange
        let rect = Rect::new(0, 0, 100, 50);

        // Assert
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(99, 49)));
        assert!(!rect.contains(Point::new(100, 10)));
        assert!(!rect.contains(Point::new(10, 50)));
    }
}
