//! Integer geometry shared by the rasterizers.

/// A 2D point with integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Inclusive clip bounds.
///
/// A clip rectangle is always contained in its surface. When `right < left`
/// or `bottom < top` the clip is empty and nothing can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipRect {
    /// Leftmost drawable column.
    pub left: i32,
    /// Topmost drawable row.
    pub top: i32,
    /// Rightmost drawable column.
    pub right: i32,
    /// Bottom drawable row.
    pub bottom: i32,
}

impl ClipRect {
    /// Full bounds of a `width` x `height` surface.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i32 - 1,
            bottom: height as i32 - 1,
        }
    }

    /// Intersect `rect` with the bounds of a `width` x `height` surface.
    #[must_use]
    pub fn from_rect(rect: Rect, width: u32, height: u32) -> Self {
        let full = Self::full(width, height);
        let right = i64::from(rect.x) + i64::from(rect.width) - 1;
        let bottom = i64::from(rect.y) + i64::from(rect.height) - 1;
        let clip = Self {
            left: rect.x.max(full.left),
            top: rect.y.max(full.top),
            right: right.min(i64::from(full.right)) as i32,
            bottom: bottom.min(i64::from(full.bottom)) as i32,
        };
        if clip.is_empty() {
            Self::EMPTY
        } else {
            clip
        }
    }

    /// A clip that rejects everything.
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    /// True when no pixel is drawable.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// True when `(x, y)` lies inside the clip.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// True when the inclusive box `[x1, x2] x [y1, y2]` (any corner order) misses the clip.
    #[must_use]
    pub fn rejects_box(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        let (xl, xr) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (yt, yb) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        xr < self.left || xl > self.right || yb < self.top || yt > self.bottom
    }
}
