//! Axis-aligned rectangles in source pixel coordinates.

/// Rectangle `(x, y, width, height)` with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle by `padding` on every side, clamped to an image of
    /// `image_width` x `image_height`.
    ///
    /// The origin saturates at 0. Width and height are then limited to what
    /// is left of the image past the new origin.
    pub fn padded(&self, padding: u32, image_width: u32, image_height: u32) -> Self {
        let x = self.x.saturating_sub(padding);
        let y = self.y.saturating_sub(padding);
        let width = self
            .width
            .saturating_add(padding.saturating_mul(2))
            .min(image_width.saturating_sub(x));
        let height = self
            .height
            .saturating_add(padding.saturating_mul(2))
            .min(image_height.saturating_sub(y));

        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
