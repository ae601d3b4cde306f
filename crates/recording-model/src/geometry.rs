//! Geometry types for crop decisions.
//!
//! Unlike normalized viewports, everything here is in source pixel
//! coordinates: `(0, 0)` is the top-left pixel of the captured frame.

use serde::{Deserialize, Serialize};

/// A crop window within a video frame.
///
/// `left`/`top` address the first pixel inside the window, so the window
/// covers columns `left..left + width` and rows `top..top + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// X coordinate of the leftmost column.
    pub left: u32,
    /// Y coordinate of the topmost row.
    pub top: u32,
}

impl Rectangle {
    pub const fn new(width: u32, height: u32, left: u32, top: u32) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// The whole frame, anchored at the origin.
    pub const fn full_frame(width: u32, height: u32) -> Self {
        Self::new(width, height, 0, 0)
    }

    /// Build a rectangle from inclusive pixel bounds.
    ///
    /// Returns `None` if the bounds are inverted, i.e. the rectangle
    /// would be empty.
    pub fn from_bounds(left: u32, top: u32, right: u32, bottom: u32) -> Option<Self> {
        if right < left || bottom < top {
            return None;
        }
        Some(Self::new(right - left + 1, bottom - top + 1, left, top))
    }

    /// X coordinate of the rightmost column (inclusive).
    pub fn right(&self) -> u32 {
        self.left + self.width.saturating_sub(1)
    }

    /// Y coordinate of the bottom row (inclusive).
    pub fn bottom(&self) -> u32 {
        self.top + self.height.saturating_sub(1)
    }

    /// Whether this rectangle lies entirely inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.left) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.top) + u64::from(self.height) <= u64::from(height)
    }
}

/// Properties of a video stream that postprocessing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoProperties {
    /// Full frame width.
    pub width: u32,
    /// Full frame height.
    pub height: u32,
    /// Effective crop area, already resolved.
    pub crop: Rectangle,
}

impl VideoProperties {
    pub fn new(width: u32, height: u32, crop: Rectangle) -> Self {
        debug_assert!(crop.fits_within(width, height));
        Self {
            width,
            height,
            crop,
        }
    }

    /// Properties for an uncropped stream.
    pub fn uncropped(width: u32, height: u32) -> Self {
        Self::new(width, height, Rectangle::full_frame(width, height))
    }

    /// Whether the crop area is smaller than the full frame.
    pub fn needs_cropping(&self) -> bool {
        self.width > self.crop.width || self.height > self.crop.height
    }
}
