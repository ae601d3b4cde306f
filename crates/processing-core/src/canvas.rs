//! Output canvas selection.

use pipcast_recording_model::Rectangle;
use serde::Serialize;

/// Fixed output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether content of the given size fits without downscaling.
    pub fn contains(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// Standard output geometries, smallest first.
pub const CANVAS_CANDIDATES: [Canvas; 3] = [
    Canvas::new(1280, 720),  // 16:9
    Canvas::new(1280, 800),  // 16:10
    Canvas::new(1920, 1080), // 16:9
];

/// Pick the smallest standard canvas that holds `content` unscaled.
///
/// Content larger than every candidate gets the largest one and is
/// downscaled by the filter graph.
pub fn pick_target_geometry(content: &Rectangle) -> Canvas {
    CANVAS_CANDIDATES
        .iter()
        .copied()
        .find(|canvas| canvas.contains(content.width, content.height))
        .unwrap_or(CANVAS_CANDIDATES[CANVAS_CANDIDATES.len() - 1])
}
