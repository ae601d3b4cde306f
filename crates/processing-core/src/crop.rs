//! Crop detection aggregation and crop resolution.
//!
//! ffmpeg's `cropdetect` reports a suggested content box for every sampled
//! frame. Samples disagree (fades, mostly-black slides, encoder noise), so
//! they are first merged into the most permissive box, then checked for
//! whether cropping to it is worth it at all.

use pipcast_recording_model::Rectangle;

/// Share of a frame dimension, in percent, that must be trimmed before a
/// crop is applied.
pub const MIN_CROP_PERCENT: u64 = 1;

/// One `cropdetect` suggestion with inclusive pixel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSample {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Merge crop samples into the smallest box containing all of them.
///
/// Without samples the full frame is used. Bounds are clamped to the frame,
/// and a merged box that ends up empty also falls back to the full frame.
pub fn merge_crop_samples(width: u32, height: u32, samples: &[CropSample]) -> Rectangle {
    let full = Rectangle::full_frame(width, height);
    let max_x = width.saturating_sub(1);
    let max_y = height.saturating_sub(1);

    let left = samples.iter().map(|s| s.left).min().unwrap_or(0);
    let top = samples.iter().map(|s| s.top).min().unwrap_or(0);
    let right = samples.iter().map(|s| s.right).max().unwrap_or(max_x);
    let bottom = samples.iter().map(|s| s.bottom).max().unwrap_or(max_y);

    match Rectangle::from_bounds(left, top, right.min(max_x), bottom.min(max_y)) {
        Some(rect) => rect,
        None => {
            tracing::warn!(
                left,
                top,
                right,
                bottom,
                width,
                height,
                "Crop samples describe an empty area, using full frame"
            );
            full
        }
    }
}

/// Determine the effective crop area for a stream.
///
/// If less than [`MIN_CROP_PERCENT`] of the frame would be trimmed on both
/// axes, the full frame is returned instead of `raw_crop`.
pub fn determine_crop_area(stream_width: u32, stream_height: u32, raw_crop: Rectangle) -> Rectangle {
    let slack_width = u64::from(stream_width.saturating_sub(raw_crop.width));
    let slack_height = u64::from(stream_height.saturating_sub(raw_crop.height));

    if slack_width * 100 <= u64::from(stream_width) * MIN_CROP_PERCENT
        && slack_height * 100 <= u64::from(stream_height) * MIN_CROP_PERCENT
    {
        if raw_crop != Rectangle::full_frame(stream_width, stream_height) {
            tracing::debug!(
                slack_width,
                slack_height,
                "Detected crop is insignificant, keeping full frame"
            );
        }
        return Rectangle::full_frame(stream_width, stream_height);
    }

    raw_crop
}
