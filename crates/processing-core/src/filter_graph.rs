//! ffmpeg `-filter_complex` generation for picture-in-picture output.
//!
//! The main stream is cropped (if worthwhile), scaled into the canvas,
//! padded to the exact canvas size with content held left and vertically
//! centered, then resampled to a fixed frame rate. The overlay is sized to
//! use the bars the main stream leaves free and pinned to the top right.
//!
//! Output is a pure function of its inputs: only integers are formatted,
//! never floats.

use pipcast_recording_model::{Rectangle, VideoProperties};

use crate::canvas::{pick_target_geometry, Canvas};

/// Output frame rate of every render.
pub const OUTPUT_FPS: u32 = 30;

/// Minimum overlay size as a fraction (1/n) of the canvas dimension.
const MIN_OVERLAY_DIVISOR: u32 = 10;

/// Generate a scaling filter for the overlay stream.
///
/// Uses the bars around the main stream when there are any; otherwise the
/// overlay keeps a minimum size so it stays visible.
pub fn generate_overlay_scale(crop: &Rectangle, canvas: Canvas) -> String {
    let outer_width = canvas.width;
    let outer_height = canvas.height;

    // Uncropped streams get scaling_x == scaling_y and take the first branch.
    let scaling_x = f64::from(outer_width) / f64::from(crop.width);
    let scaling_y = f64::from(outer_height) / f64::from(crop.height);

    if scaling_x <= scaling_y {
        // Letterboxed. Main content is vertically centered, so half of the
        // vertical slack is free above it. Width is capped at the canvas.
        let scaled_height = (scaling_x * f64::from(crop.height)).round_ties_even() as i64;
        let slack_height = i64::from(outer_height) - scaled_height;
        let overlay_height = (slack_height / 2).max(i64::from(outer_height / MIN_OVERLAY_DIVISOR));
        format!("scale=-1:{overlay_height},crop=w=min(in_w\\,{outer_width})")
    } else {
        // Pillarboxed. Main content sits on the left, so the whole
        // horizontal slack is free. Height is capped at the canvas.
        let scaled_width = (scaling_y * f64::from(crop.width)).round_ties_even() as i64;
        let slack_width = i64::from(outer_width) - scaled_width;
        let overlay_width = slack_width.max(i64::from(outer_width / MIN_OVERLAY_DIVISOR));
        format!("scale={overlay_width}:-1,crop=h=min(in_h\\,{outer_height})")
    }
}

/// Filter chain for the main stream, without input or output labels.
fn main_chain(stream: &VideoProperties, canvas: Canvas) -> String {
    let mut chain = String::new();

    if stream.needs_cropping() {
        let crop = &stream.crop;
        chain.push_str(&format!(
            "crop={}:{}:{}:{},",
            crop.width, crop.height, crop.left, crop.top
        ));
    }

    // An explicit target size plus pad always yields the exact canvas;
    // scaling with `-1` can come out one pixel too wide and break `pad`.
    chain.push_str(&format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:0:-1,fps={fps}",
        w = canvas.width,
        h = canvas.height,
        fps = OUTPUT_FPS,
    ));

    chain
}

/// Assemble the complete rendering filter graph.
///
/// Input 0 is the main stream; input 1 is the overlay when `has_overlay`.
/// Without an overlay the result is a single unlabeled chain.
pub fn generate_filter_graph(stream: &VideoProperties, has_overlay: bool) -> String {
    let canvas = pick_target_geometry(&stream.crop);
    let mut graph = format!("[0:v]{}", main_chain(stream, canvas));

    if has_overlay {
        graph.push_str(&format!(
            "[main];[1:v]{}[overlay];[main][overlay]overlay=(main_w-overlay_w):0",
            generate_overlay_scale(&stream.crop, canvas)
        ));
    }

    graph
}
