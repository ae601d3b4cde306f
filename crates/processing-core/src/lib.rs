//! Pipcast Processing Core — Geometry and Filter Decisions
//!
//! Turns probed stream properties into rendering decisions:
//! - **Crop:** Merge noisy `cropdetect` samples and suppress insignificant crops
//! - **Canvas:** Pick a standard output resolution for the content
//! - **Filter Graph:** Emit the exact `-filter_complex` text for ffmpeg
//!
//! This crate is pure computation: no I/O, no process spawning.
//! All inputs are data; all outputs are data.

pub mod canvas;
pub mod crop;
pub mod filter_graph;

pub use canvas::{pick_target_geometry, Canvas, CANVAS_CANDIDATES};
pub use crop::{determine_crop_area, merge_crop_samples, CropSample};
pub use filter_graph::{generate_filter_graph, generate_overlay_scale, OUTPUT_FPS};
