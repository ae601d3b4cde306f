//! Pipcast Recording Model
//!
//! Defines the data contracts for postprocessing a recording:
//! - **Geometry:** Crop rectangles and probed video properties, in source
//!   pixel coordinates
//! - **Tracks:** The on-disk layout of a chunked multi-track recording
//! - **Outcome:** The result a postprocessing job reports to its caller
//!
//! All values are plain immutable records created fresh per job.

pub mod geometry;
pub mod outcome;
pub mod tracks;

pub use geometry::*;
pub use outcome::*;
pub use tracks::*;
