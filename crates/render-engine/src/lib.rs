//! Pipcast Render Engine
//!
//! Turns a chunked multi-track recording into one picture-in-picture
//! presentation by driving ffprobe and ffmpeg.
//!
//! # Pipeline Architecture
//!
//! ```text
//! stream/chunk.* ──► full.webm ──► ffprobe cropdetect ──► crop + canvas
//!                        │                                     │
//!                        │                              filter graph
//! overlay/chunk.* ─► full.webm ───────────┐                    │
//! audio-*/chunk.* ─► full.webm ───────────┼──── ffmpeg ◄───────┘
//!                        │                │
//!                        ▼                ▼
//!                   (removed)     presentation.webm
//! ```

pub mod assemble;
pub mod layout;
pub mod postprocess;
pub mod probe;
pub mod render;
pub mod runner;

pub use assemble::{assemble_chunks, count_chunks, AssembledTracks};
pub use layout::discover_tracks;
pub use postprocess::{PostprocessOptions, Postprocessor};
pub use probe::{parse_probe_output, probe_command, video_properties, ProbedStream};
pub use render::{render_command, RenderInputs};
pub use runner::{tool_available, SystemToolRunner, ToolInvocation, ToolRunner};
