//! Recording directory layout.
//!
//! A recording is a directory written by the uploader:
//!
//! ```text
//! <recording>/
//!   stream/      chunk.0000 chunk.0001 ...   main video (+ audio), required
//!   overlay/     chunk.0000 ...              camera video, optional
//!   audio-*/     chunk.0000 ...              extra audio tracks, zero or more
//!   presentation.<container>                 written on success
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Subdirectory holding the main (slides/display) track.
pub const MAIN_TRACK_DIR: &str = "stream";

/// Subdirectory holding the picture-in-picture camera track.
pub const OVERLAY_TRACK_DIR: &str = "overlay";

/// Name prefix of extra audio track subdirectories.
pub const AUDIO_TRACK_PREFIX: &str = "audio-";

/// Name prefix of chunk files; the suffix is a zero-padded index.
pub const CHUNK_PREFIX: &str = "chunk.";

/// File stem of an assembled track inside its track directory.
pub const ASSEMBLED_STEM: &str = "full";

/// File stem of the rendered output inside the recording directory.
pub const OUTPUT_STEM: &str = "presentation";

/// Whether a directory entry name denotes an extra audio track.
pub fn is_audio_track_dir(name: &str) -> bool {
    name.starts_with(AUDIO_TRACK_PREFIX)
}

/// Whether a file name denotes an upload chunk.
pub fn is_chunk_file(name: &str) -> bool {
    name.starts_with(CHUNK_PREFIX)
}

/// Path of the assembled track file for `track_dir`.
pub fn assembled_path(track_dir: &Path, container: &str) -> PathBuf {
    track_dir.join(format!("{ASSEMBLED_STEM}.{container}"))
}

/// Path of the rendered presentation for `recording_dir`.
pub fn output_path(recording_dir: &Path, container: &str) -> PathBuf {
    recording_dir.join(format!("{OUTPUT_STEM}.{container}"))
}

/// The track directories of one recording, resolved once per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSet {
    /// Main track directory.
    pub main: PathBuf,
    /// Overlay track directory, if the recording has one.
    pub overlay: Option<PathBuf>,
    /// Extra audio track directories, in render input order.
    pub audio: Vec<PathBuf>,
}

impl TrackSet {
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Number of render inputs this set produces.
    pub fn input_count(&self) -> usize {
        1 + usize::from(self.has_overlay()) + self.audio.len()
    }
}
