pub mod check;
pub mod inspect;
pub mod probe;
pub mod render;

use std::path::{Path, PathBuf};

/// Resolve a recording argument.
///
/// Paths that exist, or are absolute, are used as given. Anything else is
/// taken as a recording name inside `recordings_dir`.
pub fn resolve_recording(recording: &Path, recordings_dir: &Path) -> PathBuf {
    if recording.is_absolute() || recording.exists() {
        recording.to_path_buf()
    } else {
        recordings_dir.join(recording)
    }
}
