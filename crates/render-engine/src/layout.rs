//! Track discovery inside a recording directory.

use std::path::Path;

use pipcast_common::error::PipcastResult;
use pipcast_recording_model::tracks::{is_audio_track_dir, TrackSet, MAIN_TRACK_DIR, OVERLAY_TRACK_DIR};

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Resolve the tracks of a recording.
///
/// Returns `None` if the recording or its main track directory does not
/// exist. Audio tracks are ordered by directory name.
pub async fn discover_tracks(recording_path: &Path) -> PipcastResult<Option<TrackSet>> {
    if !is_dir(recording_path).await {
        tracing::warn!(
            recording = %recording_path.display(),
            "Postprocessing requested for non-existent recording"
        );
        return Ok(None);
    }

    let main = recording_path.join(MAIN_TRACK_DIR);
    if !is_dir(&main).await {
        tracing::info!(
            recording = %recording_path.display(),
            "Recording has no main display stream, nothing to do"
        );
        return Ok(None);
    }

    let overlay = recording_path.join(OVERLAY_TRACK_DIR);
    let overlay = if is_dir(&overlay).await {
        Some(overlay)
    } else {
        None
    };

    let mut audio = Vec::new();
    let mut entries = tokio::fs::read_dir(recording_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let is_audio = entry.file_name().to_str().is_some_and(is_audio_track_dir);
        if is_audio && is_dir(&entry.path()).await {
            audio.push(entry.path());
        }
    }
    audio.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(
        recording = %recording_path.display(),
        overlay = overlay.is_some(),
        audio_tracks = audio.len(),
        "Discovered tracks"
    );

    Ok(Some(TrackSet {
        main,
        overlay,
        audio,
    }))
}
