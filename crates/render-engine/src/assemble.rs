//! Chunk assembly.
//!
//! The uploader stores every track as numbered fragments (`chunk.0000`,
//! `chunk.0001`, ...). The zero padding makes name order equal index order,
//! so assembly is a plain concatenation in sorted name order.

use std::path::{Path, PathBuf};

use pipcast_common::error::{PipcastError, PipcastResult};
use pipcast_recording_model::tracks::{assembled_path, is_chunk_file};
use tokio::io::AsyncWriteExt;

/// List the chunk files of a track in assembly order.
pub async fn list_chunks(track_dir: &Path) -> PipcastResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(track_dir)
        .await
        .map_err(|e| PipcastError::assembly(track_dir, format!("cannot list chunks: {e}")))?;

    let mut chunks = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PipcastError::assembly(track_dir, format!("cannot list chunks: {e}")))?
    {
        let is_chunk = entry.file_name().to_str().is_some_and(is_chunk_file);
        if is_chunk && entry.file_type().await?.is_file() {
            chunks.push(entry.path());
        }
    }

    chunks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(chunks)
}

/// Number of chunk files in a track directory.
pub async fn count_chunks(track_dir: &Path) -> PipcastResult<usize> {
    Ok(list_chunks(track_dir).await?.len())
}

/// Concatenate all chunks of `track_dir` into `target`.
///
/// Returns the number of bytes written. A directory without chunks yields
/// an empty file. Chunks are left in place.
pub async fn assemble_chunks(track_dir: &Path, target: &Path) -> PipcastResult<u64> {
    let chunks = list_chunks(track_dir).await?;
    if chunks.is_empty() {
        tracing::warn!(track = %track_dir.display(), "Track has no chunks, assembling empty file");
    }

    let mut dest = tokio::fs::File::create(target).await.map_err(|e| {
        PipcastError::assembly(track_dir, format!("cannot create {}: {e}", target.display()))
    })?;

    let mut total = 0u64;
    for chunk in &chunks {
        let mut src = tokio::fs::File::open(chunk).await.map_err(|e| {
            PipcastError::assembly(track_dir, format!("cannot open {}: {e}", chunk.display()))
        })?;
        total += tokio::io::copy(&mut src, &mut dest).await.map_err(|e| {
            PipcastError::assembly(track_dir, format!("cannot copy {}: {e}", chunk.display()))
        })?;
    }

    dest.flush().await.map_err(|e| {
        PipcastError::assembly(track_dir, format!("cannot write {}: {e}", target.display()))
    })?;

    tracing::debug!(
        track = %track_dir.display(),
        chunks = chunks.len(),
        bytes = total,
        "Assembled track"
    );
    Ok(total)
}

/// Intermediate track files owned by one postprocessing job.
///
/// Every file assembled through this value is removed when it is dropped,
/// whichever way the job ends.
///
/// Removal is synchronous and runs on whichever thread drops the guard.
#[derive(Debug)]
pub struct AssembledTracks {
    container: String,
    files: Vec<PathBuf>,
}

impl AssembledTracks {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            files: Vec::new(),
        }
    }

    /// Assemble `track_dir` into `full.<container>` and take ownership of it.
    ///
    /// The target is registered before writing starts, so a partially
    /// written file is removed as well.
    pub async fn assemble(&mut self, track_dir: &Path) -> PipcastResult<PathBuf> {
        let target = assembled_path(track_dir, &self.container);
        self.files.push(target.clone());
        assemble_chunks(track_dir, &target).await?;
        Ok(target)
    }

    /// Files registered so far, in assembly order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Drop for AssembledTracks {
    fn drop(&mut self) {
        for path in self.files.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed intermediate file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate file")
                }
            }
        }
    }
}
