//! Postprocessing jobs.
//!
//! One job turns a chunked recording into a single picture-in-picture
//! presentation. The steps depend on each other's output and run strictly
//! in order: assemble main → probe → build filter graph → assemble the
//! remaining tracks → render. Different recordings share nothing, so jobs
//! can run concurrently on the same [`Postprocessor`].

use std::path::Path;

use pipcast_common::config::AppConfig;
use pipcast_common::error::{PipcastError, PipcastResult};
use pipcast_processing_core::filter_graph::generate_filter_graph;
use pipcast_recording_model::outcome::PostprocessResult;
use pipcast_recording_model::tracks::{output_path, TrackSet};

use crate::assemble::AssembledTracks;
use crate::layout::discover_tracks;
use crate::probe::video_properties;
use crate::render::{render, render_command, RenderInputs};
use crate::runner::ToolRunner;

/// Tools and output format used by a [`Postprocessor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostprocessOptions {
    /// ffmpeg program.
    pub ffmpeg: String,
    /// ffprobe program.
    pub ffprobe: String,
    /// Container extension of assembled tracks and the presentation.
    pub container: String,
}

impl PostprocessOptions {
    /// Reject options that cannot name valid files or programs.
    pub fn validate(&self) -> PipcastResult<()> {
        if self.ffmpeg.trim().is_empty() || self.ffprobe.trim().is_empty() {
            return Err(PipcastError::config("tool program must not be empty"));
        }
        let container = self.container.as_str();
        if container.is_empty() || container.contains(['/', '\\', '.']) {
            return Err(PipcastError::config(format!(
                "invalid output container {container:?}"
            )));
        }
        Ok(())
    }
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PostprocessOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            ffmpeg: config.tools.ffmpeg.clone(),
            ffprobe: config.tools.ffprobe.clone(),
            container: config.output.container.clone(),
        }
    }
}

/// Runs postprocessing jobs with a given tool runner.
#[derive(Debug, Clone)]
pub struct Postprocessor<R> {
    runner: R,
    options: PostprocessOptions,
}

impl<R: ToolRunner> Postprocessor<R> {
    pub fn new(runner: R, options: PostprocessOptions) -> Self {
        Self { runner, options }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Postprocess the recording at `recording_path`.
    ///
    /// Never fails: every error is logged and reported as
    /// [`ResultReason::Failure`](pipcast_recording_model::ResultReason::Failure).
    /// The presentation is written into the recording directory.
    pub async fn postprocess(&self, recording_path: &Path) -> PostprocessResult {
        let tracks = match discover_tracks(recording_path).await {
            Ok(Some(tracks)) => tracks,
            Ok(None) => return PostprocessResult::main_stream_missing(),
            Err(err) => {
                log_error(recording_path, &err);
                return PostprocessResult::failure();
            }
        };

        let output = output_path(recording_path, &self.options.container);
        tracing::info!(recording = %recording_path.display(), "Postprocessing");

        match self.postprocess_tracks(&tracks, &output).await {
            Ok(()) => PostprocessResult::success(output),
            Err(err) => {
                log_error(recording_path, &err);
                PostprocessResult::failure()
            }
        }
    }

    /// Render the overlay track onto the main track, mixing in all audio.
    ///
    /// Every assembled intermediate file is removed before this returns,
    /// on success and on every error path.
    pub async fn postprocess_tracks(&self, tracks: &TrackSet, output: &Path) -> PipcastResult<()> {
        tracing::debug!(
            overlay = tracks.has_overlay(),
            audio_tracks = tracks.audio.len(),
            "Track layout"
        );

        self.options.validate()?;

        let mut assembled = AssembledTracks::new(self.options.container.as_str());

        let main = assembled.assemble(&tracks.main).await?;
        let props = video_properties(&self.runner, &self.options.ffprobe, &main).await?;
        let filter_graph = generate_filter_graph(&props, tracks.has_overlay());

        let overlay = match &tracks.overlay {
            Some(dir) => Some(assembled.assemble(dir).await?),
            None => None,
        };

        let mut audio = Vec::with_capacity(tracks.audio.len());
        for dir in &tracks.audio {
            audio.push(assembled.assemble(dir).await?);
        }

        tracing::debug!(intermediate_files = assembled.files().len(), "Tracks assembled");

        let inputs = RenderInputs {
            main,
            overlay,
            audio,
        };
        let command = render_command(&self.options.ffmpeg, &inputs, &filter_graph, output);
        render(&self.runner, &command, output).await
    }
}

fn log_error(recording_path: &Path, err: &PipcastError) {
    match err {
        PipcastError::ToolFailed {
            program,
            code,
            command,
            stdout,
            stderr,
        } => {
            tracing::error!(
                recording = %recording_path.display(),
                program = %program,
                code,
                command = %command,
                stdout = %stdout,
                stderr = %stderr,
                "External tool failed"
            );
        }
        other => {
            tracing::error!(
                recording = %recording_path.display(),
                error = %other,
                "Postprocessing failed"
            );
        }
    }
}
