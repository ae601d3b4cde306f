//! Final render invocation.

use std::path::{Path, PathBuf};

use pipcast_common::error::PipcastResult;

use crate::runner::{ToolInvocation, ToolRunner};

/// Assembled inputs of one render, in ffmpeg input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInputs {
    pub main: PathBuf,
    pub overlay: Option<PathBuf>,
    pub audio: Vec<PathBuf>,
}

impl RenderInputs {
    fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.main)
            .chain(self.overlay.iter())
            .chain(self.audio.iter())
    }
}

/// Build the ffmpeg invocation that renders `inputs` into `output_path`.
///
/// The main track's own audio is mapped optionally since a display capture
/// may have none. Every extra audio track is mapped by its input index and
/// must contain audio.
pub fn render_command(
    ffmpeg: &str,
    inputs: &RenderInputs,
    filter_graph: &str,
    output_path: &Path,
) -> ToolInvocation {
    let mut command = ToolInvocation::new(ffmpeg);
    for path in inputs.paths() {
        command = command.arg("-i").arg(path.display().to_string());
    }

    command = command
        .arg("-filter_complex")
        .arg(filter_graph)
        .arg("-map")
        .arg("0:a?");

    let first_audio_index = 1 + usize::from(inputs.overlay.is_some());
    for index in first_audio_index..first_audio_index + inputs.audio.len() {
        command = command.arg("-map").arg(format!("{index}:a"));
    }

    command.arg("-y").arg(output_path.display().to_string())
}

/// Run a render invocation to completion.
pub async fn render<R: ToolRunner>(
    runner: &R,
    command: &ToolInvocation,
    output_path: &Path,
) -> PipcastResult<()> {
    let started = std::time::Instant::now();
    tracing::info!(output = %output_path.display(), "Rendering");
    tracing::debug!(command = %command.command_line(), "Render command");

    runner.run(command).await?;

    tracing::info!(
        output = %output_path.display(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Render completed"
    );
    Ok(())
}
