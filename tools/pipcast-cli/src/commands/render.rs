//! Postprocess recordings into presentations.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use pipcast_common::config::AppConfig;
use pipcast_recording_model::{PostprocessResult, ResultReason};
use pipcast_render_engine::{PostprocessOptions, Postprocessor, SystemToolRunner};
use serde::Serialize;
use tokio::task::JoinSet;

use super::resolve_recording;

#[derive(Serialize)]
struct JobReport<'a> {
    recording: &'a Path,
    #[serde(flatten)]
    result: &'a PostprocessResult,
}

pub async fn run(config: &AppConfig, recordings: Vec<PathBuf>, json: bool) -> anyhow::Result<ExitCode> {
    let recordings: Vec<PathBuf> = recordings
        .iter()
        .map(|r| resolve_recording(r, &config.recordings_dir))
        .collect();

    let postprocessor = Arc::new(Postprocessor::new(
        SystemToolRunner,
        PostprocessOptions::from(config),
    ));

    let mut jobs = JoinSet::new();
    for (index, recording) in recordings.iter().cloned().enumerate() {
        let postprocessor = Arc::clone(&postprocessor);
        jobs.spawn(async move { (index, postprocessor.postprocess(&recording).await) });
    }

    // A job that panicked leaves its slot empty and counts as a failure.
    let mut results: Vec<Option<PostprocessResult>> = vec![None; recordings.len()];
    while let Some(joined) = jobs.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::error!(error = %e, "Postprocessing task aborted"),
        }
    }
    let results: Vec<PostprocessResult> = results
        .into_iter()
        .map(|r| r.unwrap_or_else(PostprocessResult::failure))
        .collect();

    if json {
        let reports: Vec<JobReport<'_>> = recordings
            .iter()
            .zip(&results)
            .map(|(recording, result)| JobReport { recording, result })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (recording, result) in recordings.iter().zip(&results) {
            println!("Recording: {}", recording.display());
            println!("  {}", summary_line(result));
        }
    }

    let failed = results
        .iter()
        .filter(|r| r.reason() == ResultReason::Failure)
        .count();
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "Some recordings failed to render");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn summary_line(result: &PostprocessResult) -> String {
    let output = result
        .output_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string());
    format!("Result: {}, output = {}", result.reason(), output)
}
