use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pipcast_common::error::{PipcastError, PipcastResult};
use pipcast_processing_core::generate_filter_graph;
use pipcast_recording_model::{PostprocessResult, ResultReason, VideoProperties};
use pipcast_render_engine::{PostprocessOptions, Postprocessor, ToolInvocation, ToolRunner};

const PROBE_FULL_HD: &str =
    r#"{"streams":[{"codec_type":"video","width":1920,"height":1080}],"packets":[]}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderOutcome {
    Succeed,
    Fail,
}

/// Stands in for ffprobe/ffmpeg and records every invocation.
struct MockRunner {
    calls: Mutex<Vec<ToolInvocation>>,
    probe_fails: bool,
    render: RenderOutcome,
}

impl MockRunner {
    fn new(render: RenderOutcome) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            probe_fails: false,
            render,
        }
    }

    fn failing_probe() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            probe_fails: true,
            render: RenderOutcome::Succeed,
        }
    }

    fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    fn render_call(&self) -> ToolInvocation {
        self.calls()
            .into_iter()
            .find(|c| c.program == "ffmpeg")
            .expect("ffmpeg should have been invoked")
    }
}

fn failed(program: &str, invocation: &ToolInvocation) -> PipcastError {
    PipcastError::ToolFailed {
        program: program.to_string(),
        code: 1,
        command: invocation.command_line(),
        stdout: String::new(),
        stderr: "Conversion failed!".to_string(),
    }
}

impl ToolRunner for MockRunner {
    async fn run(&self, invocation: &ToolInvocation) -> PipcastResult<Vec<u8>> {
        self.calls.lock().unwrap().push(invocation.clone());

        match invocation.program.as_str() {
            "ffprobe" if self.probe_fails => Err(failed("ffprobe", invocation)),
            "ffprobe" => Ok(PROBE_FULL_HD.as_bytes().to_vec()),
            "ffmpeg" => {
                for input in inputs_of(invocation) {
                    assert!(input.exists(), "render input {} missing", input.display());
                }
                match self.render {
                    RenderOutcome::Succeed => Ok(Vec::new()),
                    RenderOutcome::Fail => Err(failed("ffmpeg", invocation)),
                }
            }
            other => panic!("unexpected program {other}"),
        }
    }
}

fn inputs_of(invocation: &ToolInvocation) -> Vec<PathBuf> {
    invocation
        .args
        .windows(2)
        .filter(|pair| pair[0] == "-i")
        .map(|pair| PathBuf::from(&pair[1]))
        .collect()
}

fn maps_of(invocation: &ToolInvocation) -> Vec<String> {
    invocation
        .args
        .windows(2)
        .filter(|pair| pair[0] == "-map")
        .map(|pair| pair[1].clone())
        .collect()
}

fn arg_after(invocation: &ToolInvocation, flag: &str) -> String {
    let idx = invocation
        .args
        .iter()
        .position(|a| a == flag)
        .unwrap_or_else(|| panic!("{flag} missing"));
    invocation.args[idx + 1].clone()
}

fn make_track(recording: &Path, name: &str, chunks: &[&[u8]]) {
    let dir = recording.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for (idx, data) in chunks.iter().enumerate() {
        std::fs::write(dir.join(format!("chunk.{idx:04}")), data).unwrap();
    }
}

fn leftover_assembled_files(recording: &Path) -> Vec<PathBuf> {
    let mut leftovers = Vec::new();
    for track in std::fs::read_dir(recording).unwrap() {
        let track = track.unwrap().path();
        if !track.is_dir() {
            continue;
        }
        for file in std::fs::read_dir(&track).unwrap() {
            let file = file.unwrap().path();
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            if name.starts_with("full.") {
                leftovers.push(file);
            }
        }
    }
    leftovers
}

fn postprocessor(runner: MockRunner) -> Postprocessor<MockRunner> {
    Postprocessor::new(runner, PostprocessOptions::default())
}

#[tokio::test]
async fn missing_main_stream_touches_no_tools() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "overlay", &[b"cam"]);

    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));
    let result = pp.postprocess(dir.path()).await;

    assert_eq!(result, PostprocessResult::main_stream_missing());
    assert_eq!(result.output_file(), None);
    assert!(pp.runner().calls().is_empty());
    assert!(leftover_assembled_files(dir.path()).is_empty());
}

#[tokio::test]
async fn missing_recording_is_main_stream_missing() {
    let dir = tempfile::tempdir().unwrap();
    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));

    let result = pp.postprocess(&dir.path().join("does-not-exist")).await;

    assert_eq!(result.reason(), ResultReason::MainStreamMissing);
    assert!(pp.runner().calls().is_empty());
}

#[tokio::test]
async fn stream_and_overlay_render_picture_in_picture() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A", b"B"]);
    make_track(dir.path(), "overlay", &[b"C"]);

    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));
    let result = pp.postprocess(dir.path()).await;

    let output = dir.path().join("presentation.webm");
    assert_eq!(result, PostprocessResult::success(output.clone()));

    let calls = pp.runner().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].program, "ffprobe");

    let render = pp.runner().render_call();
    assert_eq!(
        inputs_of(&render),
        vec![
            dir.path().join("stream").join("full.webm"),
            dir.path().join("overlay").join("full.webm"),
        ]
    );
    assert_eq!(maps_of(&render), vec!["0:a?"]);
    assert_eq!(
        arg_after(&render, "-filter_complex"),
        generate_filter_graph(&VideoProperties::uncropped(1920, 1080), true)
    );
    assert_eq!(render.args[render.args.len() - 2..], ["-y".to_string(), output.display().to_string()]);

    assert!(leftover_assembled_files(dir.path()).is_empty());
    assert!(dir.path().join("stream").join("chunk.0000").exists());
}

#[tokio::test]
async fn extra_audio_tracks_are_mapped_by_input_position() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A"]);
    make_track(dir.path(), "overlay", &[b"C"]);
    for name in ["audio-0", "audio-1", "audio-2"] {
        make_track(dir.path(), name, &[b"mic"]);
    }

    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));
    let result = pp.postprocess(dir.path()).await;
    assert!(result.is_success());

    let render = pp.runner().render_call();
    assert_eq!(
        inputs_of(&render),
        vec![
            dir.path().join("stream").join("full.webm"),
            dir.path().join("overlay").join("full.webm"),
            dir.path().join("audio-0").join("full.webm"),
            dir.path().join("audio-1").join("full.webm"),
            dir.path().join("audio-2").join("full.webm"),
        ]
    );
    assert_eq!(maps_of(&render), vec!["0:a?", "2:a", "3:a", "4:a"]);
    assert!(leftover_assembled_files(dir.path()).is_empty());
}

#[tokio::test]
async fn audio_without_overlay_renders_plain() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A"]);
    make_track(dir.path(), "audio-0", &[b"mic"]);

    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));
    assert!(pp.postprocess(dir.path()).await.is_success());

    let render = pp.runner().render_call();
    assert_eq!(inputs_of(&render).len(), 2);
    assert_eq!(maps_of(&render), vec!["0:a?", "1:a"]);
    assert_eq!(
        arg_after(&render, "-filter_complex"),
        generate_filter_graph(&VideoProperties::uncropped(1920, 1080), false)
    );
}

#[tokio::test]
async fn failed_render_reports_failure_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A"]);
    make_track(dir.path(), "overlay", &[b"C"]);
    make_track(dir.path(), "audio-0", &[b"mic"]);

    let pp = postprocessor(MockRunner::new(RenderOutcome::Fail));
    let result = pp.postprocess(dir.path()).await;

    assert_eq!(result, PostprocessResult::failure());
    assert_eq!(result.output_file(), None);
    assert!(leftover_assembled_files(dir.path()).is_empty());
}

#[tokio::test]
async fn failed_probe_skips_render_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A"]);
    make_track(dir.path(), "overlay", &[b"C"]);

    let pp = postprocessor(MockRunner::failing_probe());
    let result = pp.postprocess(dir.path()).await;

    assert_eq!(result.reason(), ResultReason::Failure);
    assert_eq!(pp.runner().calls().len(), 1);
    assert!(leftover_assembled_files(dir.path()).is_empty());
}

#[tokio::test]
async fn unwritable_track_fails_job_and_removes_assembled_tracks() {
    let dir = tempfile::tempdir().unwrap();
    make_track(dir.path(), "stream", &[b"A"]);
    make_track(dir.path(), "overlay", &[b"C"]);
    make_track(dir.path(), "audio-0", &[b"mic"]);
    // The assembled target already exists as a directory, so creating it fails.
    std::fs::create_dir(dir.path().join("audio-0").join("full.webm")).unwrap();

    let pp = postprocessor(MockRunner::new(RenderOutcome::Succeed));
    let result = pp.postprocess(dir.path()).await;

    assert_eq!(result.reason(), ResultReason::Failure);
    assert_eq!(result.output_file(), None);

    let calls = pp.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "ffprobe");
    assert!(calls.iter().all(|c| c.program != "ffmpeg"));

    assert!(!dir.path().join("stream").join("full.webm").exists());
    assert!(!dir.path().join("overlay").join("full.webm").exists());
    assert!(dir.path().join("stream").join("chunk.0000").exists());
}

#[tokio::test]
async fn concurrent_jobs_do_not_interfere() {
    let root = tempfile::tempdir().unwrap();
    let recordings: Vec<PathBuf> = (0..4).map(|i| root.path().join(format!("rec-{i}"))).collect();
    for rec in &recordings {
        make_track(rec, "stream", &[b"A", b"B"]);
        make_track(rec, "overlay", &[b"C"]);
    }

    let pp = Arc::new(postprocessor(MockRunner::new(RenderOutcome::Succeed)));
    let mut jobs = tokio::task::JoinSet::new();
    for rec in recordings.clone() {
        let pp = Arc::clone(&pp);
        jobs.spawn(async move { (rec.clone(), pp.postprocess(&rec).await) });
    }

    while let Some(joined) = jobs.join_next().await {
        let (rec, result) = joined.unwrap();
        assert_eq!(result, PostprocessResult::success(rec.join("presentation.webm")));
        assert!(leftover_assembled_files(&rec).is_empty());
    }
    assert_eq!(pp.runner().calls().len(), recordings.len() * 2);
}
