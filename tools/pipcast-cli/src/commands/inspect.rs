//! Show the tracks of a recording.

use std::path::{Path, PathBuf};

use pipcast_common::config::AppConfig;
use pipcast_recording_model::output_path;
use pipcast_render_engine::{count_chunks, discover_tracks};

use super::resolve_recording;

pub async fn run(config: &AppConfig, recording: PathBuf) -> anyhow::Result<()> {
    let path = resolve_recording(&recording, &config.recordings_dir);
    println!("Recording: {}", path.display());

    let Some(tracks) = discover_tracks(&path).await? else {
        println!("  No main stream; nothing to render.");
        return Ok(());
    };

    println!();
    println!("Tracks:");
    print_track("Main", &tracks.main).await?;
    match &tracks.overlay {
        Some(dir) => print_track("Overlay", dir).await?,
        None => println!("  Overlay: none"),
    }
    for dir in &tracks.audio {
        print_track("Audio", dir).await?;
    }
    println!();

    println!("Render:");
    println!("  Inputs: {}", tracks.input_count());
    println!(
        "  Layout: {}",
        if tracks.has_overlay() {
            "picture-in-picture"
        } else {
            "main stream only"
        }
    );
    println!(
        "  Output: {}",
        output_path(&path, &config.output.container).display()
    );

    Ok(())
}

async fn print_track(label: &str, dir: &Path) -> anyhow::Result<()> {
    let chunks = count_chunks(dir).await?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("  {label}: {name} ({chunks} chunks)");
    Ok(())
}
