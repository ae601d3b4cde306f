//! Probe an assembled stream and show the render decisions for it.

use std::path::PathBuf;

use pipcast_common::config::AppConfig;
use pipcast_processing_core::{generate_filter_graph, generate_overlay_scale, pick_target_geometry};
use pipcast_render_engine::{video_properties, SystemToolRunner};

pub async fn run(config: &AppConfig, file: PathBuf) -> anyhow::Result<()> {
    let props = video_properties(&SystemToolRunner, &config.tools.ffprobe, &file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", file.display()))?;
    let canvas = pick_target_geometry(&props.crop);

    println!("Stream: {}", file.display());
    println!("  Resolution: {}x{}", props.width, props.height);
    if props.needs_cropping() {
        println!(
            "  Crop: {}x{} at ({}, {})",
            props.crop.width, props.crop.height, props.crop.left, props.crop.top
        );
    } else {
        println!("  Crop: none");
    }
    println!("  Canvas: {}x{}", canvas.width, canvas.height);
    println!(
        "  Overlay scale: {}",
        generate_overlay_scale(&props.crop, canvas)
    );
    println!();

    println!("Filter graph (main only):");
    println!("  {}", generate_filter_graph(&props, false));
    println!("Filter graph (with overlay):");
    println!("  {}", generate_filter_graph(&props, true));

    Ok(())
}
