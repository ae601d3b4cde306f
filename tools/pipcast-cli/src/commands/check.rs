//! Check that the configured external tools are available.

use std::process::ExitCode;

use pipcast_common::config::{config_file_path, AppConfig};
use pipcast_render_engine::{tool_available, SystemToolRunner};

pub async fn run(config: &AppConfig) -> anyhow::Result<ExitCode> {
    println!("Pipcast System Check");
    println!("{}", "=".repeat(50));

    println!("Config file: {}", config_file_path().display());
    println!("Recordings: {}", config.recordings_dir.display());
    println!("Container: {}", config.output.container);
    println!();

    let mut all_ok = true;
    for program in [&config.tools.ffprobe, &config.tools.ffmpeg] {
        if tool_available(&SystemToolRunner, program).await {
            println!("[OK] {program}");
        } else {
            println!("[MISSING] {program}");
            all_ok = false;
        }
    }

    if !config.recordings_dir.is_dir() {
        println!("[WARN] Recordings directory does not exist");
    }

    println!();
    if all_ok {
        println!("All required tools are available. Pipcast is ready.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Some required tools are missing. Install ffmpeg or fix the tool paths in the config file.");
        Ok(ExitCode::FAILURE)
    }
}
