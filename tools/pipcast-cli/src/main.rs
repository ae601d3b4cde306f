//! Pipcast CLI — Manual (re)rendering of recorded lectures.
//!
//! Usage:
//!   pipcast render <RECORDING>...   Postprocess recordings into presentations
//!   pipcast inspect <RECORDING>     Show the tracks of a recording
//!   pipcast probe <FILE>            Analyze an assembled stream
//!   pipcast check                   Check that ffmpeg and ffprobe are usable

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pipcast_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "pipcast",
    about = "Picture-in-picture postprocessing for chunked lecture recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level filter, overrides the config file (e.g. "warn", "pipcast_render_engine=debug")
    #[arg(long, global = true, value_name = "LEVEL", conflicts_with = "verbose")]
    log_level: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Postprocess one or more recordings
    Render {
        /// Recording directories, or names inside the recordings directory
        #[arg(required = true)]
        recordings: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the tracks and chunk counts of a recording
    Inspect {
        /// Recording directory, or a name inside the recordings directory
        recording: PathBuf,
    },

    /// Probe an assembled stream and show the render decisions for it
    Probe {
        /// Path to an assembled video file
        file: PathBuf,
    },

    /// Check that the configured external tools are available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    } else if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    pipcast_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Render { recordings, json } => {
            commands::render::run(&config, recordings, json).await
        }
        Commands::Inspect { recording } => {
            commands::inspect::run(&config, recording).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Probe { file } => {
            commands::probe::run(&config, file).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => commands::check::run(&config).await,
    }
}
