//! Error types shared across Pipcast crates.

use std::path::PathBuf;

/// Top-level error type for Pipcast operations.
#[derive(Debug, thiserror::Error)]
pub enum PipcastError {
    #[error("Chunk assembly error in {dir}: {message}")]
    Assembly { dir: PathBuf, message: String },

    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{program} failed with exit code {code}")]
    ToolFailed {
        program: String,
        /// Exit code, `-1` if the process was terminated by a signal.
        code: i32,
        command: String,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to start {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using PipcastError.
pub type PipcastResult<T> = Result<T, PipcastError>;

impl PipcastError {
    pub fn assembly(dir: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Assembly {
            dir: dir.into(),
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
