//! Postprocessing job outcomes.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a job produced, or did not produce, an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultReason {
    Success,
    Failure,
    MainStreamMissing,
}

impl ResultReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::MainStreamMissing => "MAIN_STREAM_MISSING",
        }
    }
}

impl fmt::Display for ResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a postprocessing job.
///
/// `output_file` is set if and only if `reason` is [`ResultReason::Success`];
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostprocessResult {
    output_file: Option<PathBuf>,
    reason: ResultReason,
}

impl PostprocessResult {
    pub fn success(output_file: PathBuf) -> Self {
        Self {
            output_file: Some(output_file),
            reason: ResultReason::Success,
        }
    }

    pub fn failure() -> Self {
        Self {
            output_file: None,
            reason: ResultReason::Failure,
        }
    }

    pub fn main_stream_missing() -> Self {
        Self {
            output_file: None,
            reason: ResultReason::MainStreamMissing,
        }
    }

    pub fn output_file(&self) -> Option<&PathBuf> {
        self.output_file.as_ref()
    }

    pub fn reason(&self) -> ResultReason {
        self.reason
    }

    pub fn is_success(&self) -> bool {
        self.reason == ResultReason::Success
    }
}
