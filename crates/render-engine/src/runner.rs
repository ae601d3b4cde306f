//! External tool execution.
//!
//! ffprobe and ffmpeg are driven through [`ToolRunner`] so the pipeline can
//! be exercised without the real binaries. The system runner awaits the
//! child process on the tokio runtime, so a long render never blocks other
//! jobs.

use std::future::Future;
use std::process::Stdio;

use pipcast_common::error::{PipcastError, PipcastResult};
use tokio::process::Command;

/// A fully built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Shell-style rendering of the command, for logs and error reports.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(part: &str) -> String {
    let plain = !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        part.to_string()
    } else {
        format!("'{}'", part.replace('\'', r"'\''"))
    }
}

/// Runs external tools and captures their standard output.
pub trait ToolRunner: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// Returns stdout on a zero exit status. A non-zero exit must be
    /// reported as [`PipcastError::ToolFailed`].
    fn run(
        &self,
        invocation: &ToolInvocation,
    ) -> impl Future<Output = PipcastResult<Vec<u8>>> + Send;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> PipcastResult<Vec<u8>> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| PipcastError::ToolSpawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PipcastError::ToolFailed {
                program: invocation.program.clone(),
                code: output.status.code().unwrap_or(-1),
                command: invocation.command_line(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.stdout)
    }
}

/// Check whether `program -version` can be run successfully.
pub async fn tool_available<R: ToolRunner>(runner: &R, program: &str) -> bool {
    let invocation = ToolInvocation::new(program).arg("-version");
    match runner.run(&invocation).await {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(program, error = %err, "Tool not available");
            false
        }
    }
}
