//! Process execution
//!
//! The queue never spawns processes itself; it hands each [`Invocation`] to a
//! [`ProcessRunner`]. The default runner uses `tokio::process` and kills the
//! child when the cancellation token fires.

use crate::error::{Result, TerraformError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// One launch of the external binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    pub env: BTreeMap<String, String>,
}

/// Result of a process that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Outcome of a single launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Exited(ProcessOutput),
    /// The token fired and the child was killed
    Cancelled,
}

/// Facility that launches external programs
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion or until `cancel` fires.
    ///
    /// Returns `Err` only when the program could not be launched.
    async fn run(&self, invocation: &Invocation, cancel: &CancellationToken)
    -> Result<ProcessOutcome>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.current_dir(&invocation.current_dir);
        if !invocation.env.is_empty() {
            cmd.envs(&invocation.env);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| TerraformError::Binary {
            path: invocation.program.clone(),
            message: e.to_string(),
        })?;

        tokio::select! {
            output = child.wait_with_output() => {
                let output = output?;
                Ok(ProcessOutcome::Exited(ProcessOutput {
                    code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                }))
            }
            _ = cancel.cancelled() => {
                // dropping the wait future drops the child, which kills it
                tracing::debug!("Cancelled: {} {}", invocation.program, invocation.args.join(" "));
                Ok(ProcessOutcome::Cancelled)
            }
        }
    }
}
