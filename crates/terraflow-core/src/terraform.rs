//! Action queue and sequential runner
//!
//! A [`Terraform`] holds the queued actions and a `head` cursor pointing at the
//! next one to run. [`Terraform::execute`] runs from `head` to the end and
//! stops at the first failure without advancing past it, so calling it again
//! resumes with the failed action.

use crate::action::Action;
use crate::error::{Result, TerraformError};
use crate::process::{Invocation, ProcessOutcome, ProcessRunner, TokioProcessRunner};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default binary, resolved through `PATH`
pub const TERRAFORM_BIN: &str = "terraform";

/// Aggregate stdout/stderr of the actions run by one `execute` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Named construction step applied by [`Terraform::new`]
pub struct TerraformOption {
    name: String,
    apply: Box<dyn FnOnce(&mut Terraform) -> anyhow::Result<()> + Send>,
}

impl TerraformOption {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TerraformOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerraformOption")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a caller-defined option.
pub fn option<F>(name: impl Into<String>, apply: F) -> TerraformOption
where
    F: FnOnce(&mut Terraform) -> anyhow::Result<()> + Send + 'static,
{
    TerraformOption {
        name: name.into(),
        apply: Box::new(apply),
    }
}

/// Pre-seed the queue with actions, in order.
pub fn with_actions<I>(actions: I) -> TerraformOption
where
    I: IntoIterator<Item = Action>,
{
    let actions: Vec<Action> = actions.into_iter().collect();
    option("with_actions", move |t| {
        t.queue.extend(actions);
        Ok(())
    })
}

/// Use another terraform executable (name on `PATH` or a path).
pub fn with_binary(binary: impl Into<String>) -> TerraformOption {
    let binary = binary.into();
    option("with_binary", move |t| {
        if binary.trim().is_empty() {
            anyhow::bail!("binary name is empty");
        }
        t.binary = binary;
        Ok(())
    })
}

/// Directory holding the terraform configuration; the binary runs there.
pub fn with_code_path(path: impl Into<PathBuf>) -> TerraformOption {
    let path = path.into();
    option("with_code_path", move |t| {
        if !path.is_dir() {
            anyhow::bail!("code path {} is not a directory", path.display());
        }
        t.code_path = path;
        Ok(())
    })
}

/// Extra environment variable for every invocation (e.g. `TF_LOG`).
pub fn with_env(key: impl Into<String>, value: impl Into<String>) -> TerraformOption {
    let key = key.into();
    let value = value.into();
    option("with_env", move |t| {
        if key.is_empty() || key.contains('=') {
            anyhow::bail!("invalid environment variable name {:?}", key);
        }
        t.env.insert(key, value);
        Ok(())
    })
}

/// Replace the process-execution facility.
pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> TerraformOption {
    option("with_runner", move |t| {
        t.runner = runner;
        Ok(())
    })
}

/// Queue of terraform actions executed in order
pub struct Terraform {
    binary: String,
    code_path: PathBuf,
    env: BTreeMap<String, String>,
    runner: Arc<dyn ProcessRunner>,
    queue: Vec<Action>,
    head: usize,
}

impl std::fmt::Debug for Terraform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terraform")
            .field("binary", &self.binary)
            .field("code_path", &self.code_path)
            .field("env", &self.env)
            .field("queue", &self.queue)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

impl Terraform {
    /// Apply defaults, then each option in order. The first failing option
    /// aborts construction.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = TerraformOption>,
    {
        let mut terraform = Self {
            binary: TERRAFORM_BIN.to_string(),
            code_path: PathBuf::from("."),
            env: BTreeMap::new(),
            runner: Arc::new(TokioProcessRunner),
            queue: Vec::new(),
            head: 0,
        };

        for opt in options {
            let TerraformOption { name, apply } = opt;
            apply(&mut terraform).map_err(|source| TerraformError::FunctionalOption {
                option: name,
                source,
            })?;
        }

        Ok(terraform)
    }

    /// Append an action after the current tail.
    pub fn amend(&mut self, action: impl Into<Action>) {
        self.queue.push(action.into());
    }

    /// Index of the next action to be executed
    pub fn head(&self) -> usize {
        self.head
    }

    /// Reposition the cursor. `index == len` marks the queue as drained.
    pub fn set_head(&mut self, index: usize) -> Result<()> {
        if index > self.queue.len() {
            return Err(TerraformError::HeadOutOfRange {
                index,
                len: self.queue.len(),
            });
        }
        self.head = index;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.head = 0;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.queue
    }

    pub fn action(&self, index: usize) -> Option<&Action> {
        self.queue.get(index)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn code_path(&self) -> &Path {
        &self.code_path
    }

    /// Marshaled argument lists of every queued action
    pub fn command_lines(&self) -> Result<Vec<Vec<String>>> {
        self.queue.iter().map(Action::marshal).collect()
    }

    /// Run the queue from `head` to the end.
    ///
    /// Every attempted action records its own stdout/stderr. On failure the
    /// error carries the aggregate output of this call and `head` stays on the
    /// failed action.
    pub async fn execute(&mut self, cancel: &CancellationToken) -> Result<ExecOutput> {
        if self.queue.is_empty() {
            return Err(TerraformError::NoRegisteredActions);
        }

        tracing::debug!("queue length is: {}", self.queue.len());
        tracing::info!("start queue execution at index: {}", self.head);

        let mut aggregate = ExecOutput::default();

        while self.head < self.queue.len() {
            let index = self.head;
            let action = &mut self.queue[index];
            let kind = action.kind().to_string();
            let args = action.marshal()?;

            tracing::debug!(
                "Action index: {} Terraform operation: {} Args: {}",
                index,
                kind,
                args[1..].join(" ")
            );

            let invocation = Invocation {
                program: self.binary.clone(),
                args,
                current_dir: self.code_path.clone(),
                env: self.env.clone(),
            };

            let output = match self.runner.run(&invocation, cancel).await {
                Ok(ProcessOutcome::Exited(output)) => output,
                Ok(ProcessOutcome::Cancelled) => {
                    action.capture_output(Vec::new(), Vec::new());
                    tracing::info!("terraform {} cancelled at index: {}", kind, index);
                    return Err(TerraformError::Cancelled {
                        kind,
                        index,
                        stdout: aggregate.stdout,
                        stderr: aggregate.stderr,
                    });
                }
                Err(e) => {
                    action.capture_output(Vec::new(), Vec::new());
                    tracing::info!("terraform {} could not be run at index: {}", kind, index);
                    return Err(TerraformError::LaunchFailed {
                        kind,
                        index,
                        source: Box::new(e),
                        stdout: aggregate.stdout,
                        stderr: aggregate.stderr,
                    });
                }
            };

            aggregate.stdout.extend_from_slice(&output.stdout);
            aggregate.stderr.extend_from_slice(&output.stderr);
            let success = output.success();
            let code = output.code;
            action.capture_output(output.stdout, output.stderr);

            if !success {
                tracing::info!("terraform {} failed at index: {}", kind, index);
                return Err(TerraformError::CommandFailed {
                    kind,
                    index,
                    code,
                    stdout: aggregate.stdout,
                    stderr: aggregate.stderr,
                });
            }

            self.head += 1;
        }

        tracing::info!("queue drained at index: {}", self.head);
        Ok(aggregate)
    }
}
