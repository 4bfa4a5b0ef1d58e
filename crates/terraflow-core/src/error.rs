//! terraflow error types

use thiserror::Error;

/// Errors raised while building or running a terraform queue
#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("invalid action: {kind}")]
    InvalidAction { kind: String },

    #[error("no registered actions for terraform to execute")]
    NoRegisteredActions,

    #[error("error processing functional option {option}: {source}")]
    FunctionalOption {
        option: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{path}: {message}")]
    Binary { path: String, message: String },

    #[error("terraform {kind} (action #{index}) exited with {}", exit_label(.code))]
    CommandFailed {
        kind: String,
        index: usize,
        code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },

    #[error("terraform {kind} (action #{index}) could not be run: {source}")]
    LaunchFailed {
        kind: String,
        index: usize,
        #[source]
        source: Box<TerraformError>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },

    #[error("terraform {kind} (action #{index}) was cancelled")]
    Cancelled {
        kind: String,
        index: usize,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },

    #[error("head index {index} is bigger than current action queue size {len}")]
    HeadOutOfRange { index: usize, len: usize },

    #[error("state file error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TerraformError {
    /// Aggregate stdout/stderr collected before the queue stopped, if any.
    pub fn output(&self) -> Option<(&[u8], &[u8])> {
        match self {
            TerraformError::CommandFailed { stdout, stderr, .. }
            | TerraformError::LaunchFailed { stdout, stderr, .. }
            | TerraformError::Cancelled { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }

    /// Queue index of the action that stopped execution.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            TerraformError::CommandFailed { index, .. }
            | TerraformError::LaunchFailed { index, .. }
            | TerraformError::Cancelled { index, .. } => Some(*index),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status (killed by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, TerraformError>;
