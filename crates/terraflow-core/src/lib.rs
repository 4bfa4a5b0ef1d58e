//! terraflow core
//!
//! Builds a queue of typed terraform invocations and runs them one at a time,
//! stopping at the first failure and resuming from it on the next run.
//!
//! # Example
//!
//! ```ignore
//! use terraflow_core::{ApplyAction, InitAction, Terraform, with_actions, with_code_path};
//! use tokio_util::sync::CancellationToken;
//!
//! let mut apply = ApplyAction::new();
//! apply.enable_auto_approve().register_resources(["aws_instance.foo"]);
//!
//! let mut terraform = Terraform::new([
//!     with_code_path("./infra"),
//!     with_actions([InitAction::new().into(), apply.into()]),
//! ])?;
//!
//! match terraform.execute(&CancellationToken::new()).await {
//!     Ok(output) => println!("{}", String::from_utf8_lossy(&output.stdout)),
//!     // head still points at the failed action; fix things and call execute again
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod action;
pub mod error;
pub mod marshal;
pub mod process;
pub mod state;
pub mod terraform;

// Re-exports
pub use action::{
    Action, ActionKind, ApplyAction, DestroyAction, InitAction, OutputAction, PlanAction,
};
pub use error::{Result, TerraformError};
pub use marshal::{Flag, FlagValue, marshal};
pub use process::{Invocation, ProcessOutcome, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use state::{QueueState, StateManager};
pub use terraform::{
    ExecOutput, TERRAFORM_BIN, Terraform, TerraformOption, option, with_actions, with_binary,
    with_code_path, with_env, with_runner,
};
pub use tokio_util::sync::CancellationToken;
