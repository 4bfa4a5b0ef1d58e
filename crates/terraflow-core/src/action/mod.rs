//! Terraform actions
//!
//! An [`Action`] is one configured invocation of a terraform sub-command.
//! Each variant owns its option fields and the output captured by its most
//! recent run; the variants differ only in which options they declare.

pub mod apply;
pub mod destroy;
pub mod init;
pub mod output;
pub mod plan;

pub use apply::ApplyAction;
pub use destroy::DestroyAction;
pub use init::InitAction;
pub use output::OutputAction;
pub use plan::PlanAction;

use crate::error::Result;
use crate::marshal::{self, Flag};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Terraform sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Init,
    Plan,
    Apply,
    Destroy,
    Output,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Init => "init",
            ActionKind::Plan => "plan",
            ActionKind::Apply => "apply",
            ActionKind::Destroy => "destroy",
            ActionKind::Output => "output",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output captured from the last execution of an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// A queued terraform invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Init(InitAction),
    Plan(PlanAction),
    Apply(ApplyAction),
    Destroy(DestroyAction),
    Output(OutputAction),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Init(_) => ActionKind::Init,
            Action::Plan(_) => ActionKind::Plan,
            Action::Apply(_) => ActionKind::Apply,
            Action::Destroy(_) => ActionKind::Destroy,
            Action::Output(_) => ActionKind::Output,
        }
    }

    fn flags(&self) -> Vec<Flag<'_>> {
        match self {
            Action::Init(a) => a.flags(),
            Action::Plan(a) => a.flags(),
            Action::Apply(a) => a.flags(),
            Action::Destroy(a) => a.flags(),
            Action::Output(a) => a.flags(),
        }
    }

    fn captured(&self) -> &CapturedOutput {
        match self {
            Action::Init(a) => &a.captured,
            Action::Plan(a) => &a.captured,
            Action::Apply(a) => &a.captured,
            Action::Destroy(a) => &a.captured,
            Action::Output(a) => &a.captured,
        }
    }

    fn captured_mut(&mut self) -> &mut CapturedOutput {
        match self {
            Action::Init(a) => &mut a.captured,
            Action::Plan(a) => &mut a.captured,
            Action::Apply(a) => &mut a.captured,
            Action::Destroy(a) => &mut a.captured,
            Action::Output(a) => &mut a.captured,
        }
    }

    /// Argument list for the terraform binary, sub-command first.
    pub fn marshal(&self) -> Result<Vec<String>> {
        marshal::marshal(self.kind().as_str(), &self.flags())
    }

    /// Replace the output recorded for this action.
    pub fn capture_output(&mut self, stdout: Vec<u8>, stderr: Vec<u8>) {
        *self.captured_mut() = CapturedOutput { stdout, stderr };
    }

    /// Stdout and stderr of the most recent run; empty if never executed.
    pub fn output(&self) -> (&[u8], &[u8]) {
        let captured = self.captured();
        (&captured.stdout, &captured.stderr)
    }
}

macro_rules! impl_from_action {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_action! {
    Init => InitAction,
    Plan => PlanAction,
    Apply => ApplyAction,
    Destroy => DestroyAction,
    Output => OutputAction,
}

/// Render a duration the way terraform parses `-lock-timeout` values.
///
/// Fractions of a second are rounded up to whole milliseconds, so a non-zero
/// wait never becomes `0ms`.
pub(crate) fn duration_arg(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_nanos().div_ceil(1_000_000))
    }
}

/// Accept YAML booleans and numbers for string-valued options.
pub(crate) fn scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Str(s) => s,
    })
}
