//! `terraform apply`

use super::{CapturedOutput, duration_arg, scalar};
use crate::marshal::Flag;
use serde::Deserialize;
use std::time::Duration;

/// Options for `terraform apply`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplyAction {
    auto_approve: bool,
    #[serde(deserialize_with = "scalar")]
    backup: String,
    compact_warnings: bool,
    #[serde(deserialize_with = "scalar")]
    lock: String,
    #[serde(deserialize_with = "scalar")]
    lock_timeout: String,
    #[serde(deserialize_with = "scalar")]
    input: String,
    no_color: bool,
    #[serde(deserialize_with = "scalar")]
    parallelism: String,
    #[serde(deserialize_with = "scalar")]
    refresh: String,
    #[serde(deserialize_with = "scalar")]
    state: String,
    #[serde(deserialize_with = "scalar")]
    state_out: String,
    targets: Vec<String>,
    vars: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    var_file: String,
    #[serde(deserialize_with = "scalar")]
    plan_file: String,

    #[serde(skip)]
    pub(super) captured: CapturedOutput,
}

impl ApplyAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn flags(&self) -> Vec<Flag<'_>> {
        vec![
            Flag::switch("-auto-approve", self.auto_approve),
            Flag::value("-backup=", &self.backup),
            Flag::switch("-compact-warnings", self.compact_warnings),
            Flag::value("-lock=", &self.lock),
            Flag::value("-lock-timeout=", &self.lock_timeout),
            Flag::value("-input=", &self.input),
            Flag::switch("-no-color", self.no_color),
            Flag::value("-parallelism=", &self.parallelism),
            Flag::value("-refresh=", &self.refresh),
            Flag::value("-state=", &self.state),
            Flag::value("-state-out=", &self.state_out),
            Flag::list("-target=", &self.targets),
            Flag::list("-var=", &self.vars),
            Flag::value("-var-file=", &self.var_file),
            // positional, must stay last
            Flag::value("", &self.plan_file),
        ]
    }

    /// Skip interactive plan approval before applying.
    /// Terraform CLI: -auto-approve
    pub fn enable_auto_approve(&mut self) -> &mut Self {
        self.auto_approve = true;
        self
    }

    /// Path to back up the existing state file to before modifying it.
    /// Terraform CLI: -backup=path
    pub fn set_backup(&mut self, path: impl Into<String>) -> &mut Self {
        self.backup = path.into();
        self
    }

    /// Terraform CLI: -backup=-
    pub fn disable_backup(&mut self) -> &mut Self {
        self.backup = "-".to_string();
        self
    }

    /// Show only a summary of warnings not accompanied by errors.
    /// Terraform CLI: -compact-warnings
    pub fn enable_compact_warnings(&mut self) -> &mut Self {
        self.compact_warnings = true;
        self
    }

    /// Terraform CLI: -lock=false
    pub fn disable_lock(&mut self) -> &mut Self {
        self.lock = "false".to_string();
        self
    }

    /// How long to wait for a state lock. Terraform defaults to 0s, failing
    /// immediately when the lock is held.
    /// Terraform CLI: -lock-timeout=0s
    pub fn set_lock_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.lock_timeout = duration_arg(timeout);
        self
    }

    /// Error instead of prompting for variables that are not set.
    /// Terraform CLI: -input=false
    pub fn disable_interactive_vars_input(&mut self) -> &mut Self {
        self.input = "false".to_string();
        self
    }

    /// Terraform CLI: -no-color
    pub fn disable_output_color(&mut self) -> &mut Self {
        self.no_color = true;
        self
    }

    /// Number of parallel resource operations. Terraform defaults to 10.
    /// Terraform CLI: -parallelism=n
    pub fn set_parallelism(&mut self, n: usize) -> &mut Self {
        self.parallelism = n.to_string();
        self
    }

    /// Skip refreshing state before checking for differences.
    /// Terraform CLI: -refresh=false
    pub fn disable_auto_refresh(&mut self) -> &mut Self {
        self.refresh = "false".to_string();
        self
    }

    /// Terraform CLI: -state=path
    pub fn set_existing_state_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.state = path.into();
        self
    }

    /// Write the new state to a different file, keeping the old one intact.
    /// Terraform CLI: -state-out=path
    pub fn set_new_state_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.state_out = path.into();
        self
    }

    /// Limit the operation to the given resources and their dependencies.
    /// Repeated calls accumulate.
    /// Terraform CLI: -target=resource
    pub fn register_resources<I, S>(&mut self, resources: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(resources.into_iter().map(Into::into));
        self
    }

    /// Set input variables as `name=value` pairs. Repeated calls accumulate.
    /// Terraform CLI: -var=name=value
    pub fn set_variables<I, S>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars.extend(vars.into_iter().map(Into::into));
        self
    }

    /// terraform.tfvars and *.auto.tfvars are loaded regardless.
    /// Terraform CLI: -var-file=path
    pub fn set_var_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.var_file = path.into();
        self
    }

    /// Apply a saved plan instead of computing a new one.
    /// Terraform CLI: apply [options] PLAN
    pub fn use_plan_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.plan_file = path.into();
        self
    }
}
