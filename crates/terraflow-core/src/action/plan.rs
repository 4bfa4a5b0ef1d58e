//! `terraform plan`

use super::{CapturedOutput, duration_arg, scalar};
use crate::marshal::Flag;
use serde::Deserialize;
use std::time::Duration;

/// Options for `terraform plan`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanAction {
    destroy: bool,
    compact_warnings: bool,
    #[serde(deserialize_with = "scalar")]
    input: String,
    #[serde(deserialize_with = "scalar")]
    lock: String,
    #[serde(deserialize_with = "scalar")]
    lock_timeout: String,
    no_color: bool,
    #[serde(deserialize_with = "scalar")]
    out: String,
    #[serde(deserialize_with = "scalar")]
    parallelism: String,
    #[serde(deserialize_with = "scalar")]
    refresh: String,
    #[serde(deserialize_with = "scalar")]
    state: String,
    targets: Vec<String>,
    vars: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    var_file: String,

    #[serde(skip)]
    pub(super) captured: CapturedOutput,
}

impl PlanAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn flags(&self) -> Vec<Flag<'_>> {
        vec![
            Flag::switch("-destroy", self.destroy),
            Flag::switch("-compact-warnings", self.compact_warnings),
            Flag::value("-input=", &self.input),
            Flag::value("-lock=", &self.lock),
            Flag::value("-lock-timeout=", &self.lock_timeout),
            Flag::switch("-no-color", self.no_color),
            Flag::value("-out=", &self.out),
            Flag::value("-parallelism=", &self.parallelism),
            Flag::value("-refresh=", &self.refresh),
            Flag::value("-state=", &self.state),
            Flag::list("-target=", &self.targets),
            Flag::list("-var=", &self.vars),
            Flag::value("-var-file=", &self.var_file),
        ]
    }

    /// Plan the destruction of all managed resources.
    /// Terraform CLI: -destroy
    pub fn plan_destroy(&mut self) -> &mut Self {
        self.destroy = true;
        self
    }

    /// Terraform CLI: -compact-warnings
    pub fn enable_compact_warnings(&mut self) -> &mut Self {
        self.compact_warnings = true;
        self
    }

    /// Terraform CLI: -input=false
    pub fn disable_interactive_vars_input(&mut self) -> &mut Self {
        self.input = "false".to_string();
        self
    }

    /// Terraform CLI: -lock=false
    pub fn disable_lock(&mut self) -> &mut Self {
        self.lock = "false".to_string();
        self
    }

    /// Terraform CLI: -lock-timeout=0s
    pub fn set_lock_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.lock_timeout = duration_arg(timeout);
        self
    }

    /// Terraform CLI: -no-color
    pub fn disable_output_color(&mut self) -> &mut Self {
        self.no_color = true;
        self
    }

    /// Save the plan so a later apply can execute exactly it.
    /// Terraform CLI: -out=path
    pub fn set_plan_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.out = path.into();
        self
    }

    /// Terraform CLI: -parallelism=n
    pub fn set_parallelism(&mut self, n: usize) -> &mut Self {
        self.parallelism = n.to_string();
        self
    }

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

    /// Terraform CLI: -target=resource
    pub fn register_resources<I, S>(&mut self, resources: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(resources.into_iter().map(Into::into));
        self
    }

    /// Terraform CLI: -var=name=value
    pub fn set_variables<I, S>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars.extend(vars.into_iter().map(Into::into));
        self
    }

    /// Terraform CLI: -var-file=path
    pub fn set_var_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.var_file = path.into();
        self
    }
}
