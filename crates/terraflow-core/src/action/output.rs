//! `terraform output`

use super::{CapturedOutput, scalar};
use crate::marshal::Flag;
use serde::Deserialize;

/// Options for `terraform output`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputAction {
    no_color: bool,
    #[serde(deserialize_with = "scalar")]
    state: String,
    json: bool,
    #[serde(deserialize_with = "scalar")]
    name: String,

    #[serde(skip)]
    pub(super) captured: CapturedOutput,
}

impl OutputAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn flags(&self) -> Vec<Flag<'_>> {
        vec![
            Flag::switch("-no-color", self.no_color),
            Flag::value("-state=", &self.state),
            Flag::switch("-json", self.json),
            Flag::value("", &self.name),
        ]
    }

    /// Terraform CLI: -no-color
    pub fn disable_output_color(&mut self) -> &mut Self {
        self.no_color = true;
        self
    }

    /// Terraform CLI: -state=path
    pub fn set_existing_state_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.state = path.into();
        self
    }

    /// Terraform CLI: -json
    pub fn set_json_output(&mut self) -> &mut Self {
        self.json = true;
        self
    }

    /// Print a single named output instead of all of them.
    /// Terraform CLI: output [options] NAME
    pub fn select_output(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }
}
