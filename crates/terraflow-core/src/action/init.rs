//! `terraform init`

use super::{CapturedOutput, duration_arg, scalar};
use crate::marshal::Flag;
use serde::Deserialize;
use std::time::Duration;

/// Options for `terraform init`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitAction {
    #[serde(deserialize_with = "scalar")]
    backend: String,
    backend_config: Vec<String>,
    force_copy: bool,
    #[serde(deserialize_with = "scalar")]
    from_module: String,
    #[serde(deserialize_with = "scalar")]
    get: String,
    #[serde(deserialize_with = "scalar")]
    get_plugins: String,
    #[serde(deserialize_with = "scalar")]
    input: String,
    #[serde(deserialize_with = "scalar")]
    lock: String,
    #[serde(deserialize_with = "scalar")]
    lock_timeout: String,
    no_color: bool,
    plugin_dirs: Vec<String>,
    reconfigure: bool,
    #[serde(deserialize_with = "scalar")]
    upgrade: String,
    #[serde(deserialize_with = "scalar")]
    verify_plugins: String,

    #[serde(skip)]
    pub(super) captured: CapturedOutput,
}

impl InitAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn flags(&self) -> Vec<Flag<'_>> {
        vec![
            Flag::value("-backend=", &self.backend),
            Flag::list("-backend-config=", &self.backend_config),
            Flag::switch("-force-copy", self.force_copy),
            Flag::value("-from-module=", &self.from_module),
            Flag::value("-get=", &self.get),
            Flag::value("-get-plugins=", &self.get_plugins),
            Flag::value("-input=", &self.input),
            Flag::value("-lock=", &self.lock),
            Flag::value("-lock-timeout=", &self.lock_timeout),
            Flag::switch("-no-color", self.no_color),
            Flag::list("-plugin-dir=", &self.plugin_dirs),
            Flag::switch("-reconfigure", self.reconfigure),
            Flag::value("-upgrade=", &self.upgrade),
            Flag::value("-verify-plugins=", &self.verify_plugins),
        ]
    }

    /// Skip configuring the backend for this configuration.
    /// Terraform CLI: -backend=false
    pub fn skip_backend_configuration(&mut self) -> &mut Self {
        self.backend = "false".to_string();
        self
    }

    /// Partial backend configuration, for settings that are dynamic or
    /// sensitive and so cannot live in the configuration files. Each entry
    /// is either a path to a backend config file or a `key=value` pair.
    /// Repeated calls accumulate.
    ///
    /// ```
    /// # use terraflow_core::InitAction;
    /// let mut init = InitAction::new();
    /// init.set_backend_configuration(["address=demo.consul.io", "scheme=https"]);
    /// ```
    ///
    /// Terraform CLI: -backend-config=path, -backend-config="key=value"
    pub fn set_backend_configuration<I, S>(&mut self, configs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backend_config.extend(configs.into_iter().map(Into::into));
        self
    }

    /// Suppress prompts about copying state data.
    /// Terraform CLI: -force-copy
    pub fn force_copy_state_file(&mut self) -> &mut Self {
        self.force_copy = true;
        self
    }

    /// Terraform CLI: -from-module=SOURCE
    pub fn copy_module(&mut self, source: impl Into<String>) -> &mut Self {
        self.from_module = source.into();
        self
    }

    /// Terraform CLI: -get=false
    pub fn disable_modules_download(&mut self) -> &mut Self {
        self.get = "false".to_string();
        self
    }

    /// Terraform CLI: -get-plugins=false
    pub fn disable_plugins_download(&mut self) -> &mut Self {
        self.get_plugins = "false".to_string();
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

    /// Look for provider plugins in these directories only.
    /// Repeated calls accumulate.
    /// Terraform CLI: -plugin-dir=path
    pub fn set_plugin_dirs<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugin_dirs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Disregard any existing backend configuration, skipping state migration.
    /// Terraform CLI: -reconfigure
    pub fn disregard_existing_configuration(&mut self) -> &mut Self {
        self.reconfigure = true;
        self
    }

    /// Terraform CLI: -upgrade=true
    pub fn enable_upgrade(&mut self) -> &mut Self {
        self.upgrade = "true".to_string();
        self
    }

    /// Terraform CLI: -verify-plugins=false
    pub fn disable_plugins_verification(&mut self) -> &mut Self {
        self.verify_plugins = "false".to_string();
        self
    }
}
