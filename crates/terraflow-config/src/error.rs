use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "plan file not found. Looked in:\n\
        - current directory: terraflow.local.yaml, .terraflow.local.yaml, terraflow.yaml, .terraflow.yaml\n\
        - ./.terraflow/ directory\n\
        - ~/.config/terraflow/terraflow.yaml\n\
        or point TERRAFLOW_PLAN_PATH at one directly"
    )]
    PlanFileNotFound,

    #[error("invalid plan file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("plan file {0} declares no actions")]
    EmptyPlan(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
