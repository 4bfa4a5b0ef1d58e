//! Plan file discovery and loading
//!
//! A plan file is YAML describing one queue:
//!
//! ```yaml
//! binary: terraform
//! code_path: ./infra
//! env:
//!   TF_IN_AUTOMATION: "1"
//! actions:
//!   - init:
//!       input: false
//!       backend_config: ["bucket=terraform-state", "key=app"]
//!   - apply:
//!       auto_approve: true
//!       targets: [aws_instance.foo]
//!   - output:
//!       json: true
//! ```

pub mod error;

pub use error::*;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use terraflow_core::Action;

const PLAN_ENV: &str = "TERRAFLOW_PLAN_PATH";
const PLAN_DIR: &str = ".terraflow";
const CANDIDATES: [&str; 4] = [
    "terraflow.local.yaml",
    ".terraflow.local.yaml",
    "terraflow.yaml",
    ".terraflow.yaml",
];

/// Contents of a plan file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Terraform executable; defaults to `terraform` on `PATH`
    #[serde(default)]
    pub binary: Option<String>,

    /// Terraform configuration directory, relative to the plan file
    #[serde(default)]
    pub code_path: Option<PathBuf>,

    /// Extra environment for every invocation
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Actions in execution order
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A plan file together with where it was read from
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub path: PathBuf,
    pub plan: PlanFile,
}

impl LoadedPlan {
    /// Directory containing the plan file; saved queue state lives under it
    pub fn project_root(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Terraform configuration directory, resolved against the project root
    pub fn code_path(&self) -> PathBuf {
        let root = self.project_root();
        match &self.plan.code_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root,
        }
    }
}

/// Find the plan file for the current project.
///
/// Search order:
/// 1. `TERRAFLOW_PLAN_PATH`
/// 2. current directory: terraflow.local.yaml, .terraflow.local.yaml, terraflow.yaml, .terraflow.yaml
/// 3. `./.terraflow/`, same names
/// 4. `~/.config/terraflow/terraflow.yaml`
pub fn find_plan_file() -> Result<PathBuf> {
    if let Ok(plan_path) = std::env::var(PLAN_ENV) {
        let path = PathBuf::from(plan_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points at missing file {}", PLAN_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let plan_dir = current_dir.join(PLAN_DIR);
    if plan_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = plan_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("terraflow").join("terraflow.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::PlanFileNotFound)
}

/// Parse plan file contents
pub fn parse_plan(path: &Path, content: &str) -> Result<PlanFile> {
    let plan: PlanFile = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    if plan.actions.is_empty() {
        return Err(ConfigError::EmptyPlan(path.to_path_buf()));
    }

    Ok(plan)
}

/// Read and parse a plan file
pub fn load_plan(path: impl AsRef<Path>) -> Result<LoadedPlan> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let plan = parse_plan(path, &content)?;
    tracing::debug!(
        "Loaded plan {} with {} actions",
        path.display(),
        plan.actions.len()
    );
    Ok(LoadedPlan {
        path: path.to_path_buf(),
        plan,
    })
}

/// Load the given plan file, or discover one
pub fn load_plan_or_discover(path: Option<&Path>) -> Result<LoadedPlan> {
    match path {
        Some(path) => load_plan(path),
        None => load_plan(find_plan_file()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use terraflow_core::ActionKind;

    const SAMPLE: &str = r#"
binary: tofu
code_path: infra
env:
  TF_IN_AUTOMATION: "1"
actions:
  - init:
      input: false
      backend_config:
        - bucket=terraform-state
  - apply:
      auto_approve: true
      parallelism: 4
      targets: [aws_instance.foo]
  - output:
      json: true
"#;

    #[test]
    fn test_parse_sample() {
        let plan = parse_plan(Path::new("terraflow.yaml"), SAMPLE).unwrap();
        assert_eq!(plan.binary.as_deref(), Some("tofu"));
        assert_eq!(plan.env.get("TF_IN_AUTOMATION").unwrap(), "1");

        let kinds: Vec<ActionKind> = plan.actions.iter().map(|a| a.kind()).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Init, ActionKind::Apply, ActionKind::Output]
        );
        assert_eq!(
            plan.actions[0].marshal().unwrap(),
            vec!["init", "-backend-config=bucket=terraform-state", "-input=false"]
        );
        assert_eq!(
            plan.actions[1].marshal().unwrap(),
            vec![
                "apply",
                "-auto-approve",
                "-parallelism=4",
                "-target=aws_instance.foo"
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        let err = parse_plan(
            Path::new("terraflow.yaml"),
            "actions:\n  - apply:\n      yes: true\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_plan() {
        let err = parse_plan(Path::new("terraflow.yaml"), "binary: terraform\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPlan(_)));
    }

    #[test]
    fn test_code_path_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terraflow.yaml");
        fs::write(&path, SAMPLE).unwrap();

        let loaded = load_plan(&path).unwrap();
        assert_eq!(loaded.project_root(), dir.path());
        assert_eq!(loaded.code_path(), dir.path().join("infra"));
    }

    #[test]
    fn test_code_path_defaults_to_plan_dir() {
        let loaded = LoadedPlan {
            path: PathBuf::from("terraflow.yaml"),
            plan: PlanFile::default(),
        };
        assert_eq!(loaded.project_root(), PathBuf::from("."));
        assert_eq!(loaded.code_path(), PathBuf::from("."));
    }

    #[test]
    #[serial]
    fn test_find_plan_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("terraflow.yaml"), SAMPLE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_plan_file();

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("terraflow.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_plan_file_local_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("terraflow.yaml"), SAMPLE).unwrap();
        fs::write(temp_dir.path().join("terraflow.local.yaml"), SAMPLE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_plan_file();

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("terraflow.local.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_plan_file_in_plan_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let plan_dir = temp_dir.path().join(".terraflow");
        fs::create_dir(&plan_dir).unwrap();
        fs::write(plan_dir.join("terraflow.yaml"), SAMPLE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_plan_file();

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with(".terraflow/terraflow.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_plan_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let plan_path = temp_dir.path().join("custom.yaml");
        fs::write(&plan_path, SAMPLE).unwrap();

        unsafe {
            std::env::set_var(PLAN_ENV, plan_path.to_str().unwrap());
        }

        let result = find_plan_file();

        unsafe {
            std::env::remove_var(PLAN_ENV);
        }
        assert_eq!(result.unwrap(), plan_path);
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_find_plan_file_global_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_home = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let global_dir = config_home.path().join("terraflow");
        fs::create_dir(&global_dir).unwrap();
        fs::write(global_dir.join("terraflow.yaml"), SAMPLE).unwrap();

        let original_config_home = std::env::var_os("XDG_CONFIG_HOME");
        unsafe {
            std::env::remove_var(PLAN_ENV);
            std::env::set_var("XDG_CONFIG_HOME", config_home.path());
        }
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_plan_file();

        std::env::set_current_dir(original_dir).unwrap();
        unsafe {
            match original_config_home {
                Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        assert_eq!(result.unwrap(), global_dir.join("terraflow.yaml"));
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_find_plan_file_not_found_creates_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_home = temp_dir.path().join("config");
        let original_dir = std::env::current_dir().unwrap();

        let original_config_home = std::env::var_os("XDG_CONFIG_HOME");
        unsafe {
            std::env::remove_var(PLAN_ENV);
            std::env::set_var("XDG_CONFIG_HOME", &config_home);
        }
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_plan_file();

        std::env::set_current_dir(original_dir).unwrap();
        unsafe {
            match original_config_home {
                Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        assert!(matches!(result, Err(ConfigError::PlanFileNotFound)));
        assert!(!config_home.exists());
    }

    #[test]
    #[serial]
    fn test_load_plan_or_discover_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let plan_path = temp_dir.path().join("elsewhere.yaml");
        fs::write(&plan_path, SAMPLE).unwrap();

        let loaded = load_plan_or_discover(Some(&plan_path)).unwrap();
        assert_eq!(loaded.path, plan_path);
        assert_eq!(loaded.plan.actions.len(), 3);
    }
}
