use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn write_plan(&self, content: &str) {
        fs::write(self.root.path().join("terraflow.yaml"), content).unwrap();
    }

    /// `tflow` running inside the project with a clean environment
    pub fn tflow(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("tflow").unwrap();
        cmd.current_dir(self.root.path())
            .env_remove("TERRAFLOW_BIN")
            .env_remove("TERRAFLOW_PLAN_PATH")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.root.path().join(".config"));
        cmd
    }

    /// Marker file that makes the fake terraform fail `apply`
    #[allow(dead_code)]
    pub fn fail_marker(&self) -> PathBuf {
        self.root.path().join("fail-apply")
    }

    /// Every command line the fake terraform received, one per line
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Install a shell script standing in for terraform and return its path.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn install_fake_terraform(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let root = self.root.path().display().to_string();
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> "{root}/calls.log"
if [ "$1" = "apply" ] && [ -f "{root}/fail-apply" ]; then
    echo "Error: creating instance: quota exceeded" >&2
    exit 1
fi
echo "fake terraform $1 ok in $(pwd)"
"#
        );

        let path = self.root.path().join("fake-terraform");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
