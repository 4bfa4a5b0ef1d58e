//! Persisted queue state
//!
//! Keeps `.terraflow/state.json` under a project directory so a queue that
//! stopped on a failure can resume from the same action in a later process.
//! The saved cursor only applies while the queued command lines are unchanged.

use crate::error::{Result, TerraformError};
use crate::terraform::Terraform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".terraflow";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";

/// Saved cursor of a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    /// State file version
    pub version: u32,

    /// Index of the next action to execute
    pub head: usize,

    /// Marshaled argument lists of the queue the cursor belongs to
    pub fingerprint: Vec<Vec<String>>,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,
}

impl QueueState {
    /// Snapshot the cursor of a queue.
    pub fn capture(terraform: &Terraform) -> Result<Self> {
        Ok(Self {
            version: STATE_VERSION,
            head: terraform.head(),
            fingerprint: terraform.command_lines()?,
            updated_at: Utc::now(),
        })
    }

    /// Whether this state was saved for the same queue.
    pub fn matches(&self, terraform: &Terraform) -> Result<bool> {
        Ok(self.fingerprint == terraform.command_lines()?)
    }
}

/// Reads and writes queue state files
pub struct StateManager {
    /// Project root directory
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    /// Path of the state file
    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the saved state, if any
    pub async fn load(&self) -> Result<Option<QueueState>> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let state: QueueState = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(TerraformError::State(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded state with head {}", state.head);
        Ok(Some(state))
    }

    /// Save the cursor of `terraform`, keeping a backup of the previous file
    pub async fn save(&self, terraform: &Terraform) -> Result<QueueState> {
        self.ensure_state_dir().await?;

        let state = QueueState::capture(terraform)?;
        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(&state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state with head {}", state.head);
        Ok(state)
    }

    /// Move `terraform`'s cursor to the saved head when the saved state
    /// belongs to the same queue. Returns the restored head.
    pub async fn restore(&self, terraform: &mut Terraform) -> Result<Option<usize>> {
        let Some(state) = self.load().await? else {
            return Ok(None);
        };

        if !state.matches(terraform)? {
            tracing::warn!(
                "Saved state from {} does not match the current queue, starting from the first action",
                state.updated_at
            );
            return Ok(None);
        }

        terraform.set_head(state.head)?;
        tracing::info!("Resuming queue at index: {}", state.head);
        Ok(Some(state.head))
    }

    /// Remove saved state and its backup
    pub async fn clear(&self) -> Result<bool> {
        let path = self.state_path();
        let existed = path.exists();
        if existed {
            fs::remove_file(&path).await?;
        }
        let backup = self.backup_path();
        if backup.exists() {
            fs::remove_file(&backup).await?;
        }
        tracing::debug!("Cleared state");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, ApplyAction, InitAction};
    use crate::terraform::with_actions;
    use tempfile::tempdir;

    fn queue() -> Terraform {
        let mut apply = ApplyAction::new();
        apply.enable_auto_approve();
        Terraform::new([with_actions([
            Action::from(InitAction::new()),
            Action::from(apply),
        ])])
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_restore() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut t = queue();
        t.set_head(1).unwrap();
        let saved = manager.save(&t).await.unwrap();
        assert_eq!(saved.head, 1);

        let mut fresh = queue();
        let restored = manager.restore(&mut fresh).await.unwrap();
        assert_eq!(restored, Some(1));
        assert_eq!(fresh.head(), 1);
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        assert!(manager.load().await.unwrap().is_none());
        let mut t = queue();
        assert_eq!(manager.restore(&mut t).await.unwrap(), None);
        assert_eq!(t.head(), 0);
    }

    #[tokio::test]
    async fn test_changed_queue_is_not_resumed() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut t = queue();
        t.set_head(2).unwrap();
        manager.save(&t).await.unwrap();

        let mut changed = queue();
        changed.amend(InitAction::new());
        assert_eq!(manager.restore(&mut changed).await.unwrap(), None);
        assert_eq!(changed.head(), 0);
    }

    #[tokio::test]
    async fn test_second_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut t = queue();
        manager.save(&t).await.unwrap();
        t.set_head(2).unwrap();
        manager.save(&t).await.unwrap();

        let backup = temp_dir.path().join(".terraflow").join("state.json.backup");
        let content = std::fs::read_to_string(backup).unwrap();
        let previous: QueueState = serde_json::from_str(&content).unwrap();
        assert_eq!(previous.head, 0);
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());
        let mut state = QueueState::capture(&queue()).unwrap();
        state.version = STATE_VERSION + 1;

        std::fs::create_dir_all(temp_dir.path().join(".terraflow")).unwrap();
        std::fs::write(
            manager.state_path(),
            serde_json::to_string(&state).unwrap(),
        )
        .unwrap();

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, TerraformError::State(_)));
    }

    #[tokio::test]
    async fn test_clear() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());
        manager.save(&queue()).await.unwrap();

        assert!(manager.clear().await.unwrap());
        assert!(!manager.state_path().exists());
        assert!(!manager.clear().await.unwrap());
    }
}
