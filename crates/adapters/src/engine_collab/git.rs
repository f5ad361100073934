// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use railyard_storage::Store;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::warn;

use super::{EngineCollabError, EngineCollaborator};
use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};

/// Drives engine worktrees through plain `git worktree` subprocess calls.
#[derive(Debug, Clone, Default)]
pub struct GitEngineCollaborator;

impl GitEngineCollaborator {
    pub fn new() -> Self {
        Self
    }

    fn worktree_dir(repo: &Path, engine_id: &str) -> PathBuf {
        repo.join("..").join(format!("worktree-{engine_id}"))
    }
}

#[async_trait]
impl EngineCollaborator for GitEngineCollaborator {
    fn start_heartbeat(
        &self,
        store: Arc<Store>,
        engine_id: String,
        interval: Duration,
    ) -> mpsc::Receiver<EngineCollabError> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = store.heartbeat(&engine_id) {
                    if tx
                        .send(EngineCollabError::HeartbeatFailed(e.to_string()))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
            }
        });
        rx
    }

    async fn deregister(&self, store: &Store, engine_id: &str) -> Result<(), EngineCollabError> {
        store
            .remove_engine(engine_id)
            .map_err(|e| EngineCollabError::HeartbeatFailed(e.to_string()))
    }

    async fn cleanup_overlay(&self, engine_id: &str) {
        let dir = std::env::temp_dir().join(format!("railyard-overlay-{engine_id}"));
        if dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
                warn!(engine_id, error = %e, "best-effort overlay cleanup failed");
            }
        }
    }

    async fn sync_worktree_to_branch(&self, dir: &Path, branch: &str) -> Result<(), EngineCollabError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir).args(["checkout", branch]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git checkout <branch>")
            .await
            .map_err(EngineCollabError::WorktreeFailed)?;
        if !output.status.success() {
            return Err(EngineCollabError::WorktreeFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }

    async fn ensure_yardmaster_worktree(&self, repo: &Path) -> Result<PathBuf, EngineCollabError> {
        let dir = Self::worktree_dir(repo, "yardmaster");
        if dir.exists() {
            return Ok(dir);
        }

        let mut cmd = Command::new("git");
        cmd.current_dir(repo)
            .args(["worktree", "add", "--detach", &dir.to_string_lossy()]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree add")
            .await
            .map_err(EngineCollabError::WorktreeFailed)?;
        if !output.status.success() {
            return Err(EngineCollabError::WorktreeFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(dir)
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
