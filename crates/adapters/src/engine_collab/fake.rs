// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use railyard_storage::Store;
use tokio::sync::mpsc;

use super::{EngineCollabError, EngineCollaborator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCollabCall {
    Deregister(String),
    CleanupOverlay(String),
    SyncWorktree { branch: String },
}

#[derive(Default)]
struct FakeEngineCollabState {
    calls: Vec<EngineCollabCall>,
}

#[derive(Clone, Default)]
pub struct FakeEngineCollaborator {
    state: Arc<Mutex<FakeEngineCollabState>>,
}

impl FakeEngineCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCollabCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl EngineCollaborator for FakeEngineCollaborator {
    fn start_heartbeat(
        &self,
        _store: Arc<Store>,
        _engine_id: String,
        _interval: Duration,
    ) -> mpsc::Receiver<EngineCollabError> {
        let (_tx, rx) = mpsc::channel(1);
        rx
    }

    async fn deregister(&self, store: &Store, engine_id: &str) -> Result<(), EngineCollabError> {
        self.state
            .lock()
            .calls
            .push(EngineCollabCall::Deregister(engine_id.to_string()));
        store
            .remove_engine(engine_id)
            .map_err(|e| EngineCollabError::HeartbeatFailed(e.to_string()))
    }

    async fn cleanup_overlay(&self, engine_id: &str) {
        self.state
            .lock()
            .calls
            .push(EngineCollabCall::CleanupOverlay(engine_id.to_string()));
    }

    async fn sync_worktree_to_branch(&self, _dir: &Path, branch: &str) -> Result<(), EngineCollabError> {
        self.state.lock().calls.push(EngineCollabCall::SyncWorktree {
            branch: branch.to_string(),
        });
        Ok(())
    }

    async fn ensure_yardmaster_worktree(&self, repo: &Path) -> Result<PathBuf, EngineCollabError> {
        Ok(repo.join("fake-yardmaster-worktree"))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
