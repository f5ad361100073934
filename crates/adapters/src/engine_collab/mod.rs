// SPDX-License-Identifier: MIT

//! Engine collaborator: heartbeat emission, deregistration, and worktree
//! lifecycle for engine processes (as opposed to the yardmaster's own
//! switch-time VCS operations, which go through `VcsAdapter`).

mod git;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use git::GitEngineCollaborator;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{EngineCollabCall, FakeEngineCollaborator};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use railyard_storage::Store;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum EngineCollabError {
    #[error("heartbeat failed: {0}")]
    HeartbeatFailed(String),
    #[error("worktree operation failed: {0}")]
    WorktreeFailed(String),
}

/// Status constants an engine row can carry, mirrored from `EngineStatus`
/// for collaborators that only speak in strings (e.g. shell scripts).
pub mod status {
    pub const IDLE: &str = "idle";
    pub const WORKING: &str = "working";
    pub const DEAD: &str = "dead";
}

#[async_trait]
pub trait EngineCollaborator: Clone + Send + Sync + 'static {
    /// Spawns a background task that bumps `engine_id`'s `last_activity`
    /// every `interval`. Errors are forwarded on the returned channel; the
    /// task stops when the receiver is dropped.
    fn start_heartbeat(
        &self,
        store: std::sync::Arc<Store>,
        engine_id: String,
        interval: Duration,
    ) -> mpsc::Receiver<EngineCollabError>;

    async fn deregister(&self, store: &Store, engine_id: &str) -> Result<(), EngineCollabError>;

    /// Best-effort removal of the engine's overlay workspace.
    async fn cleanup_overlay(&self, engine_id: &str);

    async fn sync_worktree_to_branch(&self, dir: &std::path::Path, branch: &str) -> Result<(), EngineCollabError>;

    /// Materializes (or reuses) a dedicated worktree for the yardmaster's own
    /// switch operations, returning its path.
    async fn ensure_yardmaster_worktree(&self, repo: &std::path::Path) -> Result<PathBuf, EngineCollabError>;
}
