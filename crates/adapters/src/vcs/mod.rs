// SPDX-License-Identifier: MIT

//! VCS adapter: the only git/gh shell-outs the switch engine performs.

mod git;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use git::GitVcsAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeVcsAdapter, VcsCall};

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("push failed: {0}")]
    PushFailed(String),
    #[error("checkout failed: {0}")]
    CheckoutFailed(String),
    #[error("merge failed: {0}")]
    MergeFailed(String),
    #[error("ancestry check failed: {0}")]
    AncestryCheckFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// The VCS operations the switch engine and stale-branch reconciliation need.
/// All operations are scoped to a repository checkout at `repo`.
#[async_trait]
pub trait VcsAdapter: Clone + Send + Sync + 'static {
    async fn fetch(&self, repo: &Path) -> Result<(), VcsError>;
    async fn push_current(&self, repo: &Path) -> Result<(), VcsError>;
    async fn push_branch(&self, repo: &Path, branch: &str) -> Result<(), VcsError>;

    /// True when `branch`'s tip is reachable from `target`.
    async fn is_ancestor(&self, repo: &Path, branch: &str, target: &str) -> Result<bool, VcsError>;

    async fn checkout(&self, repo: &Path, git_ref: &str) -> Result<(), VcsError>;
    async fn merge_no_ff(&self, repo: &Path, branch: &str, message: &str) -> Result<(), VcsError>;

    /// Branches whose tip is reachable from `target`, with `remotes/origin/`
    /// stripped and whitespace trimmed.
    async fn merged_branches(&self, repo: &Path, target: &str) -> Result<HashSet<String>, VcsError>;

    /// Best-effort: detach HEAD in the given engine's worktree if it sits on
    /// the branch about to be merged elsewhere. Silent on absent/detached worktrees.
    async fn detach_worktree(&self, repo: &Path, engine_id: &str);

    async fn head_commit(&self, repo: &Path) -> Result<String, VcsError>;

    /// `main...branch` diffstat, used to build PR bodies.
    async fn diff_stat(&self, repo: &Path, branch: &str) -> Result<String, VcsError>;

    /// Open a draft PR via the hosted-VCS client; returns the PR URL.
    async fn create_draft_pr(
        &self,
        repo: &Path,
        title: &str,
        body: &str,
        head: &str,
    ) -> Result<String, VcsError>;
}
