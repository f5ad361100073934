// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{VcsAdapter, VcsError};

/// One recorded invocation against a `FakeVcsAdapter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Fetch,
    PushCurrent,
    PushBranch(String),
    Checkout(String),
    MergeNoFf(String),
    DetachWorktree(String),
}

#[derive(Default)]
struct FakeVcsState {
    calls: Vec<VcsCall>,
    ancestors: HashSet<(String, String)>,
    merged: HashMap<String, HashSet<String>>,
    head_commit: String,
    diff_stat: String,
    fetch_error: Option<String>,
    merge_error: Option<String>,
    push_error: Option<String>,
}

/// In-memory `VcsAdapter` for tests: records calls, returns canned answers.
#[derive(Clone)]
pub struct FakeVcsAdapter {
    state: Arc<Mutex<FakeVcsState>>,
}

impl FakeVcsAdapter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeVcsState {
                head_commit: "deadbeef".to_string(),
                ..Default::default()
            })),
        }
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.state.lock().calls.clone()
    }

    pub fn set_ancestor(&self, branch: &str, target: &str) {
        self.state
            .lock()
            .ancestors
            .insert((branch.to_string(), target.to_string()));
    }

    pub fn set_merged(&self, target: &str, branches: &[&str]) {
        self.state.lock().merged.insert(
            target.to_string(),
            branches.iter().map(|b| b.to_string()).collect(),
        );
    }

    pub fn set_head_commit(&self, commit: &str) {
        self.state.lock().head_commit = commit.to_string();
    }

    pub fn set_fetch_error(&self, message: impl Into<String>) {
        self.state.lock().fetch_error = Some(message.into());
    }

    pub fn set_merge_error(&self, message: impl Into<String>) {
        self.state.lock().merge_error = Some(message.into());
    }

    pub fn set_push_error(&self, message: impl Into<String>) {
        self.state.lock().push_error = Some(message.into());
    }
}

impl Default for FakeVcsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VcsAdapter for FakeVcsAdapter {
    async fn fetch(&self, _repo: &Path) -> Result<(), VcsError> {
        let mut s = self.state.lock();
        s.calls.push(VcsCall::Fetch);
        match s.fetch_error.clone() {
            Some(e) => Err(VcsError::FetchFailed(e)),
            None => Ok(()),
        }
    }

    async fn push_current(&self, _repo: &Path) -> Result<(), VcsError> {
        let mut s = self.state.lock();
        s.calls.push(VcsCall::PushCurrent);
        match s.push_error.clone() {
            Some(e) => Err(VcsError::PushFailed(e)),
            None => Ok(()),
        }
    }

    async fn push_branch(&self, _repo: &Path, branch: &str) -> Result<(), VcsError> {
        let mut s = self.state.lock();
        s.calls.push(VcsCall::PushBranch(branch.to_string()));
        match s.push_error.clone() {
            Some(e) => Err(VcsError::PushFailed(e)),
            None => Ok(()),
        }
    }

    async fn is_ancestor(&self, _repo: &Path, branch: &str, target: &str) -> Result<bool, VcsError> {
        let s = self.state.lock();
        Ok(s.ancestors.contains(&(branch.to_string(), target.to_string())))
    }

    async fn checkout(&self, _repo: &Path, git_ref: &str) -> Result<(), VcsError> {
        self.state.lock().calls.push(VcsCall::Checkout(git_ref.to_string()));
        Ok(())
    }

    async fn merge_no_ff(&self, _repo: &Path, branch: &str, _message: &str) -> Result<(), VcsError> {
        let mut s = self.state.lock();
        s.calls.push(VcsCall::MergeNoFf(branch.to_string()));
        match s.merge_error.clone() {
            Some(e) => Err(VcsError::MergeFailed(e)),
            None => Ok(()),
        }
    }

    async fn merged_branches(&self, _repo: &Path, target: &str) -> Result<HashSet<String>, VcsError> {
        Ok(self.state.lock().merged.get(target).cloned().unwrap_or_default())
    }

    async fn detach_worktree(&self, _repo: &Path, engine_id: &str) {
        self.state.lock().calls.push(VcsCall::DetachWorktree(engine_id.to_string()));
    }

    async fn head_commit(&self, _repo: &Path) -> Result<String, VcsError> {
        Ok(self.state.lock().head_commit.clone())
    }

    async fn diff_stat(&self, _repo: &Path, _branch: &str) -> Result<String, VcsError> {
        Ok(self.state.lock().diff_stat.clone())
    }

    async fn create_draft_pr(
        &self,
        _repo: &Path,
        _title: &str,
        _body: &str,
        head: &str,
    ) -> Result<String, VcsError> {
        Ok(format!("https://example.invalid/pr/{head}"))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
