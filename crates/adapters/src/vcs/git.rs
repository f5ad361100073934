// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::{VcsAdapter, VcsError};
use crate::subprocess::{run_with_timeout, GH_TIMEOUT, GIT_TIMEOUT};

/// Shells out to the system `git` and `gh` binaries.
#[derive(Debug, Clone, Default)]
pub struct GitVcsAdapter;

impl GitVcsAdapter {
    pub fn new() -> Self {
        Self
    }

    fn git(repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(repo).args(args);
        cmd
    }
}

fn output_text(output: &std::process::Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[async_trait]
impl VcsAdapter for GitVcsAdapter {
    async fn fetch(&self, repo: &Path) -> Result<(), VcsError> {
        let cmd = Self::git(repo, &["fetch", "--all"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git fetch --all")
            .await
            .map_err(VcsError::FetchFailed)?;
        if !output.status.success() {
            return Err(VcsError::FetchFailed(output_text(&output)));
        }
        Ok(())
    }

    async fn push_current(&self, repo: &Path) -> Result<(), VcsError> {
        let cmd = Self::git(repo, &["push", "origin", "main"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git push origin main")
            .await
            .map_err(VcsError::PushFailed)?;
        if !output.status.success() {
            return Err(VcsError::PushFailed(output_text(&output)));
        }
        Ok(())
    }

    async fn push_branch(&self, repo: &Path, branch: &str) -> Result<(), VcsError> {
        let cmd = Self::git(repo, &["push", "-u", "origin", branch]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git push -u origin <branch>")
            .await
            .map_err(VcsError::PushFailed)?;
        if !output.status.success() {
            return Err(VcsError::PushFailed(output_text(&output)));
        }
        Ok(())
    }

    async fn is_ancestor(&self, repo: &Path, branch: &str, target: &str) -> Result<bool, VcsError> {
        let cmd = Self::git(repo, &["merge-base", "--is-ancestor", branch, target]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git merge-base --is-ancestor")
            .await
            .map_err(VcsError::AncestryCheckFailed)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(VcsError::AncestryCheckFailed(output_text(&output))),
        }
    }

    async fn checkout(&self, repo: &Path, git_ref: &str) -> Result<(), VcsError> {
        let cmd = Self::git(repo, &["checkout", git_ref]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git checkout")
            .await
            .map_err(VcsError::CheckoutFailed)?;
        if !output.status.success() {
            return Err(VcsError::CheckoutFailed(output_text(&output)));
        }
        Ok(())
    }

    async fn merge_no_ff(&self, repo: &Path, branch: &str, message: &str) -> Result<(), VcsError> {
        let cmd = Self::git(repo, &["merge", "--no-ff", branch, "-m", message]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git merge --no-ff")
            .await
            .map_err(VcsError::MergeFailed)?;
        if !output.status.success() {
            return Err(VcsError::MergeFailed(output_text(&output)));
        }
        Ok(())
    }

    async fn merged_branches(&self, repo: &Path, target: &str) -> Result<HashSet<String>, VcsError> {
        let cmd = Self::git(repo, &["branch", "-a", "--merged", target]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git branch -a --merged")
            .await
            .map_err(VcsError::CommandFailed)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed(output_text(&output)));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches("* ")
                    .trim()
                    .trim_start_matches("remotes/origin/")
                    .to_string()
            })
            .filter(|b| !b.is_empty())
            .collect())
    }

    async fn detach_worktree(&self, repo: &Path, engine_id: &str) {
        let worktree_dir = repo.join("..").join(format!("worktree-{engine_id}"));
        if !worktree_dir.exists() {
            return;
        }
        let cmd = Self::git(&worktree_dir, &["checkout", "--detach", "HEAD"]);
        if let Err(e) = run_with_timeout(cmd, GIT_TIMEOUT, "git checkout --detach HEAD").await {
            warn!(engine_id, error = %e, "best-effort worktree detach failed");
        }
    }

    async fn head_commit(&self, repo: &Path) -> Result<String, VcsError> {
        let cmd = Self::git(repo, &["rev-parse", "HEAD"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git rev-parse HEAD")
            .await
            .map_err(VcsError::CommandFailed)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed(output_text(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn diff_stat(&self, repo: &Path, branch: &str) -> Result<String, VcsError> {
        let cmd = Self::git(repo, &["diff", "--stat", &format!("main...{branch}")]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git diff --stat")
            .await
            .map_err(VcsError::CommandFailed)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed(output_text(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn create_draft_pr(
        &self,
        repo: &Path,
        title: &str,
        body: &str,
        head: &str,
    ) -> Result<String, VcsError> {
        let mut cmd = Command::new("gh");
        cmd.current_dir(repo).args([
            "pr", "create", "--draft", "--title", title, "--body", body, "--head", head,
        ]);
        let output = run_with_timeout(cmd, GH_TIMEOUT, "gh pr create --draft")
            .await
            .map_err(VcsError::CommandFailed)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed(output_text(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
