// SPDX-License-Identifier: MIT

//! Subprocess execution helpers shared by the VCS and escalation adapters.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for `git fetch`/`git push`/worktree operations.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for `gh pr` operations.
pub const GH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a track's test command.
pub const TEST_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Default timeout for the escalation oracle subprocess.
pub const ORACLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Run a subprocess with a timeout, converting expiry into a descriptive error.
/// The child is killed on drop if the timeout elapses.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{description} failed: {io_err}")),
        Err(_elapsed) => Err(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
