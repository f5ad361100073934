// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::process::Command;

use super::{OracleAdapter, OracleError};
use crate::subprocess::{run_with_timeout, ORACLE_TIMEOUT};

/// Shells out to `claude -p <prompt>`.
#[derive(Debug, Clone, Default)]
pub struct ClaudeOracleAdapter;

impl ClaudeOracleAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OracleAdapter for ClaudeOracleAdapter {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        let mut cmd = Command::new("claude");
        cmd.args(["-p", prompt]);

        let output = run_with_timeout(cmd, ORACLE_TIMEOUT, "claude -p")
            .await
            .map_err(OracleError::InvocationFailed)?;

        if !output.status.success() {
            return Err(OracleError::InvocationFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
