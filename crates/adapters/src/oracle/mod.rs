// SPDX-License-Identifier: MIT

//! Escalation oracle adapter: `claude -p <prompt>` → stdout carrying an action token.

mod claude;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use claude::ClaudeOracleAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeOracleAdapter;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle invocation failed: {0}")]
    InvocationFailed(String),
}

/// Invokes the escalation oracle with a prepared prompt and returns its raw
/// stdout. Decision parsing (see `parse_decision`) lives with the caller so
/// the adapter stays a thin subprocess boundary.
#[async_trait]
pub trait OracleAdapter: Clone + Send + Sync + 'static {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError>;
}
