// SPDX-License-Identifier: MIT

//! Orchestrator adapter: restarting dead engines and scaling track pools.
//! The spec leaves the concrete orchestrator (a process supervisor, a job
//! scheduler, ...) external; the core only ever deals in integer target
//! counts and engine ids.

mod noop;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use noop::NoopOrchestratorAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOrchestratorAdapter, OrchestratorCall};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("restart failed: {0}")]
    RestartFailed(String),
    #[error("scale failed: {0}")]
    ScaleFailed(String),
}

#[async_trait]
pub trait OrchestratorAdapter: Clone + Send + Sync + 'static {
    /// Start a replacement engine on `track` after `engine_id` was marked dead.
    async fn restart_engine(&self, engine_id: &str, track: &str) -> Result<(), OrchestratorError>;

    /// Scale the live engine count on `track` to exactly `target_count`.
    async fn scale(&self, track: &str, target_count: u32) -> Result<(), OrchestratorError>;
}
