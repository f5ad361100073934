// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tracing::info;

use super::{OrchestratorAdapter, OrchestratorError};

/// Logs the requested action and does nothing else. Suitable when engines
/// are supervised out-of-band (e.g. by a process manager watching the
/// engine rows directly).
#[derive(Debug, Clone, Default)]
pub struct NoopOrchestratorAdapter;

impl NoopOrchestratorAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrchestratorAdapter for NoopOrchestratorAdapter {
    async fn restart_engine(&self, engine_id: &str, track: &str) -> Result<(), OrchestratorError> {
        info!(engine_id, track, "restart_engine requested (noop orchestrator)");
        Ok(())
    }

    async fn scale(&self, track: &str, target_count: u32) -> Result<(), OrchestratorError> {
        info!(track, target_count, "scale requested (noop orchestrator)");
        Ok(())
    }
}
