// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{OrchestratorAdapter, OrchestratorError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorCall {
    RestartEngine { engine_id: String, track: String },
    Scale { track: String, target_count: u32 },
}

#[derive(Default)]
struct FakeOrchestratorState {
    calls: Vec<OrchestratorCall>,
    restart_error: Option<String>,
    scale_error: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeOrchestratorAdapter {
    state: Arc<Mutex<FakeOrchestratorState>>,
}

impl FakeOrchestratorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<OrchestratorCall> {
        self.state.lock().calls.clone()
    }

    pub fn set_restart_error(&self, message: impl Into<String>) {
        self.state.lock().restart_error = Some(message.into());
    }

    pub fn set_scale_error(&self, message: impl Into<String>) {
        self.state.lock().scale_error = Some(message.into());
    }
}

#[async_trait]
impl OrchestratorAdapter for FakeOrchestratorAdapter {
    async fn restart_engine(&self, engine_id: &str, track: &str) -> Result<(), OrchestratorError> {
        let mut s = self.state.lock();
        s.calls.push(OrchestratorCall::RestartEngine {
            engine_id: engine_id.to_string(),
            track: track.to_string(),
        });
        match s.restart_error.clone() {
            Some(e) => Err(OrchestratorError::RestartFailed(e)),
            None => Ok(()),
        }
    }

    async fn scale(&self, track: &str, target_count: u32) -> Result<(), OrchestratorError> {
        let mut s = self.state.lock();
        s.calls.push(OrchestratorCall::Scale {
            track: track.to_string(),
            target_count,
        });
        match s.scale_error.clone() {
            Some(e) => Err(OrchestratorError::ScaleFailed(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
