// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{OracleAdapter, OracleError};

#[derive(Default)]
struct FakeOracleState {
    prompts: Vec<String>,
    response: String,
    error: Option<String>,
}

/// Records prompts it was asked and returns a single canned response.
#[derive(Clone)]
pub struct FakeOracleAdapter {
    state: Arc<Mutex<FakeOracleState>>,
}

impl FakeOracleAdapter {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeOracleState {
                response: response.into(),
                ..Default::default()
            })),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    pub fn set_response(&self, response: impl Into<String>) {
        self.state.lock().response = response.into();
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state.lock().error = Some(message.into());
    }
}

#[async_trait]
impl OracleAdapter for FakeOracleAdapter {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        let mut s = self.state.lock();
        s.prompts.push(prompt.to_string());
        match s.error.clone() {
            Some(e) => Err(OracleError::InvocationFailed(e)),
            None => Ok(s.response.clone()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
