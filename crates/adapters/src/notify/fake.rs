// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{NotifyAdapter, NotifyContext, NotifyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub from: String,
    pub to: String,
    pub subject: String,
}

#[derive(Default)]
struct FakeNotifyState {
    calls: Vec<NotifyCall>,
    error: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeNotifyAdapter {
    state: Arc<Mutex<FakeNotifyState>>,
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.state.lock().calls.clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state.lock().error = Some(message.into());
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn notify(&self, ctx: &NotifyContext) -> Result<(), NotifyError> {
        let mut s = self.state.lock();
        s.calls.push(NotifyCall {
            from: ctx.from.clone(),
            to: ctx.to.clone(),
            subject: ctx.subject.clone(),
        });
        match s.error.clone() {
            Some(e) => Err(NotifyError::SendFailed(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
