// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{NotifyAdapter, NotifyContext, NotifyError};

/// Notifier that does nothing. The default when no notify template is configured.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifyAdapter;

impl NoopNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for NoopNotifyAdapter {
    async fn notify(&self, _ctx: &NotifyContext) -> Result<(), NotifyError> {
        Ok(())
    }
}
