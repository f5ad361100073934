// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tracing::warn;

use super::{NotifyAdapter, NotifyContext, NotifyError};

/// Native OS desktop notification, fired in the background so the caller
/// never blocks on it.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "macos")]
fn set_bundle_id() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = mac_notification_sys::set_application("com.apple.Terminal");
    });
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, ctx: &NotifyContext) -> Result<(), NotifyError> {
        let title = format!("{}: {}", ctx.from, ctx.subject);
        let body = ctx.body.clone();

        let result = tokio::task::spawn_blocking(move || {
            #[cfg(target_os = "macos")]
            set_bundle_id();

            notify_rust::Notification::new()
                .summary(&title)
                .body(&body)
                .show()
        })
        .await;

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => {
                warn!(error = %e, "desktop notification failed");
                Err(NotifyError::SendFailed(e.to_string()))
            }
            Err(e) => {
                warn!(error = %e, "desktop notification task panicked");
                Err(NotifyError::SendFailed(e.to_string()))
            }
        }
    }
}
