// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::{render_template, NotifyAdapter, NotifyContext, NotifyError};

/// Runs an operator-configured shell template, with tokens substituted from
/// the notification's fields. If `TMUX` is set in the environment, also
/// fires `tmux display-message "<From>: <Subject>"` as a secondary, silent
/// best-effort channel.
#[derive(Debug, Clone)]
pub struct ShellNotifyAdapter {
    template: String,
}

impl ShellNotifyAdapter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    async fn dispatch_tmux(ctx: &NotifyContext) {
        if std::env::var_os("TMUX").is_none() {
            return;
        }
        let message = format!("{}: {}", ctx.from, ctx.subject);
        let result = Command::new("tmux")
            .args(["display-message", &message])
            .output()
            .await;
        if let Err(e) = result {
            warn!(error = %e, "tmux display-message failed");
        }
    }
}

#[async_trait]
impl NotifyAdapter for ShellNotifyAdapter {
    async fn notify(&self, ctx: &NotifyContext) -> Result<(), NotifyError> {
        let command = render_template(&self.template, ctx);

        Self::dispatch_tmux(ctx).await;

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(NotifyError::SendFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
