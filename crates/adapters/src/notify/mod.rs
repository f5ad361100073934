// SPDX-License-Identifier: MIT

//! Notification adapter: optional, off-path delivery of urgent/human-addressed
//! messages via an arbitrary shell template.

mod desktop;
mod noop;
mod shell;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use desktop::DesktopNotifyAdapter;
pub use noop::NoopNotifyAdapter;
pub use shell::ShellNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification send failed: {0}")]
    SendFailed(String),
}

/// Fields available to a notification template, matching the `{{.Field}}`
/// substitution tokens the shell template contract exposes.
#[derive(Debug, Clone)]
pub struct NotifyContext {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub car_id: String,
    pub priority: String,
}

/// Best-effort notification sink. Failures are logged by callers and never
/// surfaced to the message log's own callers.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, ctx: &NotifyContext) -> Result<(), NotifyError>;
}

/// Substitutes `{{.Field}}` tokens in `template` with the matching `ctx` field.
pub fn render_template(template: &str, ctx: &NotifyContext) -> String {
    template
        .replace("{{.Subject}}", &ctx.subject)
        .replace("{{.Body}}", &ctx.body)
        .replace("{{.From}}", &ctx.from)
        .replace("{{.To}}", &ctx.to)
        .replace("{{.CarID}}", &ctx.car_id)
        .replace("{{.Priority}}", &ctx.priority)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
