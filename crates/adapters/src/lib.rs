// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! railyard-adapters: the collaborator traits the core consumes (VCS,
//! escalation oracle, notifications, orchestrator, engine lifecycle) plus
//! their real and fake implementations.

pub mod engine_collab;
pub mod notify;
pub mod oracle;
pub mod orchestrator;
pub mod subprocess;
pub mod vcs;

pub use engine_collab::{status as engine_status, EngineCollabError, EngineCollaborator, GitEngineCollaborator};
pub use notify::{
    render_template, DesktopNotifyAdapter, NoopNotifyAdapter, NotifyAdapter, NotifyContext,
    NotifyError, ShellNotifyAdapter,
};
pub use oracle::{ClaudeOracleAdapter, OracleAdapter, OracleError};
pub use orchestrator::{NoopOrchestratorAdapter, OrchestratorAdapter, OrchestratorError};
pub use vcs::{GitVcsAdapter, VcsAdapter, VcsError};

#[cfg(any(test, feature = "test-support"))]
pub use engine_collab::{EngineCollabCall, FakeEngineCollaborator};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use oracle::FakeOracleAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use orchestrator::{FakeOrchestratorAdapter, OrchestratorCall};
#[cfg(any(test, feature = "test-support"))]
pub use vcs::{FakeVcsAdapter, VcsCall};
