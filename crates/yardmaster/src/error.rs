// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Error taxonomy surfaced at the yardmaster's boundaries (switch engine,
/// liveness controller, inbox dispatcher, rebalancer).
#[derive(Debug, Error)]
pub enum YardmasterError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("vcs failure: {0}")]
    VcsFailure(String),
    #[error("test failure: {0}")]
    TestFailure(String),
    #[error("infra failure: {0}")]
    InfraFailure(String),
    #[error("pr failure: {0}")]
    PrFailure(String),
    #[error("escalation failure: {0}")]
    EscalationFailure(String),
    #[error("store failure: {0}")]
    StoreFailure(#[from] railyard_storage::StoreError),
}

impl From<railyard_adapters::VcsError> for YardmasterError {
    fn from(e: railyard_adapters::VcsError) -> Self {
        YardmasterError::VcsFailure(e.to_string())
    }
}

impl From<railyard_adapters::OracleError> for YardmasterError {
    fn from(e: railyard_adapters::OracleError) -> Self {
        YardmasterError::EscalationFailure(e.to_string())
    }
}
