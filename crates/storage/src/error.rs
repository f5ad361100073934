// SPDX-License-Identifier: MIT

//! Storage-layer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("car not found: {0}")]
    CarNotFound(String),
    #[error("engine not found: {0}")]
    EngineNotFound(String),
    #[error("message not found: {0}")]
    MessageNotFound(String),
    #[error("message already acknowledged: {0}")]
    AlreadyAcknowledged(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at offset {offset}: {message}")]
    Corrupt { offset: u64, message: String },
}
