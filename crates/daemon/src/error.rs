// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error("failed to acquire lock: another yardmaster running against {0}?")]
    LockFailed(std::path::PathBuf, #[source] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] railyard_storage::StoreError),
    #[error("yardmaster error: {0}")]
    Yardmaster(#[from] railyard_yardmaster::YardmasterError),
}
