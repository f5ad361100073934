// SPDX-License-Identifier: MIT

//! Daemon startup and shutdown (§4.I): lock acquisition, store recovery,
//! and the Yardmaster's own engine row.

use std::fs::File;
use std::sync::Arc;

use fs2::FileExt;
use railyard_core::{Clock, Engine, SystemClock, UuidIdGen};
use railyard_storage::Store;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::DaemonError;

/// Daemon state held across the lifetime of the process.
pub struct DaemonState {
    pub config: Config,
    // Held only to maintain the exclusive file lock; released on drop.
    #[allow(dead_code)]
    lock_file: File,
    pub store: Arc<Store>,
}

/// Acquire the lock, open/recover the store, and register the Yardmaster's
/// own engine row. Mirrors the teacher's lock-then-recover startup ordering.
pub fn startup(config: Config) -> Result<DaemonState, DaemonError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(config.lock_path())?;
    lock_file
        .try_lock_exclusive()
        .map_err(|e| DaemonError::LockFailed(config.lock_path(), e))?;

    std::fs::create_dir_all(config.store_dir())?;
    let store = Store::open(&config.store_dir(), Arc::new(UuidIdGen), Arc::new(SystemClock))?;

    store.upsert_engine(Engine::new_yardmaster(SystemClock.epoch_ms()))?;
    info!("yardmaster engine row registered");

    Ok(DaemonState {
        config,
        lock_file,
        store: Arc::new(store),
    })
}

/// Best-effort shutdown: deregister the Yardmaster engine row and flush a
/// final checkpoint so the next startup replays a short WAL.
pub fn shutdown(daemon: &DaemonState) {
    info!("shutting down yardmaster daemon");

    if let Err(e) = daemon.store.remove_engine(railyard_yardmaster::defaults::YARDMASTER_ID) {
        warn!(error = %e, "failed to deregister yardmaster engine row");
    }

    if let Err(e) = daemon.store.checkpoint() {
        warn!(error = %e, "failed to write final checkpoint");
    }

    info!("yardmaster daemon stopped");
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
