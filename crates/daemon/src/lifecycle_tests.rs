// SPDX-License-Identifier: MIT

use super::*;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::tempdir;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        repo_dir: dir.join("repo"),
        base_branch: "main".to_string(),
        poll_interval: Duration::from_secs(30),
        stale_threshold: Duration::from_secs(60),
        max_switch_failures: 3,
        require_pr: false,
        tracks: HashMap::new(),
    }
}

#[test]
fn startup_registers_yardmaster_engine_row() {
    let dir = tempdir().unwrap();
    let daemon = startup(test_config(dir.path())).unwrap();

    let engine = daemon.store.get_engine(railyard_yardmaster::defaults::YARDMASTER_ID).unwrap();
    assert_eq!(engine.role, "yardmaster");
    assert!(dir.path().join("daemon.lock").exists());
}

#[test]
fn second_startup_against_same_state_dir_fails_to_lock() {
    let dir = tempdir().unwrap();
    let _daemon = startup(test_config(dir.path())).unwrap();

    let err = startup(test_config(dir.path())).unwrap_err();
    assert!(matches!(err, DaemonError::LockFailed(_, _)));
}

#[test]
fn shutdown_deregisters_engine_and_checkpoints() {
    let dir = tempdir().unwrap();
    let daemon = startup(test_config(dir.path())).unwrap();

    shutdown(&daemon);

    assert!(daemon.store.get_engine(railyard_yardmaster::defaults::YARDMASTER_ID).is_none());
    assert!(dir.path().join("store").join("state.snapshot").exists());
}
