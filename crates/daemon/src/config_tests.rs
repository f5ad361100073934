// SPDX-License-Identifier: MIT

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn loads_minimal_config_with_defaults() {
    let f = write_toml(
        r#"
        state_dir = "/tmp/railyard-state"
        repo_dir = "/tmp/railyard-repo"
        "#,
    );

    let cfg = Config::load(f.path()).unwrap();
    assert_eq!(cfg.base_branch, "main");
    assert_eq!(cfg.poll_interval, Duration::from_secs(30));
    assert_eq!(cfg.stale_threshold, Duration::from_secs(60));
    assert_eq!(cfg.max_switch_failures, 3);
    assert!(!cfg.require_pr);
    assert!(cfg.tracks.is_empty());
}

#[test]
fn loads_track_overrides() {
    let f = write_toml(
        r#"
        state_dir = "/tmp/railyard-state"
        repo_dir = "/tmp/railyard-repo"
        poll_interval_secs = 10
        max_switch_failures = 5

        [track.backend]
        max_slots = 4
        test_command = "cargo test"
        pre_test_command = "cargo fmt --check"
        "#,
    );

    let cfg = Config::load(f.path()).unwrap();
    assert_eq!(cfg.poll_interval, Duration::from_secs(10));
    assert_eq!(cfg.max_switch_failures, 5);

    let backend = cfg.track_settings("backend");
    assert_eq!(backend.max_slots, 4);
    assert_eq!(backend.test_command, "cargo test");
    assert_eq!(backend.pre_test_command.as_deref(), Some("cargo fmt --check"));
}

#[test]
fn unconfigured_track_falls_back_to_default_test_command() {
    let f = write_toml(
        r#"
        state_dir = "/tmp/railyard-state"
        repo_dir = "/tmp/railyard-repo"
        "#,
    );

    let cfg = Config::load(f.path()).unwrap();
    let frontend = cfg.track_settings("frontend");
    assert_eq!(frontend.max_slots, 1);
    assert_eq!(frontend.test_command, railyard_yardmaster::defaults::DEFAULT_TEST_COMMAND);
    assert!(frontend.pre_test_command.is_none());
}

#[test]
fn empty_state_dir_is_rejected() {
    let f = write_toml(
        r#"
        state_dir = ""
        repo_dir = "/tmp/railyard-repo"
        "#,
    );

    let err = Config::load(f.path()).unwrap_err();
    assert!(matches!(err, DaemonError::Config(_)));
}

#[test]
fn derived_paths_live_under_state_dir() {
    let f = write_toml(
        r#"
        state_dir = "/tmp/railyard-state"
        repo_dir = "/tmp/railyard-repo"
        "#,
    );

    let cfg = Config::load(f.path()).unwrap();
    assert_eq!(cfg.lock_path(), PathBuf::from("/tmp/railyard-state/daemon.lock"));
    assert_eq!(cfg.store_dir(), PathBuf::from("/tmp/railyard-state/store"));
    assert_eq!(cfg.log_path(), PathBuf::from("/tmp/railyard-state/daemon.log"));
}
