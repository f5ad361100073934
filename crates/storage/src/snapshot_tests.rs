// SPDX-License-Identifier: MIT

use super::*;
use crate::MaterializedState;
use railyard_core::{Car, CarStatus, CarType};
use std::io::Write;
use tempfile::tempdir;

fn car(id: &str) -> Car {
    Car {
        id: id.to_string(),
        title: "t".to_string(),
        description: String::new(),
        kind: CarType::Task,
        status: CarStatus::Open,
        track: "backend".to_string(),
        branch: String::new(),
        base_branch: "main".to_string(),
        assignee: String::new(),
        parent: None,
        priority: 0,
        skip_tests: false,
        acceptance: String::new(),
        design_notes: String::new(),
        completed_at: None,
        vars: Default::default(),
    }
}

#[test]
fn save_and_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.snapshot");

    let mut state = MaterializedState::default();
    state.cars.insert("c1".to_string(), car("c1"));

    let snapshot = Snapshot::new(42, state);
    snapshot.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(loaded.seq, 42);
    assert_eq!(loaded.state.cars.len(), 1);
}

#[test]
fn load_missing_file_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.snapshot");
    assert!(Snapshot::load(&path).unwrap().is_none());
}

#[test]
fn save_does_not_leave_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.snapshot");
    let tmp_path = path.with_extension("tmp");

    Snapshot::new(1, MaterializedState::default()).save(&path).unwrap();

    assert!(!tmp_path.exists());
    assert!(path.exists());
}

#[test]
fn load_corrupt_snapshot_rotates_to_bak_and_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.snapshot");

    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(b"not json").unwrap();
    drop(f);

    let result = Snapshot::load(&path).unwrap();
    assert!(result.is_none());
    assert!(!path.exists());
    assert!(path.with_extension("bak").exists());
}
