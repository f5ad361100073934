// SPDX-License-Identifier: MIT

use super::*;
use railyard_core::{Car, CarStatus, CarType, FakeClock, SequentialIdGen};
use std::sync::Arc;
use tempfile::tempdir;

fn car(id: &str, kind: CarType, status: CarStatus, parent: Option<&str>) -> Car {
    Car {
        id: id.to_string(),
        title: "t".to_string(),
        description: String::new(),
        kind,
        status,
        track: "backend".to_string(),
        branch: String::new(),
        base_branch: "main".to_string(),
        assignee: String::new(),
        parent: parent.map(|p| p.to_string()),
        priority: 0,
        skip_tests: false,
        acceptance: String::new(),
        design_notes: String::new(),
        completed_at: None,
        vars: Default::default(),
    }
}

fn open_store() -> Store {
    let dir = tempdir().unwrap();
    Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap()
}

#[test]
fn closes_epic_once_all_children_resolved_and_broadcasts() {
    let store = open_store();
    store
        .create_car(car("epic-1", CarType::Epic, CarStatus::Open, None))
        .unwrap();
    store
        .create_car(car("c1", CarType::Task, CarStatus::Merged, Some("epic-1")))
        .unwrap();

    let closed = try_close_epic(&store, "epic-1").unwrap();
    assert!(closed);
    assert_eq!(store.get_car("epic-1").unwrap().status, CarStatus::Done);

    let inbox = store.inbox("yardmaster");
    assert!(inbox.iter().any(|m| m.subject == "epic-closed"));
}

#[test]
fn leaves_epic_open_when_a_child_is_outstanding() {
    let store = open_store();
    store
        .create_car(car("epic-1", CarType::Epic, CarStatus::Open, None))
        .unwrap();
    store
        .create_car(car("c1", CarType::Task, CarStatus::InProgress, Some("epic-1")))
        .unwrap();

    let closed = try_close_epic(&store, "epic-1").unwrap();
    assert!(!closed);
    assert_eq!(store.get_car("epic-1").unwrap().status, CarStatus::Open);
}

#[test]
fn recurses_into_parent_epic() {
    let store = open_store();
    store
        .create_car(car("grandparent", CarType::Epic, CarStatus::Open, None))
        .unwrap();
    store
        .create_car(car(
            "epic-1",
            CarType::Epic,
            CarStatus::Open,
            Some("grandparent"),
        ))
        .unwrap();
    store
        .create_car(car("c1", CarType::Task, CarStatus::Merged, Some("epic-1")))
        .unwrap();

    try_close_epic(&store, "epic-1").unwrap();
    assert_eq!(store.get_car("epic-1").unwrap().status, CarStatus::Done);
    assert_eq!(store.get_car("grandparent").unwrap().status, CarStatus::Done);
}
