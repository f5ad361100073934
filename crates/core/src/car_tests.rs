// SPDX-License-Identifier: MIT

use super::*;

fn base_car() -> Car {
    Car {
        id: "car-1".into(),
        title: "title".into(),
        description: "desc".into(),
        kind: CarType::Task,
        status: CarStatus::Open,
        track: "backend".into(),
        branch: String::new(),
        base_branch: "main".into(),
        assignee: String::new(),
        parent: None,
        priority: 0,
        skip_tests: false,
        acceptance: String::new(),
        design_notes: String::new(),
        completed_at: None,
        vars: HashMap::new(),
    }
}

#[test]
fn terminal_statuses() {
    assert!(CarStatus::Merged.is_terminal());
    assert!(CarStatus::Cancelled.is_terminal());
    assert!(!CarStatus::Done.is_terminal());
    assert!(!CarStatus::Open.is_terminal());
}

#[test]
fn unblocks_dependents_set() {
    assert!(CarStatus::Done.unblocks_dependents());
    assert!(CarStatus::Merged.unblocks_dependents());
    assert!(CarStatus::Cancelled.unblocks_dependents());
    assert!(!CarStatus::Blocked.unblocks_dependents());
    assert!(!CarStatus::Open.unblocks_dependents());
}

#[test]
fn assignee_invariant_allows_empty_in_any_status() {
    let car = base_car();
    assert!(car.assignee_invariant_holds());
}

#[test]
fn assignee_invariant_requires_active_status_when_assigned() {
    let mut car = base_car();
    car.assignee = "eng-1".into();
    car.status = CarStatus::InProgress;
    assert!(car.assignee_invariant_holds());

    car.status = CarStatus::Done;
    assert!(!car.assignee_invariant_holds());
}

#[test]
fn is_epic_checks_kind() {
    let mut car = base_car();
    assert!(!car.is_epic());
    car.kind = CarType::Epic;
    assert!(car.is_epic());
}

#[test]
fn display_matches_wire_format() {
    assert_eq!(CarStatus::PrOpen.to_string(), "pr_open");
    assert_eq!(CarStatus::MergeFailed.to_string(), "merge-failed");
}
