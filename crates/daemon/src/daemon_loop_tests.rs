// SPDX-License-Identifier: MIT

use super::*;
use railyard_adapters::{
    EngineCollabCall, FakeEngineCollaborator, FakeNotifyAdapter, FakeOracleAdapter, FakeOrchestratorAdapter,
    FakeVcsAdapter,
};
use railyard_core::{Car, CarType, FakeClock, SequentialIdGen};
use railyard_storage::SendOptions;
use railyard_yardmaster::defaults::YARDMASTER_ID;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn car(id: &str, status: CarStatus, track: &str, branch: &str) -> Car {
    Car {
        id: id.to_string(),
        title: "fix the thing".to_string(),
        description: "does a thing".to_string(),
        kind: CarType::Task,
        status,
        track: track.to_string(),
        branch: branch.to_string(),
        base_branch: "main".to_string(),
        assignee: "agent-1".to_string(),
        parent: None,
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
    Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(1000))).unwrap()
}

fn test_config(repo_dir: &std::path::Path, test_command: &str) -> Config {
    let mut tracks = HashMap::new();
    tracks.insert(
        "backend".to_string(),
        crate::config::TrackSettings {
            max_slots: 2,
            pre_test_command: None,
            test_command: test_command.to_string(),
        },
    );
    Config {
        state_dir: repo_dir.to_path_buf(),
        repo_dir: repo_dir.to_path_buf(),
        base_branch: "main".to_string(),
        poll_interval: Duration::from_secs(30),
        stale_threshold: Duration::from_secs(60),
        max_switch_failures: 3,
        require_pr: false,
        tracks,
    }
}

fn adapters() -> Adapters<FakeVcsAdapter, FakeNotifyAdapter, FakeOrchestratorAdapter, FakeOracleAdapter, FakeEngineCollaborator> {
    Adapters {
        vcs: FakeVcsAdapter::new(),
        notify: FakeNotifyAdapter::new(),
        orchestrator: FakeOrchestratorAdapter::new(),
        oracle: FakeOracleAdapter::new("SKIP"),
        collaborator: FakeEngineCollaborator::new(),
    }
}

#[tokio::test]
async fn tick_stops_before_remaining_phases_when_draining() {
    let store = open_store();
    store.send("human", YARDMASTER_ID, "drain", "", SendOptions::default()).unwrap();
    store.create_car(car("c1", CarStatus::Done, "backend", "feature/x")).unwrap();

    let dir = tempdir().unwrap();
    let config = test_config(dir.path(), "true");
    let a = adapters();
    let mut rebalancer = Rebalancer::new();

    let ym_dir = config.repo_dir.clone();
    let outcome = tick(&store, &config, &ym_dir, &a, &mut rebalancer, 0, 1000)
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Draining);
    // Phase 3 (switching) never ran: the done car is untouched and no vcs calls happened.
    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Done);
    assert!(a.vcs.calls().is_empty());
}

#[tokio::test]
async fn switch_completed_cars_writes_progress_note_on_test_failure() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::Done, "backend", "feature/x")).unwrap();

    let dir = tempdir().unwrap();
    let config = test_config(dir.path(), "exit 1");
    let a = adapters();

    switch_completed_cars(&store, &config, &config.repo_dir.clone(), &a).await;
    // repo_dir doubles as ym_dir here since this daemon has no separate worktree.

    assert_eq!(store.switch_failure_count("c1"), 1);
    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Blocked);
}

#[tokio::test]
async fn switch_completed_cars_enqueues_reindex_and_cleans_overlay_on_merge() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::Done, "backend", "feature/x")).unwrap();

    let dir = tempdir().unwrap();
    let config = test_config(dir.path(), "true");
    let a = adapters();
    a.vcs.set_head_commit("cafef00d");

    switch_completed_cars(&store, &config, &config.repo_dir.clone(), &a).await;

    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Merged);
    assert!(a
        .collaborator
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCollabCall::CleanupOverlay(id) if id == "agent-1")));

    let jobs = store.with_state(|s| s.reindex_jobs.clone());
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].track, "backend");
    assert_eq!(jobs[0].trigger_commit, "cafef00d");
}

#[tokio::test]
async fn switch_escalation_policy_infra_failure_escalates_immediately() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::Blocked, "backend", "feature/x")).unwrap();
    let oracle = FakeOracleAdapter::new("ESCALATE: needs a human");
    let notify = FakeNotifyAdapter::new();

    switch_escalation_policy(&store, &oracle, &notify, "c1", FailureCategory::InfraFailed, 3)
        .await
        .unwrap();

    assert_eq!(oracle.prompts().len(), 1);
}

#[tokio::test]
async fn switch_escalation_policy_waits_for_repeated_failures_before_escalating() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::Blocked, "backend", "feature/x")).unwrap();
    let oracle = FakeOracleAdapter::new("SKIP");
    let notify = FakeNotifyAdapter::new();

    store.add_progress("c1", "yardmaster", "switch:test-failed:", vec![]).unwrap();
    switch_escalation_policy(&store, &oracle, &notify, "c1", FailureCategory::TestFailed, 2)
        .await
        .unwrap();
    assert!(oracle.prompts().is_empty());

    store.add_progress("c1", "yardmaster", "switch:test-failed:", vec![]).unwrap();
    switch_escalation_policy(&store, &oracle, &notify, "c1", FailureCategory::TestFailed, 2)
        .await
        .unwrap();
    assert_eq!(oracle.prompts().len(), 1);
}

#[test]
fn safety_net_unblock_auto_closes_epic_once_all_children_resolved() {
    let store = open_store();
    store
        .create_car(Car {
            kind: CarType::Epic,
            status: CarStatus::Open,
            ..car("epic-1", CarStatus::Open, "backend", "")
        })
        .unwrap();
    store
        .create_car(Car {
            parent: Some("epic-1".to_string()),
            ..car("c1", CarStatus::Done, "backend", "")
        })
        .unwrap();
    store
        .create_car(Car {
            parent: Some("epic-1".to_string()),
            status: CarStatus::Blocked,
            ..car("c2", CarStatus::Blocked, "backend", "")
        })
        .unwrap();
    store.add_dep("c2", "c1").unwrap();

    safety_net_unblock(&store, CarStatus::Done);

    assert!(!store.is_blocked("c2"));
    assert_eq!(store.get_car("epic-1").unwrap().status, CarStatus::Done);
}

#[tokio::test]
async fn reconcile_stale_branches_marks_merged_when_vcs_confirms() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::InProgress, "backend", "feature/x")).unwrap();
    store.create_car(car("c2", CarStatus::InProgress, "backend", "feature/y")).unwrap();

    let dir = tempdir().unwrap();
    let config = test_config(dir.path(), "true");
    let vcs = FakeVcsAdapter::new();
    vcs.set_merged("origin/main", &["feature/x"]);

    reconcile_stale_branches(&store, &config, &vcs).await;

    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Merged);
    assert_eq!(store.get_car("c2").unwrap().status, CarStatus::InProgress);
}

#[tokio::test]
async fn reconcile_stale_branches_skips_when_fetch_fails() {
    let store = open_store();
    store.create_car(car("c1", CarStatus::InProgress, "backend", "feature/x")).unwrap();

    let dir = tempdir().unwrap();
    let config = test_config(dir.path(), "true");
    let vcs = FakeVcsAdapter::new();
    vcs.set_fetch_error("network down");
    vcs.set_merged("origin/main", &["feature/x"]);

    reconcile_stale_branches(&store, &config, &vcs).await;

    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::InProgress);
}
