// SPDX-License-Identifier: MIT

use super::*;
use railyard_adapters::{FakeEngineCollaborator, FakeNotifyAdapter, FakeOrchestratorAdapter, OrchestratorCall};
use railyard_core::{Car, CarType, Engine, FakeClock, SequentialIdGen};
use std::sync::Arc;
use tempfile::tempdir;

fn car(id: &str, assignee: &str) -> Car {
    Car {
        id: id.to_string(),
        title: "t".to_string(),
        description: String::new(),
        kind: CarType::Task,
        status: CarStatus::InProgress,
        track: "backend".to_string(),
        branch: String::new(),
        base_branch: "main".to_string(),
        assignee: assignee.to_string(),
        parent: None,
        priority: 0,
        skip_tests: false,
        acceptance: String::new(),
        design_notes: String::new(),
        completed_at: None,
        vars: Default::default(),
    }
}

fn engine(id: &str, current_car: &str, started_at: u64) -> Engine {
    Engine {
        id: id.to_string(),
        track: "backend".to_string(),
        role: "engine".to_string(),
        status: EngineStatus::Working,
        current_car: current_car.to_string(),
        started_at,
        last_activity: started_at,
    }
}

fn open_store(clock: Arc<FakeClock>) -> Store {
    let dir = tempdir().unwrap();
    Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), clock).unwrap()
}

#[tokio::test]
async fn reassign_car_opens_car_and_broadcasts() {
    let clock = Arc::new(FakeClock::new(0));
    let store = open_store(clock);
    store.create_car(car("c1", "agent-1")).unwrap();
    let notify = FakeNotifyAdapter::new();

    reassign_car(&store, &notify, "c1", "engine-1", "stale engine").await.unwrap();

    let c = store.get_car("c1").unwrap();
    assert_eq!(c.status, CarStatus::Open);
    assert_eq!(c.assignee, "");

    let notes = store.progress_for("c1");
    assert!(notes.iter().any(|p| p.note.contains("Reassigned from engine engine-1")));

    let broadcasts = store.inbox(YARDMASTER_ID);
    assert!(broadcasts.iter().any(|m| m.subject == "reassignment"));
    assert_eq!(notify.calls().len(), 1);
}

#[tokio::test]
async fn reassign_car_missing_yields_not_found() {
    let clock = Arc::new(FakeClock::new(0));
    let store = open_store(clock);
    let notify = FakeNotifyAdapter::new();
    let err = reassign_car(&store, &notify, "nope", "engine-1", "reason").await.unwrap_err();
    assert!(matches!(err, YardmasterError::NotFound(_)));
}

#[tokio::test]
async fn sweep_reassigns_car_and_restarts_stale_engine() {
    let clock = Arc::new(FakeClock::new(0));
    let store = open_store(clock.clone());
    store.create_car(car("c1", "agent-1")).unwrap();
    store.upsert_engine(engine("engine-1", "c1", 0)).unwrap();

    clock.advance_ms(STALE_THRESHOLD_SECS * 1000 + 1);

    let collaborator = FakeEngineCollaborator::new();
    let orchestrator = FakeOrchestratorAdapter::new();
    let notify = FakeNotifyAdapter::new();

    sweep(&store, &collaborator, &orchestrator, &notify).await.unwrap();

    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Open);
    assert_eq!(store.get_engine("engine-1").unwrap().status, EngineStatus::Dead);
    assert!(orchestrator
        .calls()
        .iter()
        .any(|c| matches!(c, OrchestratorCall::RestartEngine { engine_id, .. } if engine_id == "engine-1")));
}

#[tokio::test]
async fn sweep_skips_the_yardmaster_engine_itself() {
    let clock = Arc::new(FakeClock::new(0));
    let store = open_store(clock.clone());
    store.upsert_engine(Engine::new_yardmaster(0)).unwrap();

    clock.advance_ms(STALE_THRESHOLD_SECS * 1000 + 1);

    let collaborator = FakeEngineCollaborator::new();
    let orchestrator = FakeOrchestratorAdapter::new();
    let notify = FakeNotifyAdapter::new();

    sweep(&store, &collaborator, &orchestrator, &notify).await.unwrap();

    assert_eq!(store.get_engine(YARDMASTER_ID).unwrap().status, EngineStatus::Idle);
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn sweep_marks_idle_stale_engine_dead_without_reassigning() {
    let clock = Arc::new(FakeClock::new(0));
    let store = open_store(clock.clone());
    store.upsert_engine(engine("engine-1", "", 0)).unwrap();

    clock.advance_ms(STALE_THRESHOLD_SECS * 1000 + 1);

    let collaborator = FakeEngineCollaborator::new();
    let orchestrator = FakeOrchestratorAdapter::new();
    let notify = FakeNotifyAdapter::new();

    sweep(&store, &collaborator, &orchestrator, &notify).await.unwrap();

    assert_eq!(store.get_engine("engine-1").unwrap().status, EngineStatus::Dead);
}
