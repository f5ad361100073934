// SPDX-License-Identifier: MIT

use super::*;
use railyard_core::{Engine, EngineStatus, FakeClock, SequentialIdGen};
use tempfile::tempdir;

#[tokio::test]
async fn deregister_records_call_and_removes_row() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    store
        .upsert_engine(Engine {
            id: "e1".into(),
            track: "backend".into(),
            role: "engine".into(),
            status: EngineStatus::Idle,
            current_car: String::new(),
            started_at: 0,
            last_activity: 0,
        })
        .unwrap();

    let collab = FakeEngineCollaborator::new();
    collab.deregister(&store, "e1").await.unwrap();

    assert_eq!(collab.calls(), vec![EngineCollabCall::Deregister("e1".to_string())]);
    assert!(store.get_engine("e1").is_none());
}

#[tokio::test]
async fn sync_worktree_records_branch() {
    let collab = FakeEngineCollaborator::new();
    collab.sync_worktree_to_branch(Path::new("/x"), "feature").await.unwrap();
    assert_eq!(
        collab.calls(),
        vec![EngineCollabCall::SyncWorktree {
            branch: "feature".to_string()
        }]
    );
}
