// SPDX-License-Identifier: MIT

use super::*;
use railyard_adapters::{FakeNotifyAdapter, FakeOracleAdapter};
use railyard_core::{Car, CarStatus, CarType, FakeClock, SequentialIdGen};
use std::sync::Arc;
use tempfile::tempdir;

fn car(id: &str) -> Car {
    Car {
        id: id.to_string(),
        title: "fix the thing".to_string(),
        description: String::new(),
        kind: CarType::Task,
        status: CarStatus::Blocked,
        track: "backend".to_string(),
        branch: "feature/x".to_string(),
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

#[test]
fn parse_decision_reassign() {
    assert_eq!(parse_decision("REASSIGN\n"), EscalationDecision::Reassign);
}

#[test]
fn parse_decision_guidance_carries_message() {
    assert_eq!(
        parse_decision("GUIDANCE: try rebasing\n"),
        EscalationDecision::Guidance("try rebasing".to_string())
    );
}

#[test]
fn parse_decision_escalate_human_carries_message() {
    assert_eq!(
        parse_decision("ESCALATE_HUMAN: needs a human\n"),
        EscalationDecision::EscalateHuman("needs a human".to_string())
    );
}

#[test]
fn parse_decision_takes_first_matching_line() {
    assert_eq!(
        parse_decision("some preamble\nRETRY\nSKIP\n"),
        EscalationDecision::Retry
    );
}

#[test]
fn parse_decision_unrecognized_output_yields_skip_with_reason() {
    assert_eq!(
        parse_decision("I am not sure what to do here"),
        EscalationDecision::Skip("unrecognized response".to_string())
    );
}

#[test]
fn parse_decision_empty_output_yields_skip_with_reason() {
    assert_eq!(parse_decision(""), EscalationDecision::Skip("unrecognized response".to_string()));
}

#[test]
fn build_prompt_embeds_car_fields_and_recent_progress() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    store.create_car(car("c1")).unwrap();
    for i in 0..7 {
        store.add_progress("c1", "e1", &format!("note {i}"), vec![]).unwrap();
    }

    let prompt = build_prompt(
        &store,
        &EscalationRequest {
            car_id: Some("c1".to_string()),
            engine_id: Some("e1".to_string()),
            reason: "repeated-test-failure".to_string(),
            details: "3 switch attempts failed".to_string(),
        },
    );

    assert!(prompt.contains("id=c1"));
    assert!(prompt.contains("reason: repeated-test-failure"));
    assert!(prompt.contains("note 6"));
    assert!(!prompt.contains("note 1"));
    assert!(prompt.contains("REASSIGN"));
}

fn request(car_id: &str) -> EscalationRequest {
    EscalationRequest {
        car_id: Some(car_id.to_string()),
        engine_id: Some("e1".to_string()),
        reason: "repeated-test-failure".to_string(),
        details: String::new(),
    }
}

#[tokio::test]
async fn apply_reassign_opens_car_and_clears_assignee() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    let mut c = car("c1");
    c.assignee = "agent-1".to_string();
    store.create_car(c).unwrap();
    let notify = FakeNotifyAdapter::new();

    apply_decision(&store, &notify, &EscalationDecision::Reassign, &request("c1")).await.unwrap();

    let c = store.get_car("c1").unwrap();
    assert_eq!(c.status, CarStatus::Open);
    assert_eq!(c.assignee, "");
    assert!(notify.calls().is_empty());
}

#[tokio::test]
async fn apply_guidance_sends_direct_message_to_engine() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    store.create_car(car("c1")).unwrap();
    let notify = FakeNotifyAdapter::new();

    apply_decision(
        &store,
        &notify,
        &EscalationDecision::Guidance("try rebasing".to_string()),
        &request("c1"),
    )
    .await
    .unwrap();

    let inbox = store.inbox("e1");
    assert!(inbox.iter().any(|m| m.subject == "guidance" && m.body == "try rebasing"));
}

#[tokio::test]
async fn apply_escalate_human_sends_urgent_message_to_human_and_notifies() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    store.create_car(car("c1")).unwrap();
    let notify = FakeNotifyAdapter::new();

    apply_decision(
        &store,
        &notify,
        &EscalationDecision::EscalateHuman("needs attention".to_string()),
        &request("c1"),
    )
    .await
    .unwrap();

    let inbox = store.inbox(railyard_core::HUMAN);
    assert!(inbox
        .iter()
        .any(|m| m.subject == "escalation" && m.priority == railyard_core::Priority::Urgent));
    assert_eq!(notify.calls().len(), 1);
    assert_eq!(notify.calls()[0].to, railyard_core::HUMAN);
}

#[tokio::test]
async fn apply_retry_and_skip_are_no_ops() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    store.create_car(car("c1")).unwrap();
    let notify = FakeNotifyAdapter::new();

    apply_decision(&store, &notify, &EscalationDecision::Retry, &request("c1")).await.unwrap();
    apply_decision(&store, &notify, &EscalationDecision::Skip(String::new()), &request("c1")).await.unwrap();

    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Blocked);
}

#[tokio::test]
async fn run_escalation_applies_the_oracles_decision() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), Arc::new(SequentialIdGen::new("msg")), Arc::new(FakeClock::new(0))).unwrap();
    let mut c = car("c1");
    c.assignee = "agent-1".to_string();
    store.create_car(c).unwrap();

    let oracle = FakeOracleAdapter::new("REASSIGN");
    let notify = FakeNotifyAdapter::new();
    let decision = run_escalation(&store, &oracle, &notify, &request("c1")).await.unwrap();

    assert_eq!(decision, EscalationDecision::Reassign);
    assert_eq!(store.get_car("c1").unwrap().status, CarStatus::Open);
    assert_eq!(oracle.prompts().len(), 1);
}
