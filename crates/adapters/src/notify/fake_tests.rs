// SPDX-License-Identifier: MIT

use super::*;

fn ctx() -> NotifyContext {
    NotifyContext {
        from: "yardmaster".to_string(),
        to: "human".to_string(),
        subject: "escalate".to_string(),
        body: "body".to_string(),
        car_id: "c-1".to_string(),
        priority: "urgent".to_string(),
    }
}

#[tokio::test]
async fn records_notify_calls() {
    let adapter = FakeNotifyAdapter::new();
    adapter.notify(&ctx()).await.unwrap();

    assert_eq!(
        adapter.calls(),
        vec![NotifyCall {
            from: "yardmaster".to_string(),
            to: "human".to_string(),
            subject: "escalate".to_string(),
        }]
    );
}

#[tokio::test]
async fn injected_error_surfaces() {
    let adapter = FakeNotifyAdapter::new();
    adapter.set_error("boom");
    assert!(adapter.notify(&ctx()).await.is_err());
}
