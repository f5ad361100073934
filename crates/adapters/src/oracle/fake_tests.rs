// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn returns_configured_response_and_records_prompt() {
    let adapter = FakeOracleAdapter::new("RETRY");
    let response = adapter.ask("what now").await.unwrap();
    assert_eq!(response, "RETRY");
    assert_eq!(adapter.prompts(), vec!["what now".to_string()]);
}

#[tokio::test]
async fn injected_error_surfaces() {
    let adapter = FakeOracleAdapter::new("RETRY");
    adapter.set_error("no quota");
    let err = adapter.ask("x").await.unwrap_err();
    assert!(matches!(err, OracleError::InvocationFailed(msg) if msg == "no quota"));
}
