// SPDX-License-Identifier: MIT

use super::*;
use std::path::Path;

#[tokio::test]
async fn records_calls_in_order() {
    let adapter = FakeVcsAdapter::new();
    let repo = Path::new("/repo");

    adapter.fetch(repo).await.unwrap();
    adapter.checkout(repo, "main").await.unwrap();
    adapter.merge_no_ff(repo, "feature", "msg").await.unwrap();

    assert_eq!(
        adapter.calls(),
        vec![
            VcsCall::Fetch,
            VcsCall::Checkout("main".to_string()),
            VcsCall::MergeNoFf("feature".to_string()),
        ]
    );
}

#[tokio::test]
async fn is_ancestor_reflects_configured_pairs() {
    let adapter = FakeVcsAdapter::new();
    let repo = Path::new("/repo");
    assert!(!adapter.is_ancestor(repo, "feature", "main").await.unwrap());

    adapter.set_ancestor("feature", "main");
    assert!(adapter.is_ancestor(repo, "feature", "main").await.unwrap());
}

#[tokio::test]
async fn injected_merge_error_surfaces() {
    let adapter = FakeVcsAdapter::new();
    adapter.set_merge_error("conflict");
    let err = adapter
        .merge_no_ff(Path::new("/repo"), "feature", "msg")
        .await
        .unwrap_err();
    assert!(matches!(err, VcsError::MergeFailed(msg) if msg == "conflict"));
}
