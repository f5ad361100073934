// SPDX-License-Identifier: MIT

use super::*;

fn ctx() -> NotifyContext {
    NotifyContext {
        from: "yardmaster".to_string(),
        to: "human".to_string(),
        subject: "test-failure".to_string(),
        body: "3 tests failed".to_string(),
        car_id: "c-42".to_string(),
        priority: "urgent".to_string(),
    }
}

#[test]
fn render_template_substitutes_all_tokens() {
    let rendered = render_template(
        "{{.From}} -> {{.To}} [{{.Priority}}] {{.Subject}}: {{.Body}} ({{.CarID}})",
        &ctx(),
    );
    assert_eq!(
        rendered,
        "yardmaster -> human [urgent] test-failure: 3 tests failed (c-42)"
    );
}

#[test]
fn render_template_leaves_unknown_tokens_untouched() {
    let rendered = render_template("{{.Unknown}} {{.Subject}}", &ctx());
    assert_eq!(rendered, "{{.Unknown}} test-failure");
}
