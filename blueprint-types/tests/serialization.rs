use blueprint_types::diff::{Change, ChangeType, DiffResult, DiffSummary};
use blueprint_types::lint::{LintResult, Violation};
use blueprint_types::profile::Profile;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn change_type_serializes_snake_case() {
    let added = serde_json::to_value(ChangeType::Added).expect("serialize");
    let removed = serde_json::to_value(ChangeType::Removed).expect("serialize");
    let modified = serde_json::to_value(ChangeType::Modified).expect("serialize");
    let unchanged = serde_json::to_value(ChangeType::Unchanged).expect("serialize");

    assert_eq!(added, json!("added"));
    assert_eq!(removed, json!("removed"));
    assert_eq!(modified, json!("modified"));
    assert_eq!(unchanged, json!("unchanged"));
}

#[test]
fn profile_serializes_snake_case() {
    assert_eq!(serde_json::to_value(Profile::Make).expect("serialize"), json!("make"));
    assert_eq!(serde_json::to_value(Profile::Legacy).expect("serialize"), json!("legacy"));
    assert_eq!(serde_json::to_value(Profile::Graph).expect("serialize"), json!("graph"));
}

#[test]
fn lint_result_wire_shape() {
    let result = LintResult::from_violations(vec![Violation::new(
        "connections.0",
        "Self-loop on 'a'",
        "no_self_loops",
    )]);
    let value = serde_json::to_value(&result).expect("serialize lint result");
    assert_eq!(
        value,
        json!({
            "ok": false,
            "violations": [
                { "path": "connections.0", "message": "Self-loop on 'a'", "rule": "no_self_loops" }
            ],
            "count": 1
        })
    );
}

#[test]
fn lint_result_tolerates_missing_violations() {
    let parsed: LintResult =
        serde_json::from_value(json!({ "ok": true, "count": 0 })).expect("deserialize");
    assert_eq!(parsed, LintResult::clean());
}

#[test]
fn diff_result_roundtrips() {
    let result = DiffResult::from_changes(vec![Change::modified(
        "version",
        json!("v1.0"),
        json!("v2.0"),
        "Changed version from 'v1.0' to 'v2.0'",
    )]);
    let text = serde_json::to_string(&result).expect("serialize diff");
    let back: DiffResult = serde_json::from_str(&text).expect("deserialize diff");
    assert_eq!(back, result);
    assert_eq!(
        back.summary,
        DiffSummary {
            total: 1,
            added: 0,
            removed: 0,
            modified: 1
        }
    );
}

#[test]
fn absent_change_sides_serialize_as_null() {
    let change = Change::added("modules.slack-action", json!({ "id": "slack-action" }), "added");
    let value = serde_json::to_value(&change).expect("serialize change");
    assert_eq!(value["old_value"], serde_json::Value::Null);
    assert_eq!(value["change_type"], json!("added"));
}
