use blueprint_core::pipeline::{Linter, RepairStatus, ToolError, run_diff, run_lint};
use blueprint_core::settings::{LintSettings, RepairSettings};
use blueprint_types::{Profile, lint::SCHEMA_RULE};
use camino::Utf8PathBuf;
use fs_err as fs;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn mock_blueprint() -> Value {
    json!({
        "version": "v1.0",
        "triggerId": "gmail-trigger",
        "modules": [
            { "id": "gmail-trigger", "type": "trigger", "name": "Gmail Trigger", "params": { "app": "Gmail" } },
            { "id": "slack-action", "type": "action", "name": "Slack Action", "params": { "channel": "#leads" } }
        ],
        "connections": [ { "from": "gmail-trigger", "to": "slack-action" } ]
    })
}

fn make_linter() -> Linter {
    Linter::for_profile(Profile::Make).expect("embedded schema compiles")
}

#[test]
fn mock_blueprint_is_clean() {
    let result = make_linter().lint(&mock_blueprint());
    assert!(result.ok);
    assert_eq!(result.count, 0);
}

#[test]
fn schema_failures_gate_rules() {
    // triggerId has the wrong type and there is a self-loop: only the schema finding surfaces.
    let mut doc = mock_blueprint();
    doc["triggerId"] = json!(7);
    doc["connections"] = json!([ { "from": "slack-action", "to": "slack-action" } ]);

    let result = make_linter().lint(&doc);
    assert!(!result.ok);
    assert!(result.violations.iter().all(|v| v.rule == SCHEMA_RULE));
    assert_eq!(result.violations[0].path, "triggerId");
}

#[test]
fn ok_iff_no_violations() {
    let linter = make_linter();
    for doc in [mock_blueprint(), json!({}), json!([]), json!("text")] {
        let result = linter.lint(&doc);
        assert_eq!(result.ok, result.violations.is_empty());
        assert_eq!(result.count as usize, result.violations.len());
    }
}

#[test]
fn missing_entrypoint_fails() {
    let mut doc = mock_blueprint();
    doc["modules"][0]["type"] = json!("action");
    let result = make_linter().lint(&doc);
    assert!(result.has_rule("entrypoint_exists"));
}

#[test]
fn two_node_cycle_fails() {
    let mut doc = mock_blueprint();
    doc["connections"]
        .as_array_mut()
        .expect("connections")
        .push(json!({ "from": "slack-action", "to": "gmail-trigger" }));
    let result = make_linter().lint(&doc);
    assert_eq!(result.rules(), vec!["no_two_node_cycles"]);
    assert_eq!(
        result.violations[0].message,
        "2-node cycle between gmail-trigger and slack-action"
    );
}

#[test]
fn nameless_graph_fails() {
    let mut doc = json!({
        "modules": [
            { "id": "webhook-in", "type": "webhook", "config": { "trigger": true } },
            { "id": "sink-out", "type": "http_response", "params": {} }
        ],
        "connections": [ { "from": "webhook-in", "to": "sink-out" } ]
    });
    let linter = Linter::for_profile(Profile::Graph).expect("embedded schema compiles");

    let result = linter.lint(&doc);
    assert!(!result.ok);
    assert_eq!(result.rules(), vec!["name_present"]);
    assert_eq!(result.violations[0].path, "name");
    assert_eq!(result.violations[0].message, "Blueprint name missing");

    doc["name"] = json!("Webhook responder");
    assert!(linter.lint(&doc).ok);
}

#[test]
fn repair_never_runs_on_clean_documents() {
    let attempt = make_linter().lint_with_repair(&mock_blueprint(), &RepairSettings::enabled());
    assert_eq!(attempt.status, RepairStatus::NotNeeded);
    assert_eq!(attempt.lint_runs, 1);
    assert!(attempt.repair.is_none());
}

#[test]
fn repair_disabled_reports_first_verdict() {
    let mut doc = mock_blueprint();
    doc.as_object_mut().expect("object").remove("version");
    let attempt = make_linter().lint_with_repair(&doc, &RepairSettings::default());
    assert_eq!(attempt.status, RepairStatus::Disabled);
    assert_eq!(attempt.lint_runs, 1);
    assert!(!attempt.result.ok);
    assert_eq!(attempt.document, doc);
}

#[test]
fn missing_keys_are_repaired_and_accepted() {
    let mut doc = mock_blueprint();
    let map = doc.as_object_mut().expect("object");
    map.remove("version");
    map.insert("triggerId".to_string(), json!("nope"));

    let attempt = make_linter().lint_with_repair(&doc, &RepairSettings::enabled());
    assert_eq!(attempt.status, RepairStatus::Accepted);
    assert_eq!(attempt.lint_runs, 2);
    assert!(attempt.result.ok);
    assert_eq!(attempt.document, mock_blueprint());

    let repair = attempt.repair.expect("repair outcome");
    let steps: Vec<&str> = repair.actions.iter().map(|a| a.step).collect();
    assert_eq!(steps, vec!["default_version", "reassign_trigger_id"]);
    // Only the schema ran, so the dangling triggerId was fixed without a violation naming it.
    assert_eq!(repair.addressed.len(), 1);
    assert_eq!(repair.addressed[0].rule, SCHEMA_RULE);
}

#[test]
fn canonical_version_override() {
    let mut doc = mock_blueprint();
    doc["version"] = json!("");
    let settings = RepairSettings {
        enabled: true,
        canonical_version: Some("v2".to_string()),
    };
    let attempt = make_linter().lint_with_repair(&doc, &settings);
    assert_eq!(attempt.status, RepairStatus::Accepted);
    assert_eq!(attempt.document["version"], json!("v2"));
}

#[test]
fn unrepairable_document_keeps_original_failure() {
    let doc = json!(["not", "an", "object"]);
    let linter = make_linter();
    let first = linter.lint(&doc);
    let attempt = linter.lint_with_repair(&doc, &RepairSettings::enabled());

    assert_eq!(attempt.status, RepairStatus::Failed);
    assert_eq!(attempt.result, first);
    assert_eq!(attempt.document, doc);
    assert!(attempt.repair_error.expect("error text").contains("array"));
}

#[test]
fn rejected_repair_keeps_original_document() {
    let mut doc = mock_blueprint();
    doc["version"] = json!("");
    doc["connections"] = json!([ { "from": "slack-action", "to": "slack-action" } ]);
    let linter = make_linter();
    let first = linter.lint(&doc);

    let attempt = linter.lint_with_repair(&doc, &RepairSettings::enabled());
    assert_eq!(attempt.status, RepairStatus::Rejected);
    assert_eq!(attempt.lint_runs, 2);
    assert_eq!(attempt.result, first);
    assert_eq!(attempt.document, doc);
    assert_eq!(attempt.repair.expect("outcome").document["version"], json!("v1.0"));
}

#[test]
fn custom_schema_override() {
    let dir = TempDir::new().expect("temp dir");
    let schema_path = Utf8PathBuf::from_path_buf(dir.path().join("strict.json")).expect("utf8");
    fs::write(
        &schema_path,
        r#"{ "type": "object", "required": ["owner"] }"#,
    )
    .expect("write schema");

    let settings = LintSettings {
        profile: Profile::Make,
        schema: Some(schema_path),
        repair: RepairSettings::default(),
    };
    let linter = Linter::from_settings(&settings).expect("compile override");
    let result = linter.lint(&mock_blueprint());
    assert!(!result.ok);
    assert!(result.violations[0].message.contains("owner"));
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8");
    fs::write(&path, value.to_string()).expect("write json");
    path
}

#[test]
fn run_lint_over_a_directory() {
    let dir = TempDir::new().expect("temp dir");
    write_json(&dir, "a_clean.json", &mock_blueprint());
    let mut dirty = mock_blueprint();
    dirty["modules"][0]["type"] = json!("action");
    write_json(&dir, "b_dirty.json", &dirty);

    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
    let run = run_lint(&LintSettings::default(), &[root]).expect("lint run");
    assert_eq!(run.reports.len(), 2);
    assert!(run.reports[0].path.as_str().ends_with("a_clean.json"));
    assert!(run.reports[0].ok());
    assert!(!run.reports[1].ok());
    assert_eq!(run.exit_code(), 2);
    assert_eq!(run.failed(), 1);
}

#[test]
fn run_lint_load_failure_exits_one() {
    let dir = TempDir::new().expect("temp dir");
    let good = write_json(&dir, "good.json", &mock_blueprint());
    let bad = Utf8PathBuf::from_path_buf(dir.path().join("bad.json")).expect("utf8");
    fs::write(&bad, "{ not json").expect("write");

    let run = run_lint(&LintSettings::default(), &[good, bad]).expect("lint run");
    assert!(run.reports[1].attempt.is_err());
    assert_eq!(run.exit_code(), 1);
}

#[test]
fn run_lint_with_broken_schema_is_a_tool_error() {
    let dir = TempDir::new().expect("temp dir");
    let schema = Utf8PathBuf::from_path_buf(dir.path().join("schema.json")).expect("utf8");
    fs::write(&schema, "{").expect("write");
    let settings = LintSettings {
        schema: Some(schema),
        ..LintSettings::default()
    };
    let err = run_lint(&settings, &[]).expect_err("schema must not parse");
    assert!(matches!(err, ToolError::Schema(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn run_diff_reports_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let old = write_json(&dir, "old.json", &mock_blueprint());
    let missing = Utf8PathBuf::from_path_buf(dir.path().join("missing.json")).expect("utf8");
    let err = run_diff(&old, &missing).expect_err("missing file");
    assert!(matches!(err, ToolError::Load(_)));
}

fn arb_document() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop::sample::select(vec!["", "v1.0", "1.0.0", "v9"])),
        prop::option::of(prop::sample::select(vec!["gmail-trigger", "ghost", ""])),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(version, trigger_id, with_modules, with_loop)| {
            let mut doc = mock_blueprint();
            let map = doc.as_object_mut().expect("object");
            match version {
                Some(v) => map.insert("version".to_string(), json!(v)),
                None => map.remove("version"),
            };
            match trigger_id {
                Some(t) => map.insert("triggerId".to_string(), json!(t)),
                None => map.remove("triggerId"),
            };
            if !with_modules {
                map.remove("modules");
            }
            if with_loop {
                map.insert(
                    "connections".to_string(),
                    json!([ { "from": "gmail-trigger", "to": "gmail-trigger" } ]),
                );
            }
            doc
        })
}

proptest! {
    #[test]
    fn lint_is_deterministic(doc in arb_document()) {
        let linter = make_linter();
        prop_assert_eq!(linter.lint(&doc), linter.lint(&doc));
    }

    #[test]
    fn repair_attempt_is_bounded(doc in arb_document()) {
        let attempt = make_linter().lint_with_repair(&doc, &RepairSettings::enabled());
        prop_assert!(attempt.lint_runs <= 2);
        match attempt.status {
            RepairStatus::Accepted => prop_assert!(attempt.result.ok),
            RepairStatus::NotNeeded => prop_assert_eq!(attempt.lint_runs, 1),
            _ => prop_assert!(!attempt.result.ok),
        }
    }
}
