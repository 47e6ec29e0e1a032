//! Rendering helpers for diffs, lint results and repairs.

use blueprint_repair::RepairOutcome;
use blueprint_types::{DiffResult, LintResult};
use serde_json::{Value, json};

pub const IDENTICAL_TEXT: &str = "The blueprints are identical.";

/// Human-readable diff report. No trailing newline.
pub fn to_text(result: &DiffResult) -> String {
    if result.is_identical {
        return IDENTICAL_TEXT.to_string();
    }

    let mut lines = vec![
        "Blueprint Diff Summary:".to_string(),
        format!("  Total changes: {}", result.total_changes),
        format!("  Added: {}", result.summary.added),
        format!("  Removed: {}", result.summary.removed),
        format!("  Modified: {}", result.summary.modified),
        String::new(),
        "Changes:".to_string(),
    ];
    for change in &result.changes {
        lines.push(format!(
            "  {} {}",
            change.change_type.symbol(),
            change.description
        ));
    }
    lines.join("\n")
}

/// Structured diff report: `{is_identical, summary, total_changes, changes[]}`.
///
/// Absent old/new values render as `null`.
pub fn to_structured(result: &DiffResult) -> Value {
    let changes: Vec<Value> = result
        .changes
        .iter()
        .map(|change| {
            json!({
                "path": change.path,
                "type": change.change_type.as_str(),
                "description": change.description,
                "old_value": change.old_value,
                "new_value": change.new_value,
            })
        })
        .collect();

    json!({
        "is_identical": result.is_identical,
        "summary": {
            "total": result.summary.total,
            "added": result.summary.added,
            "removed": result.summary.removed,
            "modified": result.summary.modified,
        },
        "total_changes": result.total_changes,
        "changes": changes,
    })
}

/// One line per violation, preceded by a verdict line.
pub fn render_lint_text(result: &LintResult) -> String {
    let mut out = String::new();
    if result.ok {
        out.push_str("ok: no violations\n");
        return out;
    }
    out.push_str(&format!("failed: {} violation(s)\n", result.count));
    for v in &result.violations {
        out.push_str(&format!("  [{}] {}: {}\n", v.rule, v.path, v.message));
    }
    out
}

pub fn render_validation_report_md(result: &LintResult) -> String {
    let mut out = String::new();
    out.push_str("# Blueprint validation report\n\n");
    out.push_str(&format!(
        "- Status: {}\n",
        if result.ok { "PASSED" } else { "FAILED" }
    ));
    out.push_str(&format!("- Violations: {}\n", result.count));

    let rules = result.rules();
    if !rules.is_empty() {
        out.push_str(&format!("- Rules: {}\n", rules.join(", ")));
    }
    out.push('\n');

    out.push_str("## Violations\n\n");
    if result.violations.is_empty() {
        out.push_str("_No violations found._\n");
        return out;
    }

    out.push_str("| # | Rule | Path | Message |\n");
    out.push_str("|---|------|------|---------|\n");
    for (i, v) in result.violations.iter().enumerate() {
        out.push_str(&format!(
            "| {} | `{}` | `{}` | {} |\n",
            i + 1,
            v.rule,
            v.path,
            escape_cell(&v.message)
        ));
    }
    out
}

pub fn render_repair_text(outcome: &RepairOutcome) -> String {
    let mut out = String::new();
    if !outcome.changed() {
        out.push_str("repair: no changes\n");
        return out;
    }
    out.push_str(&format!("repair: {} action(s)\n", outcome.actions.len()));
    for action in &outcome.actions {
        let before = action
            .before
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "(absent)".to_string());
        out.push_str(&format!(
            "  {} {}: {} -> {}\n",
            action.step, action.path, before, action.after
        ));
    }
    if !outcome.addressed.is_empty() {
        out.push_str(&format!(
            "  addresses {} violation(s)\n",
            outcome.addressed.len()
        ));
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
