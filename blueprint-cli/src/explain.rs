//! Text for the `blueprint explain` and `blueprint list-rules` commands.

use blueprint_rules::{RuleMeta, list_rule_keys, lookup_rule};
use blueprint_types::Profile;
use blueprint_types::lint::SCHEMA_RULE;

const RULE: &str =
    "================================================================================";
const UNDERLINE: &str =
    "--------------------------------------------------------------------------------";

/// What `explain` was asked about.
#[derive(Debug, Clone, Copy)]
pub enum Subject {
    Rule(&'static RuleMeta),
    /// The pseudo-rule tagging structural schema findings.
    Schema,
}

pub fn lookup_subject(query: &str) -> Option<Subject> {
    if query.trim().eq_ignore_ascii_case(SCHEMA_RULE) {
        return Some(Subject::Schema);
    }
    lookup_rule(query).map(Subject::Rule)
}

pub fn available_keys() -> String {
    let mut keys = vec![SCHEMA_RULE];
    keys.extend(list_rule_keys());
    keys.join(", ")
}

/// Comma-separated profile names.
pub fn format_profiles(profiles: &[Profile]) -> String {
    profiles
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Repair steps that can clear a violation of `rule`.
pub fn repair_steps_for(rule: &str) -> &'static [&'static str] {
    match rule {
        "required_fields" => &["default_version", "ensure_modules", "ensure_connections"],
        "version_format" => &["default_version"],
        "trigger_id_present" | "trigger_id_reference" => &["reassign_trigger_id"],
        SCHEMA_RULE => &[
            "default_version",
            "reassign_trigger_id",
            "ensure_modules",
            "ensure_connections",
        ],
        _ => &[],
    }
}

fn section(out: &mut String, heading: &str, body: &str) {
    out.push_str(&format!("{heading}\n{UNDERLINE}\n{body}\n\n"));
}

fn repair_section(out: &mut String, key: &str) {
    let steps = repair_steps_for(key);
    let body = if steps.is_empty() {
        "Not repaired automatically.".to_string()
    } else {
        format!("With --repair: {}", steps.join(", "))
    };
    section(out, "AUTO-REPAIR", &body);
}

pub fn render_explanation(subject: Subject) -> String {
    match subject {
        Subject::Rule(meta) => render_rule(meta),
        Subject::Schema => render_schema(),
    }
}

fn render_rule(meta: &RuleMeta) -> String {
    let mut out = String::new();
    out.push_str(&format!("{RULE}\nRULE: {}\n{RULE}\n\n", meta.title));
    out.push_str(&format!("Key:       {}\n", meta.key));
    out.push_str(&format!("Profiles:  {}\n\n", format_profiles(meta.profiles)));
    section(&mut out, "DESCRIPTION", meta.description);
    section(&mut out, "REMEDIATION", meta.remediation);
    repair_section(&mut out, meta.key);
    out
}

fn render_schema() -> String {
    let mut out = String::new();
    out.push_str(&format!("{RULE}\nRULE: Structural schema\n{RULE}\n\n"));
    out.push_str(&format!("Key:       {SCHEMA_RULE}\n"));
    out.push_str(&format!("Profiles:  {}\n\n", format_profiles(&Profile::ALL)));

    let schemas = Profile::ALL
        .iter()
        .map(|p| format!("  {:<8} {}", p.as_str(), p.schema_id()))
        .collect::<Vec<_>>()
        .join("\n");
    section(
        &mut out,
        "DESCRIPTION",
        &format!(
            "Every document is first checked against its profile's JSON Schema (Draft \
2020-12).\nSemantic rules only run once the schema reports nothing.\n\n{schemas}"
        ),
    );
    section(
        &mut out,
        "REMEDIATION",
        "Fix the value at the reported path. `blueprint lint --schema PATH` checks against \
a different schema.",
    );
    repair_section(&mut out, SCHEMA_RULE);
    out
}
