use blueprint_types::{Profile, Violation};
use serde::Serialize;
use serde_json::Value;

/// Static description of a rule, shown by `explain` and `list-rules`.
#[derive(Debug, Clone, Serialize)]
pub struct RuleMeta {
    /// Rule identifier carried on every violation the rule emits.
    pub key: &'static str,
    pub title: &'static str,
    /// What the rule checks.
    pub description: &'static str,
    /// How to fix a document that trips the rule.
    pub remediation: &'static str,
    /// Profiles whose built-in rule list includes the rule.
    pub profiles: &'static [Profile],
}

impl RuleMeta {
    pub fn applies_to(&self, profile: Profile) -> bool {
        self.profiles.contains(&profile)
    }
}

pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Inspect the whole document. Output order must depend only on the document.
    fn check(&self, doc: &Value) -> Vec<Violation>;

    fn key(&self) -> &'static str {
        self.meta().key
    }
}
