use serde::{Deserialize, Serialize};

/// Rule tag carried by every violation produced by structural schema validation.
pub const SCHEMA_RULE: &str = "SCHEMA";

/// Locator used when a violation points at the document root.
pub const ROOT_PATH: &str = "$";

/// One detected defect in a blueprint, tagged with the rule that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted locator into the document, `"$"` for the root.
    pub path: String,
    pub message: String,
    /// Identifier of the producing rule, or [`SCHEMA_RULE`].
    pub rule: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            rule: rule.into(),
        }
    }

    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, SCHEMA_RULE)
    }

    pub fn is_schema(&self) -> bool {
        self.rule == SCHEMA_RULE
    }

    /// True when this violation sits at `field` or underneath it.
    ///
    /// Root-level violations (`"$"`) mention missing keys by name in their message, so they
    /// match when the message quotes the field.
    pub fn touches(&self, field: &str) -> bool {
        if self.path == field || self.path.starts_with(&format!("{field}.")) {
            return true;
        }
        self.path == ROOT_PATH && self.message.contains(&format!("\"{field}\""))
    }
}

/// Verdict of one lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    pub ok: bool,

    #[serde(default)]
    pub violations: Vec<Violation>,

    pub count: u64,
}

impl LintResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            count: violations.len() as u64,
            violations,
        }
    }

    pub fn clean() -> Self {
        Self::from_violations(Vec::new())
    }

    /// Distinct rule identifiers, in first-seen order.
    pub fn rules(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for v in &self.violations {
            if !out.contains(&v.rule.as_str()) {
                out.push(v.rule.as_str());
            }
        }
        out
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_violations_sets_ok_and_count() {
        let clean = LintResult::from_violations(vec![]);
        assert!(clean.ok);
        assert_eq!(clean.count, 0);

        let dirty = LintResult::from_violations(vec![
            Violation::schema("$", "\"modules\" is a required property"),
            Violation::new("version", "bad version", "version_format"),
        ]);
        assert!(!dirty.ok);
        assert_eq!(dirty.count, 2);
        assert_eq!(dirty.rules(), vec!["SCHEMA", "version_format"]);
    }

    #[test]
    fn touches_matches_nested_and_root_mentions() {
        let nested = Violation::new("modules.0.id", "bad id", "module_id_format");
        assert!(nested.touches("modules"));
        assert!(!nested.touches("mod"));

        let root = Violation::schema("$", "\"connections\" is a required property");
        assert!(root.touches("connections"));
        assert!(!root.touches("modules"));
    }
}
