use std::fmt;

use crate::rule::{Rule, RuleMeta};
use crate::rules::{self, builtin_rules};
use blueprint_types::{Profile, Violation};
use serde_json::Value;

/// Every built-in rule, in a stable listing order.
pub static RULE_REGISTRY: &[RuleMeta] = &[
    rules::REQUIRED_FIELDS,
    rules::VERSION_FORMAT,
    rules::NAME_PRESENT,
    rules::NAME_LENGTH,
    rules::TRIGGER_ID_PRESENT,
    rules::TRIGGER_SHAPE,
    rules::MODULES_STRUCTURE,
    rules::ACTIONS_NOT_EMPTY,
    rules::ACTION_STRUCTURE,
    rules::UNIQUE_MODULE_IDS,
    rules::NO_ORPHAN_CONNECTIONS,
    rules::MODULE_ID_FORMAT,
    rules::MODULE_TYPES_PRESENT,
    rules::MODULE_PARAMS_OBJECT,
    rules::TRIGGER_ID_REFERENCE,
    rules::MIN_ONE_CONNECTION,
    rules::NO_SELF_LOOPS,
    rules::NO_TWO_NODE_CYCLES,
    rules::ENTRYPOINT_EXISTS,
    rules::OUTPUT_EXISTS,
];

/// Look up a rule by key. Case-insensitive; `-` and `_` are interchangeable.
pub fn lookup_rule(query: &str) -> Option<&'static RuleMeta> {
    let normalized = query.trim().to_lowercase().replace('-', "_");
    RULE_REGISTRY.iter().find(|meta| meta.key == normalized)
}

pub fn list_rule_keys() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|meta| meta.key).collect()
}

/// Registry entries whose rule runs under `profile`, in listing order.
pub fn rules_for_profile(profile: Profile) -> Vec<&'static RuleMeta> {
    RULE_REGISTRY
        .iter()
        .filter(|meta| meta.applies_to(profile))
        .collect()
}

/// An ordered, immutable list of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn for_profile(profile: Profile) -> Self {
        Self::with_rules(builtin_rules(profile))
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Run every rule and concatenate their violations in registration order.
    pub fn evaluate(&self, doc: &Value) -> Vec<Violation> {
        self.rules.iter().flat_map(|rule| rule.check(doc)).collect()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.keys())
            .finish()
    }
}
