//! Semantic rules: the second lint phase.
//!
//! Each rule is a pure function from a whole document to zero or more violations. Rules are
//! independent of each other; a [`RuleSet`] runs all of them and concatenates their output in
//! registration order, without short-circuiting.
//!
//! Rules assume the structural schema already passed, but they must never panic on a document
//! that did not: a custom rule list can be run on anything.

mod registry;
mod rule;
mod rules;

pub use registry::{RULE_REGISTRY, RuleSet, list_rule_keys, lookup_rule, rules_for_profile};
pub use rule::{Rule, RuleMeta};
pub use rules::builtin_rules;
