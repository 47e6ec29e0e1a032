//! Rules over the `modules` and `actions` arrays.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::v;
use crate::rule::{Rule, RuleMeta};
use blueprint_types::document::{self, fields, scalar_text};
use blueprint_types::{Profile, Violation};
use regex::Regex;
use serde_json::Value;

static MODULE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,64}$").expect("valid module id regex"));

const MODULE_REQUIRED: [&str; 4] = [fields::ID, fields::TYPE, fields::NAME, fields::PARAMS];

pub(crate) const MODULES_STRUCTURE: RuleMeta = RuleMeta {
    key: "modules_structure",
    title: "Modules array structure",
    description: "modules must be a non-empty array of objects, and every module must carry id, \
type, name and params.",
    remediation: "Add at least one module and give each one an id, type, name and params object.",
    profiles: &[Profile::Make],
};

pub(crate) const UNIQUE_MODULE_IDS: RuleMeta = RuleMeta {
    key: "unique_module_ids",
    title: "Unique module ids",
    description: "No two modules may share an id. Each duplicated id is reported once.",
    remediation: "Rename one of the clashing modules and update the connections that use it.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const MODULE_ID_FORMAT: RuleMeta = RuleMeta {
    key: "module_id_format",
    title: "Module id format",
    description: "Module ids must be 3 to 64 characters of letters, digits, '_' or '-'.",
    remediation: "Rename the module using only identifier-safe characters.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const MODULE_TYPES_PRESENT: RuleMeta = RuleMeta {
    key: "module_types_present",
    title: "Module types present",
    description: "Every module must declare a non-empty type.",
    remediation: "Set the module type, for example \"trigger\" or \"http_response\".",
    profiles: &[Profile::Graph],
};

pub(crate) const MODULE_PARAMS_OBJECT: RuleMeta = RuleMeta {
    key: "module_params_object",
    title: "Module params and config are objects",
    description: "When a module carries params or config, the value must be an object.",
    remediation: "Replace the value with an object of named settings.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const ACTIONS_NOT_EMPTY: RuleMeta = RuleMeta {
    key: "actions_not_empty",
    title: "Actions not empty",
    description: "actions must be a non-empty array.",
    remediation: "Add at least one action to the blueprint.",
    profiles: &[Profile::Legacy],
};

pub(crate) const ACTION_STRUCTURE: RuleMeta = RuleMeta {
    key: "action_structure",
    title: "Actions are objects",
    description: "Every element of actions must be an object.",
    remediation: "Replace scalar action entries with action objects.",
    profiles: &[Profile::Legacy],
};

/// Display form of a module id in messages.
fn id_text(module: &document::ModuleView<'_>) -> String {
    scalar_text(module.id_value())
}

pub(crate) struct ModulesStructure;

impl Rule for ModulesStructure {
    fn meta(&self) -> &'static RuleMeta {
        &MODULES_STRUCTURE
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let key = MODULES_STRUCTURE.key;
        let Some(modules) = doc.get(fields::MODULES).and_then(Value::as_array) else {
            return vec![v(fields::MODULES, "modules must be an array", key)];
        };
        if modules.is_empty() {
            return vec![v(fields::MODULES, "modules array cannot be empty", key)];
        }

        let mut out = Vec::new();
        for (i, module) in modules.iter().enumerate() {
            if !module.is_object() {
                out.push(v(format!("modules.{i}"), "Each module must be an object", key));
                continue;
            }
            for field in MODULE_REQUIRED {
                if module.get(field).is_none() {
                    out.push(v(
                        format!("modules.{i}.{field}"),
                        format!("Module missing required field '{field}'"),
                        key,
                    ));
                }
            }
        }
        out
    }
}

pub(crate) struct UniqueModuleIds;

impl Rule for UniqueModuleIds {
    fn meta(&self) -> &'static RuleMeta {
        &UNIQUE_MODULE_IDS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for id in document::module_ids(doc) {
            *counts.entry(id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| {
                v(
                    fields::MODULES,
                    format!("Duplicate module id: {id}"),
                    UNIQUE_MODULE_IDS.key,
                )
            })
            .collect()
    }
}

pub(crate) struct ModuleIdFormat;

impl Rule for ModuleIdFormat {
    fn meta(&self) -> &'static RuleMeta {
        &MODULE_ID_FORMAT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        document::modules(doc)
            .enumerate()
            .filter(|(_, m)| m.is_object())
            .filter(|(_, m)| !m.id().is_some_and(|id| MODULE_ID.is_match(id)))
            .map(|(i, m)| {
                let shown = m.id_value().as_str().map(str::to_string).unwrap_or_default();
                v(
                    format!("modules.{i}.id"),
                    format!("Module id invalid: '{shown}'"),
                    MODULE_ID_FORMAT.key,
                )
            })
            .collect()
    }
}

pub(crate) struct ModuleTypesPresent;

impl Rule for ModuleTypesPresent {
    fn meta(&self) -> &'static RuleMeta {
        &MODULE_TYPES_PRESENT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        document::modules(doc)
            .enumerate()
            .filter(|(_, m)| m.is_object() && m.kind().is_none_or(str::is_empty))
            .map(|(i, m)| {
                v(
                    format!("modules.{i}.type"),
                    format!("Module {} missing type", id_text(&m)),
                    MODULE_TYPES_PRESENT.key,
                )
            })
            .collect()
    }
}

pub(crate) struct ModuleParamsObject;

impl Rule for ModuleParamsObject {
    fn meta(&self) -> &'static RuleMeta {
        &MODULE_PARAMS_OBJECT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let mut out = Vec::new();
        for (i, module) in document::modules(doc).enumerate() {
            for section in [fields::PARAMS, fields::CONFIG] {
                match module.get(section) {
                    Some(value) if !value.is_object() => out.push(v(
                        format!("modules.{i}.{section}"),
                        format!("Module {} {section} must be object", id_text(&module)),
                        MODULE_PARAMS_OBJECT.key,
                    )),
                    _ => {}
                }
            }
        }
        out
    }
}

pub(crate) struct ActionsNotEmpty;

impl Rule for ActionsNotEmpty {
    fn meta(&self) -> &'static RuleMeta {
        &ACTIONS_NOT_EMPTY
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        match doc.get(fields::ACTIONS).and_then(Value::as_array) {
            Some(actions) if !actions.is_empty() => vec![],
            _ => vec![v(
                fields::ACTIONS,
                "Actions must be a non-empty array",
                ACTIONS_NOT_EMPTY.key,
            )],
        }
    }
}

pub(crate) struct ActionStructure;

impl Rule for ActionStructure {
    fn meta(&self) -> &'static RuleMeta {
        &ACTION_STRUCTURE
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        document::array(doc, fields::ACTIONS)
            .iter()
            .enumerate()
            .filter(|(_, action)| !action.is_object())
            .map(|(i, _)| {
                v(
                    format!("actions.{i}"),
                    "Action must be an object",
                    ACTION_STRUCTURE.key,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicates_reported_once_sorted() {
        let doc = json!({
            "modules": [
                { "id": "zeta" }, { "id": "alpha" }, { "id": "zeta" },
                { "id": "alpha" }, { "id": "alpha" }, { "id": "solo" }
            ]
        });
        let messages: Vec<String> = UniqueModuleIds
            .check(&doc)
            .into_iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(
            messages,
            vec!["Duplicate module id: alpha", "Duplicate module id: zeta"]
        );
    }

    #[test]
    fn module_id_format_bounds() {
        let doc = json!({
            "modules": [
                { "id": "abc" },
                { "id": "ab" },
                { "id": "x".repeat(64) },
                { "id": "x".repeat(65) },
                { "id": "has space" },
                { "name": "no id" },
                { "id": "Slack_Action-2" }
            ]
        });
        let paths: Vec<String> = ModuleIdFormat.check(&doc).into_iter().map(|v| v.path).collect();
        assert_eq!(paths, vec!["modules.1.id", "modules.3.id", "modules.4.id", "modules.5.id"]);
    }

    #[test]
    fn modules_structure_checks_each_module() {
        let doc = json!({ "modules": [ { "id": "a", "type": "trigger" }, "junk" ] });
        let paths: Vec<String> = ModulesStructure.check(&doc).into_iter().map(|v| v.path).collect();
        assert_eq!(paths, vec!["modules.0.name", "modules.0.params", "modules.1"]);

        let empty = ModulesStructure.check(&json!({ "modules": [] }));
        assert_eq!(empty[0].message, "modules array cannot be empty");
    }

    #[test]
    fn params_and_config_must_be_objects_when_present() {
        let doc = json!({
            "modules": [
                { "id": "ok1", "params": {}, "config": {} },
                { "id": "bare" },
                { "id": "bad", "params": [], "config": "x" }
            ]
        });
        let violations = ModuleParamsObject.check(&doc);
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["modules.2.params", "modules.2.config"]);
        assert_eq!(violations[1].message, "Module bad config must be object");
    }

    #[test]
    fn module_types_present_flags_missing_and_empty() {
        let doc = json!({ "modules": [ { "id": "a", "type": "" }, { "id": "b" }, { "id": "c", "type": "email_send" } ] });
        let messages: Vec<String> = ModuleTypesPresent.check(&doc).into_iter().map(|v| v.message).collect();
        assert_eq!(messages, vec!["Module a missing type", "Module b missing type"]);
    }

    #[test]
    fn legacy_actions() {
        assert_eq!(ActionsNotEmpty.check(&json!({ "actions": [] })).len(), 1);
        assert_eq!(ActionsNotEmpty.check(&json!({ "actions": {} })).len(), 1);
        assert!(ActionsNotEmpty.check(&json!({ "actions": [ {} ] })).is_empty());

        let structure = ActionStructure.check(&json!({ "actions": [ {}, 3, "x" ] }));
        let paths: Vec<&str> = structure.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["actions.1", "actions.2"]);
    }
}
