use crate::error::{RepairError, RepairResult, json_type};
use blueprint_types::document::{ModuleView, TRIGGER_TYPE, fields};
use serde::Serialize;
use serde_json::{Map, Value};

/// One normalization a repair step performed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairAction {
    pub step: &'static str,
    /// Top-level key the step rewrote.
    pub path: String,
    /// Previous value, `None` when the key was absent.
    pub before: Option<Value>,
    pub after: Value,
}

/// A single normalization. Applying a step to its own output must be a no-op.
pub trait RepairStep: Send + Sync {
    fn key(&self) -> &'static str;

    fn apply(&self, doc: &mut Map<String, Value>) -> RepairResult<Option<RepairAction>>;
}

/// Fill a missing, null or empty `version` with a canonical value.
pub struct DefaultVersion {
    pub version: String,
}

impl RepairStep for DefaultVersion {
    fn key(&self) -> &'static str {
        "default_version"
    }

    fn apply(&self, doc: &mut Map<String, Value>) -> RepairResult<Option<RepairAction>> {
        let before = doc.get(fields::VERSION).cloned();
        match &before {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.trim().is_empty() => {}
            Some(Value::String(_)) => return Ok(None),
            Some(other) => {
                return Err(RepairError::UnexpectedType {
                    field: fields::VERSION.to_string(),
                    expected: "string",
                    found: json_type(other),
                });
            }
        }
        let after = Value::String(self.version.clone());
        doc.insert(fields::VERSION.to_string(), after.clone());
        Ok(Some(RepairAction {
            step: self.key(),
            path: fields::VERSION.to_string(),
            before,
            after,
        }))
    }
}

/// Point a dangling `triggerId` at the first trigger module, else the first module.
///
/// Left alone when there are no modules with string ids.
pub struct ReassignTriggerId;

impl RepairStep for ReassignTriggerId {
    fn key(&self) -> &'static str {
        "reassign_trigger_id"
    }

    fn apply(&self, doc: &mut Map<String, Value>) -> RepairResult<Option<RepairAction>> {
        let modules: Vec<ModuleView<'_>> = doc
            .get(fields::MODULES)
            .and_then(Value::as_array)
            .map(|list| list.iter().map(ModuleView::new).collect())
            .unwrap_or_default();
        let ids: Vec<&str> = modules.iter().filter_map(|m| m.id()).collect();

        let current = doc.get(fields::TRIGGER_ID).and_then(Value::as_str);
        if current.is_some_and(|id| ids.contains(&id)) {
            return Ok(None);
        }
        let target = modules
            .iter()
            .filter(|m| m.kind().is_some_and(|k| k.eq_ignore_ascii_case(TRIGGER_TYPE)))
            .find_map(|m| m.id())
            .or_else(|| ids.first().copied())
            .map(str::to_string);

        let Some(target) = target else {
            return Ok(None);
        };
        let after = Value::String(target);
        let before = doc.insert(fields::TRIGGER_ID.to_string(), after.clone());
        Ok(Some(RepairAction {
            step: self.key(),
            path: fields::TRIGGER_ID.to_string(),
            before,
            after,
        }))
    }
}

/// Make sure `field` holds an array, defaulting to an empty one.
pub struct EnsureArray {
    pub field: &'static str,
}

impl RepairStep for EnsureArray {
    fn key(&self) -> &'static str {
        match self.field {
            fields::MODULES => "ensure_modules",
            fields::CONNECTIONS => "ensure_connections",
            _ => "ensure_array",
        }
    }

    fn apply(&self, doc: &mut Map<String, Value>) -> RepairResult<Option<RepairAction>> {
        let before = match doc.get(self.field) {
            Some(Value::Array(_)) => return Ok(None),
            None => None,
            Some(Value::Null) => Some(Value::Null),
            Some(other) => {
                return Err(RepairError::UnexpectedType {
                    field: self.field.to_string(),
                    expected: "array",
                    found: json_type(other),
                });
            }
        };
        let after = Value::Array(Vec::new());
        doc.insert(self.field.to_string(), after.clone());
        Ok(Some(RepairAction {
            step: self.key(),
            path: self.field.to_string(),
            before,
            after,
        }))
    }
}
