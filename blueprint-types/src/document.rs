//! Read-only views over a blueprint held as `serde_json::Value`.
//!
//! Documents arrive already deserialized and may be malformed, so every accessor is total:
//! a missing key or a value of the wrong type reads as absent/empty instead of failing.

use serde_json::{Map, Value};

/// Field names used across lint rules, repair and diff.
pub mod fields {
    pub const VERSION: &str = "version";
    pub const NAME: &str = "name";
    pub const TRIGGER_ID: &str = "triggerId";
    pub const MODULES: &str = "modules";
    pub const CONNECTIONS: &str = "connections";
    pub const POLICIES: &str = "policies";
    pub const CREDENTIALS: &str = "credentials";
    pub const TRIGGER: &str = "trigger";
    pub const ACTIONS: &str = "actions";

    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const APP: &str = "app";
    pub const PARAMS: &str = "params";
    pub const CONFIG: &str = "config";
    pub const MAPPINGS: &str = "mappings";

    pub const FROM: &str = "from";
    pub const TO: &str = "to";
}

/// Top-level scalar fields compared by the diff engine, in comparison order.
pub const TOP_LEVEL_SCALAR_FIELDS: [&str; 2] = [fields::VERSION, fields::TRIGGER_ID];

/// Module fields compared one by one by the diff engine, in comparison order.
pub const MODULE_SCALAR_FIELDS: [&str; 8] = [
    "type",
    "name",
    "external",
    "authRequired",
    "throttled",
    "iterates",
    "hasLimiter",
    "hasErrorHandler",
];

/// Module type that marks an entry point.
pub const TRIGGER_TYPE: &str = "trigger";

static NULL: Value = Value::Null;

/// Array stored under `key`, or an empty slice when missing or not an array.
pub fn array<'a>(doc: &'a Value, key: &str) -> &'a [Value] {
    doc.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Object stored under `key`, when present and an object.
pub fn object<'a>(doc: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    doc.get(key).and_then(Value::as_object)
}

pub fn str_field<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// Modules of a document in document order. Non-object entries are included.
pub fn modules(doc: &Value) -> impl Iterator<Item = ModuleView<'_>> {
    array(doc, fields::MODULES).iter().map(ModuleView::new)
}

/// String ids of all modules, in document order (duplicates kept).
pub fn module_ids(doc: &Value) -> Vec<&str> {
    modules(doc).filter_map(|m| m.id()).collect()
}

/// Directed edges of a document in document order.
pub fn edges(doc: &Value) -> impl Iterator<Item = Edge<'_>> {
    array(doc, fields::CONNECTIONS).iter().map(Edge::new)
}

/// Text form of a value for messages: strings verbatim, everything else as compact JSON.
pub fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A module entry. May wrap a non-object when the document is malformed.
#[derive(Debug, Clone, Copy)]
pub struct ModuleView<'a> {
    value: &'a Value,
}

impl<'a> ModuleView<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key)
    }

    pub fn id(&self) -> Option<&'a str> {
        str_field(self.value, fields::ID)
    }

    /// The raw `id` value (`null` when absent), for keys that must survive non-string ids.
    pub fn id_value(&self) -> &'a Value {
        self.value.get(fields::ID).unwrap_or(&NULL)
    }

    pub fn kind(&self) -> Option<&'a str> {
        str_field(self.value, fields::TYPE)
    }

    pub fn name(&self) -> Option<&'a str> {
        str_field(self.value, fields::NAME)
    }

    pub fn params(&self) -> Option<&'a Map<String, Value>> {
        object(self.value, fields::PARAMS)
    }

    pub fn mappings(&self) -> &'a [Value] {
        array(self.value, fields::MAPPINGS)
    }

    /// Entry point: type `trigger` (any case), or `config.trigger` / `params.trigger` set to `true`.
    pub fn is_trigger(&self) -> bool {
        if self
            .kind()
            .is_some_and(|k| k.eq_ignore_ascii_case(TRIGGER_TYPE))
        {
            return true;
        }
        [fields::CONFIG, fields::PARAMS].iter().any(|section| {
            object(self.value, section)
                .and_then(|m| m.get(fields::TRIGGER))
                .and_then(Value::as_bool)
                == Some(true)
        })
    }
}

/// A connection entry. Missing endpoints read as `null`.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    pub from: &'a Value,
    pub to: &'a Value,
}

impl<'a> Edge<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            from: value.get(fields::FROM).unwrap_or(&NULL),
            to: value.get(fields::TO).unwrap_or(&NULL),
        }
    }

    pub fn from_id(&self) -> Option<&'a str> {
        self.from.as_str()
    }

    pub fn to_id(&self) -> Option<&'a str> {
        self.to.as_str()
    }

    /// Endpoint texts, used as the identity of the edge.
    pub fn endpoints(&self) -> (String, String) {
        (scalar_text(self.from), scalar_text(self.to))
    }

    /// Synthetic `from->to` key used in diff paths.
    pub fn key(&self) -> String {
        let (from, to) = self.endpoints();
        format!("{from}->{to}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_tolerate_wrong_types() {
        let doc = json!({ "modules": "nope", "connections": 3 });
        assert_eq!(modules(&doc).count(), 0);
        assert_eq!(edges(&doc).count(), 0);
        assert!(object(&doc, "policies").is_none());
    }

    #[test]
    fn module_view_reads_fields() {
        let doc = json!({
            "modules": [
                { "id": "gmail-trigger", "type": "Trigger", "params": { "app": "Gmail" } },
                { "id": "flagged", "type": "action", "config": { "trigger": true } },
                { "id": "plain", "type": "action", "params": { "trigger": "yes" } },
                42
            ]
        });
        let views: Vec<_> = modules(&doc).collect();
        assert_eq!(views.len(), 4);
        assert!(views[0].is_trigger());
        assert!(views[1].is_trigger());
        assert!(!views[2].is_trigger());
        assert!(!views[3].is_object());
        assert_eq!(views[3].id_value(), &Value::Null);
        assert_eq!(module_ids(&doc), vec!["gmail-trigger", "flagged", "plain"]);
    }

    #[test]
    fn edge_key_renders_missing_endpoints_as_null() {
        let doc = json!({ "connections": [ { "from": "a", "to": "b" }, { "from": "a" } ] });
        let keys: Vec<String> = edges(&doc).map(|e| e.key()).collect();
        assert_eq!(keys, vec!["a->b".to_string(), "a->null".to_string()]);
    }

    #[test]
    fn scalar_text_keeps_strings_verbatim() {
        assert_eq!(scalar_text(&json!("v1.0")), "v1.0");
        assert_eq!(scalar_text(&json!(true)), "true");
        assert_eq!(scalar_text(&json!(100)), "100");
        assert_eq!(scalar_text(&Value::Null), "null");
    }
}
