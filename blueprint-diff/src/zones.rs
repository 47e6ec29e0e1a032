use std::collections::BTreeMap;
use std::fmt;

use crate::keyed::{Keys, diff_keyed, display_value};
use blueprint_types::document::{
    self, Edge, MODULE_SCALAR_FIELDS, ModuleView, TOP_LEVEL_SCALAR_FIELDS, fields, scalar_text,
};
use blueprint_types::{Change, ChangeType};
use serde_json::{Map, Value, json};

pub(crate) fn top_level(old: &Value, new: &Value) -> Vec<Change> {
    diff_keyed(
        old.as_object(),
        new.as_object(),
        Keys::Fixed(&TOP_LEVEL_SCALAR_FIELDS),
        str::to_string,
        |field, kind, o, n| match kind {
            ChangeType::Added => format!("Added {field}: {}", display_value(n)),
            ChangeType::Removed => format!("Removed {field}: {}", display_value(o)),
            _ => format!(
                "Changed {field} from '{}' to '{}'",
                display_value(o),
                display_value(n)
            ),
        },
    )
}

/// Identity of a module on its side of the diff.
///
/// String ids and everything else (missing, numeric, ...) live in separate namespaces, so a module
/// without an id never matches one whose id is the string `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ModuleKey {
    Id(String),
    /// JSON text of a non-string id.
    Untyped(String),
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKey::Id(id) => f.write_str(id),
            ModuleKey::Untyped(json) => write!(f, "#{json}"),
        }
    }
}

fn module_key(module: &ModuleView<'_>) -> ModuleKey {
    match module.id() {
        Some(id) => ModuleKey::Id(id.to_string()),
        None => ModuleKey::Untyped(module.id_value().to_string()),
    }
}

/// id -> module; a later duplicate id replaces an earlier one.
fn modules_by_id(doc: &Value) -> BTreeMap<ModuleKey, &Value> {
    document::modules(doc)
        .map(|m| (module_key(&m), m.value()))
        .collect()
}

fn module_label(module: &Value) -> String {
    match module.get(fields::NAME) {
        Some(name) if !name.is_null() => scalar_text(name),
        _ => "Unknown".to_string(),
    }
}

pub(crate) fn modules(old: &Value, new: &Value) -> Vec<Change> {
    let before = modules_by_id(old);
    let after = modules_by_id(new);

    let mut keys: Vec<&ModuleKey> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut changes = Vec::new();
    for key in keys {
        let id = key.to_string();
        let path = format!("modules.{id}");
        match (before.get(key), after.get(key)) {
            (None, Some(module)) => changes.push(Change::added(
                path,
                (*module).clone(),
                format!("Added module '{id}' ({})", module_label(module)),
            )),
            (Some(module), None) => changes.push(Change::removed(
                path,
                (*module).clone(),
                format!("Removed module '{id}' ({})", module_label(module)),
            )),
            (Some(a), Some(b)) => changes.extend(module_properties(&id, a, b)),
            (None, None) => {}
        }
    }
    changes
}

fn module_properties(id: &str, old: &Value, new: &Value) -> Vec<Change> {
    let mut changes = diff_keyed(
        old.as_object(),
        new.as_object(),
        Keys::Fixed(&MODULE_SCALAR_FIELDS),
        |field| format!("modules.{id}.{field}"),
        |field, kind, o, n| match kind {
            ChangeType::Added => {
                format!("Added {field} to module '{id}': {}", display_value(n))
            }
            ChangeType::Removed => {
                format!("Removed {field} from module '{id}': {}", display_value(o))
            }
            _ => format!(
                "Changed {field} in module '{id}' from '{}' to '{}'",
                display_value(o),
                display_value(n)
            ),
        },
    );

    changes.extend(diff_keyed(
        document::object(old, fields::PARAMS),
        document::object(new, fields::PARAMS),
        Keys::Union,
        |key| format!("modules.{id}.params.{key}"),
        |key, kind, o, n| match kind {
            ChangeType::Added => format!(
                "Added parameter '{key}' to module '{id}': {}",
                display_value(n)
            ),
            ChangeType::Removed => format!(
                "Removed parameter '{key}' from module '{id}': {}",
                display_value(o)
            ),
            _ => format!(
                "Changed parameter '{key}' in module '{id}' from '{}' to '{}'",
                display_value(o),
                display_value(n)
            ),
        },
    ));

    changes.extend(mappings(id, old, new));
    changes
}

/// Coarse mappings comparison: one change at most, no element-level detail.
fn mappings(id: &str, old: &Value, new: &Value) -> Option<Change> {
    let before = document::array(old, fields::MAPPINGS);
    let after = document::array(new, fields::MAPPINGS);
    let path = format!("modules.{id}.mappings");
    let description = if before.len() != after.len() {
        format!(
            "Changed mappings count in module '{id}' from {} to {}",
            before.len(),
            after.len()
        )
    } else if before != after {
        format!("Modified mappings in module '{id}'")
    } else {
        return None;
    };
    Some(Change::modified(
        path,
        Value::Array(before.to_vec()),
        Value::Array(after.to_vec()),
        description,
    ))
}

/// (from, to) text pair -> connection value, for set comparison.
fn connection_set(doc: &Value) -> BTreeMap<(String, String), Value> {
    document::edges(doc)
        .map(|edge: Edge<'_>| {
            (
                edge.endpoints(),
                json!({ "from": edge.from, "to": edge.to }),
            )
        })
        .collect()
}

pub(crate) fn connections(old: &Value, new: &Value) -> Vec<Change> {
    let before = connection_set(old);
    let after = connection_set(new);

    let added = after
        .iter()
        .filter(|(pair, _)| !before.contains_key(*pair))
        .map(|((from, to), value)| {
            Change::added(
                format!("connections.{from}->{to}"),
                value.clone(),
                format!("Added connection from '{from}' to '{to}'"),
            )
        });
    let removed = before
        .iter()
        .filter(|(pair, _)| !after.contains_key(*pair))
        .map(|((from, to), value)| {
            Change::removed(
                format!("connections.{from}->{to}"),
                value.clone(),
                format!("Removed connection from '{from}' to '{to}'"),
            )
        });
    added.chain(removed).collect()
}

pub(crate) fn policies(old: &Value, new: &Value) -> Vec<Change> {
    diff_keyed(
        document::object(old, fields::POLICIES),
        document::object(new, fields::POLICIES),
        Keys::Union,
        |key| format!("policies.{key}"),
        |key, kind, o, n| match kind {
            ChangeType::Added => format!("Added policy '{key}': {}", display_value(n)),
            ChangeType::Removed => format!("Removed policy '{key}': {}", display_value(o)),
            _ => format!(
                "Changed policy '{key}' from '{}' to '{}'",
                display_value(o),
                display_value(n)
            ),
        },
    )
}

/// Set key of a credential: the string itself, or for objects `id`, then `name`, then the
/// canonical JSON text.
fn credential_key(credential: &Value) -> String {
    match credential {
        Value::String(s) => s.clone(),
        Value::Object(map) => object_credential_key(map).unwrap_or_else(|| credential.to_string()),
        other => other.to_string(),
    }
}

fn object_credential_key(map: &Map<String, Value>) -> Option<String> {
    [fields::ID, fields::NAME]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn credential_set(doc: &Value) -> BTreeMap<String, &Value> {
    document::array(doc, fields::CREDENTIALS)
        .iter()
        .filter(|c| !c.is_null())
        .map(|c| (credential_key(c), c))
        .collect()
}

pub(crate) fn credentials(old: &Value, new: &Value) -> Vec<Change> {
    let before = credential_set(old);
    let after = credential_set(new);

    let added = after
        .iter()
        .filter(|(key, _)| !before.contains_key(*key))
        .map(|(key, value)| {
            Change::added(
                format!("credentials.{key}"),
                (*value).clone(),
                format!("Added credential: {key}"),
            )
        });
    let removed = before
        .iter()
        .filter(|(key, _)| !after.contains_key(*key))
        .map(|(key, value)| {
            Change::removed(
                format!("credentials.{key}"),
                (*value).clone(),
                format!("Removed credential: {key}"),
            )
        });
    // Same identity, different body: only object credentials keyed by id or name get here.
    let modified = before.iter().filter_map(|(key, old_value)| {
        let new_value = after.get(key)?;
        (old_value != new_value).then(|| {
            Change::modified(
                format!("credentials.{key}"),
                (*old_value).clone(),
                (*new_value).clone(),
                format!("Changed credential: {key}"),
            )
        })
    });
    added.chain(removed).chain(modified).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_keys() {
        assert_eq!(credential_key(&json!("gmail-oauth")), "gmail-oauth");
        assert_eq!(credential_key(&json!({ "id": "c1", "name": "Slack" })), "c1");
        assert_eq!(credential_key(&json!({ "name": "Slack" })), "Slack");
        assert_eq!(
            credential_key(&json!({ "scope": "read", "kind": "oauth" })),
            r#"{"kind":"oauth","scope":"read"}"#
        );
        assert_eq!(credential_key(&json!(7)), "7");
    }

    #[test]
    fn modules_with_non_string_ids_are_keyed_by_json() {
        let old = json!({ "modules": [ { "name": "anon" } ] });
        let new = json!({ "modules": [] });
        let changes = modules(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "modules.#null");
        assert_eq!(changes[0].description, "Removed module '#null' (anon)");
    }

    #[test]
    fn missing_id_never_matches_string_null() {
        let old = json!({ "modules": [ { "name": "anon" } ] });
        let new = json!({ "modules": [ { "id": "null", "name": "named" } ] });
        let changes = modules(&old, &new);
        let kinds: Vec<(&str, ChangeType)> = changes
            .iter()
            .map(|c| (c.path.as_str(), c.change_type))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("modules.null", ChangeType::Added),
                ("modules.#null", ChangeType::Removed),
            ]
        );
    }

    #[test]
    fn credential_body_change_is_modified() {
        let old = json!({ "credentials": [ { "id": "slack-token", "scope": "chat" } ] });
        let new = json!({ "credentials": [ { "id": "slack-token", "scope": "admin" } ] });
        let changes = credentials(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].path, "credentials.slack-token");
        assert_eq!(changes[0].description, "Changed credential: slack-token");
        assert_eq!(changes[0].old_value, Some(json!({ "id": "slack-token", "scope": "chat" })));
        assert_eq!(changes[0].new_value, Some(json!({ "id": "slack-token", "scope": "admin" })));
        assert!(credentials(&old, &old).is_empty());
    }

    #[test]
    fn mappings_count_change() {
        let old = json!({ "id": "m", "mappings": [ { "f": "a" } ] });
        let new = json!({ "id": "m", "mappings": [ { "f": "a" }, { "f": "b" } ] });
        let change = mappings("m", &old, &new).expect("count differs");
        assert_eq!(change.description, "Changed mappings count in module 'm' from 1 to 2");
        assert_eq!(change.old_value, Some(json!([ { "f": "a" } ])));

        let same_len = json!({ "id": "m", "mappings": [ { "f": "z" } ] });
        let change = mappings("m", &old, &same_len).expect("contents differ");
        assert_eq!(change.description, "Modified mappings in module 'm'");
        assert!(mappings("m", &old, &old).is_none());
    }
}
