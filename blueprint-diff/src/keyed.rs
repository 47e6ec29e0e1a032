use std::collections::BTreeSet;

use blueprint_types::document::scalar_text;
use blueprint_types::{Change, ChangeType};
use serde_json::{Map, Value};

/// Which keys of a mapping to compare.
#[derive(Debug, Clone, Copy)]
pub enum Keys<'k> {
    /// Exactly these keys, in this order.
    Fixed(&'k [&'k str]),
    /// The sorted union of both sides' keys.
    Union,
}

/// Compare two mappings key by key.
///
/// Either side may be `None`, which compares as an empty mapping. `path` builds the locator for a
/// key and `describe` renders the sentence for a computed change.
pub fn diff_keyed<P, D>(
    old: Option<&Map<String, Value>>,
    new: Option<&Map<String, Value>>,
    keys: Keys<'_>,
    path: P,
    describe: D,
) -> Vec<Change>
where
    P: Fn(&str) -> String,
    D: Fn(&str, ChangeType, Option<&Value>, Option<&Value>) -> String,
{
    let keys: Vec<&str> = match keys {
        Keys::Fixed(fixed) => fixed.to_vec(),
        Keys::Union => old
            .into_iter()
            .chain(new)
            .flat_map(|map| map.keys().map(String::as_str))
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .collect(),
    };

    keys.into_iter()
        .filter_map(|key| {
            let before = old.and_then(|m| m.get(key));
            let after = new.and_then(|m| m.get(key));
            Change::between(path(key), before, after, |kind, o, n| {
                describe(key, kind, o, n)
            })
        })
        .collect()
}

/// Value text used inside change descriptions. Arrays are summarised by item count.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "null".to_string(),
        Some(Value::Array(items)) => match items.len() {
            1 => "[1 item]".to_string(),
            n => format!("[{n} items]"),
        },
        Some(other) => scalar_text(other),
    }
}
