//! Structural diff between two blueprint revisions.
//!
//! The comparison walks a fixed list of zones in order: top-level scalars, modules (fields,
//! params, mappings), connections, policies, credentials. Within a zone keys are visited in
//! sorted order, so the same pair of documents always yields the same change list.
//!
//! Modules are matched by id and credentials by identity (the string itself, or an object's `id`,
//! then `name`). A credential whose identity survives but whose body changed is reported once as
//! modified, after the added and removed credentials.
//!
//! Comparison is total. Missing zones and zones of the wrong type compare as empty, and JSON
//! `null` counts as absent.

mod keyed;
mod zones;

use blueprint_types::{Change, DiffResult};
use serde_json::Value;
use tracing::debug;

pub use keyed::{Keys, diff_keyed, display_value};

/// Compare `old` against `new`.
pub fn compare(old: &Value, new: &Value) -> DiffResult {
    let mut changes: Vec<Change> = Vec::new();
    changes.extend(zones::top_level(old, new));
    changes.extend(zones::modules(old, new));
    changes.extend(zones::connections(old, new));
    changes.extend(zones::policies(old, new));
    changes.extend(zones::credentials(old, new));

    let result = DiffResult::from_changes(changes);
    debug!(
        total = result.summary.total,
        added = result.summary.added,
        removed = result.summary.removed,
        modified = result.summary.modified,
        "compared blueprints"
    );
    result
}
