use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of one difference between two blueprint revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ChangeType {
    /// Classify a keyed value pair. `None` (and JSON `null`) means absent.
    ///
    /// Returns `None` when both sides are equal, including both absent.
    pub fn classify(old: Option<&Value>, new: Option<&Value>) -> Option<ChangeType> {
        let old = old.filter(|v| !v.is_null());
        let new = new.filter(|v| !v.is_null());
        match (old, new) {
            (None, None) => None,
            (None, Some(_)) => Some(ChangeType::Added),
            (Some(_), None) => Some(ChangeType::Removed),
            (Some(a), Some(b)) if a == b => None,
            (Some(_), Some(_)) => Some(ChangeType::Modified),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
            ChangeType::Unchanged => "unchanged",
        }
    }

    /// Prefix symbol used by the text formatter.
    pub fn symbol(self) -> char {
        match self {
            ChangeType::Added => '+',
            ChangeType::Removed => '-',
            ChangeType::Modified => '~',
            ChangeType::Unchanged => '=',
        }
    }
}

/// One detected difference at a specific path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Dotted locator; connection paths carry a synthetic `from->to` key.
    pub path: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
    pub description: String,
}

impl Change {
    pub fn added(path: impl Into<String>, new_value: Value, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Added,
            old_value: None,
            new_value: Some(new_value),
            description: description.into(),
        }
    }

    pub fn removed(
        path: impl Into<String>,
        old_value: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Removed,
            old_value: Some(old_value),
            new_value: None,
            description: description.into(),
        }
    }

    pub fn modified(
        path: impl Into<String>,
        old_value: Value,
        new_value: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Modified,
            old_value: Some(old_value),
            new_value: Some(new_value),
            description: description.into(),
        }
    }

    /// Build a change from an old/new pair, or `None` when the values are equal.
    ///
    /// `describe` renders the sentence for the computed classification.
    pub fn between<F>(
        path: impl Into<String>,
        old: Option<&Value>,
        new: Option<&Value>,
        describe: F,
    ) -> Option<Change>
    where
        F: FnOnce(ChangeType, Option<&Value>, Option<&Value>) -> String,
    {
        let change_type = ChangeType::classify(old, new)?;
        let old = old.filter(|v| !v.is_null());
        let new = new.filter(|v| !v.is_null());
        Some(Change {
            path: path.into(),
            change_type,
            description: describe(change_type, old, new),
            old_value: old.cloned(),
            new_value: new.cloned(),
        })
    }
}

/// Counts per change type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total: u64,
    pub added: u64,
    pub removed: u64,
    pub modified: u64,
}

impl DiffSummary {
    /// Single pass over `changes`, tallying by change type.
    pub fn tally(changes: &[Change]) -> Self {
        let mut summary = DiffSummary {
            total: changes.len() as u64,
            ..DiffSummary::default()
        };
        for change in changes {
            match change.change_type {
                ChangeType::Added => summary.added += 1,
                ChangeType::Removed => summary.removed += 1,
                ChangeType::Modified => summary.modified += 1,
                ChangeType::Unchanged => {}
            }
        }
        summary
    }
}

/// Result of comparing two blueprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    #[serde(default)]
    pub changes: Vec<Change>,
    pub summary: DiffSummary,
    pub is_identical: bool,
    pub total_changes: u64,
}

impl DiffResult {
    pub fn from_changes(changes: Vec<Change>) -> Self {
        let summary = DiffSummary::tally(&changes);
        Self {
            is_identical: changes.is_empty(),
            total_changes: changes.len() as u64,
            summary,
            changes,
        }
    }

    pub fn changes_of(&self, change_type: ChangeType) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(move |c| c.change_type == change_type)
    }

    pub fn find(&self, path: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.path == path)
    }
}
