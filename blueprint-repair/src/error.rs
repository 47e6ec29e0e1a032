//! Error types for blueprint-repair.
//!
//! A repair error never escapes as a tool failure: the lint pipeline treats it as "repair did not
//! help" and reports the original lint verdict.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// The document root is not an object, so there is nothing to normalize.
    #[error("cannot repair a blueprint whose root is {found}, expected an object")]
    NotAnObject { found: &'static str },

    /// A key the repair would normalize holds a value of the wrong type.
    #[error("cannot repair '{field}': expected {expected}, found {found}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl RepairError {
    /// Location of the offending value, as a dotted path.
    pub fn path(&self) -> &str {
        match self {
            RepairError::NotAnObject { .. } => blueprint_types::lint::ROOT_PATH,
            RepairError::UnexpectedType { field, .. } => field,
        }
    }
}

pub type RepairResult<T> = Result<T, RepairError>;

/// JSON type name used in error messages.
pub(crate) fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
