use std::fmt;

use blueprint_types::Profile;
use blueprint_types::lint::{ROOT_PATH, Violation};
use camino::Utf8Path;
use fs_err as fs;
use jsonschema::Draft;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const MAKE_SCHEMA: &str = include_str!("../schemas/make.schema.json");
const LEGACY_SCHEMA: &str = include_str!("../schemas/legacy.schema.json");
const GRAPH_SCHEMA: &str = include_str!("../schemas/graph.schema.json");

#[derive(Debug, Error, Clone)]
pub enum SchemaError {
    #[error("read schema {path}: {message}")]
    Io { path: String, message: String },

    #[error("schema {id} is not valid JSON: {message}")]
    Parse { id: String, message: String },

    #[error("schema {id} failed to compile: {message}")]
    Compile { id: String, message: String },
}

/// Raw text of the schema embedded for `profile`.
pub fn embedded_schema(profile: Profile) -> &'static str {
    match profile {
        Profile::Make => MAKE_SCHEMA,
        Profile::Legacy => LEGACY_SCHEMA,
        Profile::Graph => GRAPH_SCHEMA,
    }
}

pub fn embedded_schema_value(profile: Profile) -> Result<Value, SchemaError> {
    serde_json::from_str(embedded_schema(profile)).map_err(|e| SchemaError::Parse {
        id: profile.schema_id().to_string(),
        message: e.to_string(),
    })
}

/// A compiled structural schema. Immutable once built.
pub struct SchemaValidator {
    id: String,
    validator: jsonschema::Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    pub fn for_profile(profile: Profile) -> Result<Self, SchemaError> {
        let schema = embedded_schema_value(profile)?;
        Self::from_schema(profile.schema_id(), &schema)
    }

    /// Compile an operator-supplied schema (Draft 2020-12).
    pub fn from_schema(id: impl Into<String>, schema: &Value) -> Result<Self, SchemaError> {
        let id = id.into();
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                id: id.clone(),
                message: e.to_string(),
            })?;
        debug!(schema = %id, "compiled blueprint schema");
        Ok(Self { id, validator })
    }

    /// Read and compile a schema file. The path doubles as the schema id.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let schema: Value = serde_json::from_str(&text).map_err(|e| SchemaError::Parse {
            id: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_schema(path.as_str(), &schema)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Every structural violation of `doc`, in the order the schema reports them.
    pub fn validate(&self, doc: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(doc)
            .map(|error| {
                Violation::schema(
                    pointer_to_dotted(&error.instance_path().to_string()),
                    error.to_string(),
                )
            })
            .collect()
    }

    pub fn is_valid(&self, doc: &Value) -> bool {
        self.validator.is_valid(doc)
    }
}

/// Convert a JSON pointer (`/modules/0/id`) into a dotted locator (`modules.0.id`).
///
/// The empty pointer is the document root and maps to `"$"`.
pub fn pointer_to_dotted(pointer: &str) -> String {
    let segments: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|seg| seg.replace("~1", "/").replace("~0", "~"))
        .collect();
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(".")
    }
}
