//! Structural validation for blueprint documents.
//!
//! The validator is the first lint phase: it only checks shape (required keys, types, nesting).
//! Everything semantic belongs to the rule engine, which never sees a document that failed here.
//! Malformed input is reported as violations; nothing in this crate fails on document content.
//!
//! The crate also owns reading candidate documents from disk, since that is the other place raw
//! JSON enters the workspace.

mod load;
mod validator;

pub use load::{DocumentLoadError, LoadedDocument, load_document, load_documents, load_inputs};
pub use validator::{
    SchemaError, SchemaValidator, embedded_schema, embedded_schema_value, pointer_to_dotted,
};
