use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: Utf8PathBuf,
    pub document: Result<Value, DocumentLoadError>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentLoadError {
    #[error("io error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("json parse error in {path}: {message}")]
    Json { path: String, message: String },

    #[error("bad scan pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },
}

/// Read and parse one JSON document. Any JSON value is accepted; shape is the validator's job.
pub fn load_document(path: &Utf8Path) -> Result<Value, DocumentLoadError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentLoadError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| DocumentLoadError::Json {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Load every `*.json` file directly under `dir`, sorted by path.
///
/// A missing directory yields an empty list. Per-file failures are kept on the entry so one bad
/// file does not hide the rest.
pub fn load_documents(dir: &Utf8Path) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning for blueprint documents");

    let entries = glob(pattern_str).map_err(|e| DocumentLoadError::Pattern {
        pattern: pattern_str.to_string(),
        message: e.to_string(),
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DocumentLoadError::Io {
            path: e.path().to_string_lossy().to_string(),
            message: e.error().to_string(),
        })?;
        let path = Utf8PathBuf::from(path.to_string_lossy().to_string());
        if !path.is_file() {
            continue;
        }
        let document = load_document(&path);
        out.push(LoadedDocument { path, document });
    }

    // Deterministic order matters.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Expand a mix of file and directory arguments into loaded documents.
///
/// Files keep argument order; each directory contributes its sorted scan in place.
pub fn load_inputs(inputs: &[Utf8PathBuf]) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            out.extend(load_documents(input)?);
        } else {
            out.push(LoadedDocument {
                path: input.clone(),
                document: load_document(input),
            });
        }
    }
    Ok(out)
}
